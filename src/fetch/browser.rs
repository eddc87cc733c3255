// src/fetch/browser.rs

//! Headless Chromium rendering via `chromiumoxide`.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::error::{AppError, Result};
use crate::fetch::{BrowserLauncher, RenderedPage};
use crate::models::CrawlerConfig;

const WINDOW_WIDTH: u32 = 1920;
const WINDOW_HEIGHT: u32 = 1080;

/// Launches a headless Chromium with the same identity as the static fetcher.
pub struct ChromiumLauncher {
    user_agent: String,
    request_timeout: Duration,
}

impl ChromiumLauncher {
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            request_timeout: Duration::from_secs(config.render_timeout_secs.max(config.timeout_secs)),
        }
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn RenderedPage>> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .window_size(WINDOW_WIDTH, WINDOW_HEIGHT)
            .request_timeout(self.request_timeout)
            .arg(format!("--user-agent={}", self.user_agent))
            .build()
            .map_err(AppError::browser)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(AppError::browser)?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Box::new(ChromiumPage {
            browser,
            handler_task,
            page: None,
        }))
    }
}

/// A single tab reused for every navigation in a session.
pub struct ChromiumPage {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Option<Page>,
}

impl ChromiumPage {
    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| AppError::browser("no page has been opened"))
    }
}

#[async_trait]
impl RenderedPage for ChromiumPage {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        match &self.page {
            Some(page) => {
                page.goto(url).await.map_err(AppError::browser)?;
            }
            None => {
                let page = self.browser.new_page(url).await.map_err(AppError::browser)?;
                self.page = Some(page);
            }
        }
        Ok(())
    }

    async fn wait_for_ready(&mut self, timeout: Duration) -> Result<()> {
        let page = self.page()?;
        match tokio::time::timeout(timeout, page.find_element("body")).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(AppError::browser(e)),
            Err(_) => Err(AppError::browser(format!(
                "timed out after {}s waiting for <body>",
                timeout.as_secs()
            ))),
        }
    }

    async fn current_html(&mut self) -> Result<String> {
        self.page()?.content().await.map_err(AppError::browser)
    }

    async fn close(&mut self) -> Result<()> {
        self.page = None;
        let closed = self.browser.close().await.map_err(AppError::browser);
        if let Err(e) = self.browser.wait().await {
            log::debug!("Browser process did not exit cleanly: {e}");
        }
        self.handler_task.abort();
        closed.map(|_| ())
    }
}
