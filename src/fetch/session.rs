// src/fetch/session.rs

//! Scoped access to the rendered-page capability.

use std::time::Duration;

use crate::error::Result;
use crate::fetch::{BrowserLauncher, RenderedPage};
use crate::models::CrawlerConfig;

/// Lazily launched browser shared by the phases of one scrape.
///
/// The browser is started on the first [`render`](Self::render) call and
/// must be handed back with [`release`](Self::release) before the scrape
/// returns. A failed launch is remembered so later phases degrade to `None`
/// without retrying.
pub struct RenderSession<'a> {
    launcher: Option<&'a dyn BrowserLauncher>,
    page: Option<Box<dyn RenderedPage>>,
    launch_failed: bool,
    ready_timeout: Duration,
    settle: Duration,
    last: Option<(String, String)>,
}

impl<'a> RenderSession<'a> {
    pub fn new(launcher: Option<&'a dyn BrowserLauncher>, config: &CrawlerConfig) -> Self {
        Self {
            launcher,
            page: None,
            launch_failed: false,
            ready_timeout: Duration::from_secs(config.render_timeout_secs),
            settle: Duration::from_millis(config.render_settle_ms),
            last: None,
        }
    }

    /// Whether rendering can still be attempted.
    pub fn is_available(&self) -> bool {
        self.launcher.is_some() && !self.launch_failed
    }

    /// Whether a browser is currently held.
    pub fn is_active(&self) -> bool {
        self.page.is_some()
    }

    /// Render `url` and return the resulting HTML.
    ///
    /// The last rendered page is cached, so rendering the same URL twice in
    /// one session navigates only once.
    pub async fn render(&mut self, url: &str) -> Option<String> {
        if let Some((cached_url, html)) = &self.last {
            if cached_url == url {
                return Some(html.clone());
            }
        }

        if self.page.is_none() {
            self.acquire().await?;
        }
        let page = self.page.as_mut()?;

        match Self::load(&mut **page, url, self.ready_timeout, self.settle).await {
            Ok(html) => {
                self.last = Some((url.to_string(), html.clone()));
                Some(html)
            }
            Err(e) => {
                log::warn!("Rendering {url} failed: {e}");
                None
            }
        }
    }

    /// Close the browser if one was launched. Returns whether anything was
    /// released.
    pub async fn release(&mut self) -> bool {
        self.last = None;
        let Some(mut page) = self.page.take() else {
            return false;
        };

        if let Err(e) = page.close().await {
            log::warn!("Closing the browser failed: {e}");
        }
        true
    }

    async fn acquire(&mut self) -> Option<()> {
        if self.launch_failed {
            return None;
        }
        let launcher = self.launcher?;

        match launcher.launch().await {
            Ok(page) => {
                log::debug!("Browser launched");
                self.page = Some(page);
                Some(())
            }
            Err(e) => {
                log::warn!("Rendered pages unavailable: {e}");
                self.launch_failed = true;
                None
            }
        }
    }

    async fn load(
        page: &mut dyn RenderedPage,
        url: &str,
        ready_timeout: Duration,
        settle: Duration,
    ) -> Result<String> {
        page.navigate(url).await?;
        page.wait_for_ready(ready_timeout).await?;
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }
        page.current_html().await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory browser doubles shared by the pipeline tests.

    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::AppError;

    #[derive(Default, Clone)]
    pub struct FakeLauncher {
        pub pages: HashMap<String, String>,
        pub fail: bool,
        pub launches: Arc<AtomicUsize>,
        pub navigations: Arc<AtomicUsize>,
        pub closes: Arc<AtomicUsize>,
    }

    impl FakeLauncher {
        pub fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        pub fn launch_count(&self) -> usize {
            self.launches.load(Ordering::SeqCst)
        }

        pub fn navigation_count(&self) -> usize {
            self.navigations.load(Ordering::SeqCst)
        }

        pub fn close_count(&self) -> usize {
            self.closes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BrowserLauncher for FakeLauncher {
        async fn launch(&self) -> Result<Box<dyn RenderedPage>> {
            self.launches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::browser("no chromium binary"));
            }
            Ok(Box::new(FakePage {
                pages: self.pages.clone(),
                navigations: Arc::clone(&self.navigations),
                closes: Arc::clone(&self.closes),
                current: None,
            }))
        }
    }

    struct FakePage {
        pages: HashMap<String, String>,
        navigations: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
        current: Option<String>,
    }

    #[async_trait]
    impl RenderedPage for FakePage {
        async fn navigate(&mut self, url: &str) -> Result<()> {
            self.navigations.fetch_add(1, Ordering::SeqCst);
            self.current = self.pages.get(url).cloned();
            Ok(())
        }

        async fn wait_for_ready(&mut self, _timeout: Duration) -> Result<()> {
            if self.current.is_some() {
                Ok(())
            } else {
                Err(AppError::browser("timed out waiting for <body>"))
            }
        }

        async fn current_html(&mut self) -> Result<String> {
            self.current
                .clone()
                .ok_or_else(|| AppError::browser("no page loaded"))
        }

        async fn close(&mut self) -> Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
