// src/pipeline/scrape.rs

//! Faculty listing scrape pipeline.
//!
//! Sequences the extraction strategies for one listing URL:
//!
//! 1. Fetch statically (rendered when the static fetch fails)
//! 2. Selector cascade, then table and mailto fallbacks while short
//! 3. Rendered retry when the static page is short
//! 4. Deep crawl of profile links when still short
//! 5. Deduplicate

use chrono::Utc;
use scraper::Html;

use crate::error::Result;
use crate::fetch::{BrowserLauncher, HttpFetcher, PageFetch, RenderSession};
use crate::models::{Config, ProfessorRecord};
use crate::pipeline::events::{FetchMode, LogObserver, ScrapeEvent, ScrapeObserver, Strategy};
use crate::services::cascade::SelectorCascade;
use crate::services::deep_crawl::DeepCrawler;
use crate::services::dedup::deduplicate;
use crate::services::{departments, mailto, tables};
use crate::utils::dom::{mail_links, parse_selector};

const SUMMARY_ROWS: usize = 10;

/// What the listing phases produced, plus the page they worked on.
#[derive(Debug, Default)]
struct ListingOutcome {
    records: Vec<ProfessorRecord>,
    html: Option<String>,
}

/// Extraction orchestrator for faculty listing pages.
pub struct Scraper {
    config: Config,
    fetcher: Box<dyn PageFetch>,
    launcher: Option<Box<dyn BrowserLauncher>>,
    observer: Box<dyn ScrapeObserver>,
}

impl Scraper {
    /// Create a scraper over the given fetcher, without a browser.
    pub fn new(config: Config, fetcher: impl PageFetch + 'static) -> Self {
        Self {
            config,
            fetcher: Box::new(fetcher),
            launcher: None,
            observer: Box::new(LogObserver),
        }
    }

    /// Create a scraper with the HTTP fetcher and, when built with the
    /// `browser` feature, a headless Chromium.
    pub fn from_config(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.crawler)?;

        #[cfg(feature = "browser")]
        let launcher = crate::fetch::ChromiumLauncher::new(&config.crawler);

        let scraper = Self::new(config, fetcher);

        #[cfg(feature = "browser")]
        let scraper = scraper.with_browser(launcher);

        Ok(scraper)
    }

    /// Enable rendered pages through `launcher`.
    pub fn with_browser(mut self, launcher: impl BrowserLauncher + 'static) -> Self {
        self.launcher = Some(Box::new(launcher));
        self
    }

    /// Disable rendered pages; the dynamic retry and deep crawl become no-ops.
    pub fn without_browser(mut self) -> Self {
        self.launcher = None;
        self
    }

    /// Replace the default [`LogObserver`].
    pub fn with_observer(mut self, observer: impl ScrapeObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract professor records from a faculty listing page.
    ///
    /// "Nothing found" is an empty result, not an error. The browser, if one
    /// was launched, is closed before this returns on every path.
    pub async fn scrape(&self, url: &str) -> Result<Vec<ProfessorRecord>> {
        let start = Utc::now();
        log::info!("Scraping {url}");

        let mut session = RenderSession::new(self.launcher.as_deref(), &self.config.crawler);
        let outcome = self.run(url, &mut session).await;
        if session.release().await {
            self.observer.on_event(&ScrapeEvent::ResourceReleased);
        }

        let outcome = outcome?;
        let records = deduplicate(outcome.records);

        let elapsed = Utc::now() - start;
        log::info!(
            "Collected {} records in {:.1}s",
            records.len(),
            elapsed.num_milliseconds() as f64 / 1000.0
        );
        if records.is_empty() {
            if let Some(html) = &outcome.html {
                log_empty_page_diagnostics(html);
            }
        } else {
            log_summary(&records);
        }

        Ok(records)
    }

    async fn run(&self, url: &str, session: &mut RenderSession<'_>) -> Result<ListingOutcome> {
        let min = self.config.extraction.min_records;
        let mut rendered = false;

        let html = match self.fetch_static(url).await {
            Some(html) => html,
            None => {
                log::info!("Static fetch failed; trying a rendered page");
                rendered = true;
                match self.fetch_rendered(url, session).await {
                    Some(html) => html,
                    None => {
                        log::warn!("Could not fetch {url}");
                        return Ok(ListingOutcome::default());
                    }
                }
            }
        };
        log::debug!("Listing page is {} bytes", html.len());

        let mut records = self.extract_listing(url, &html)?;
        let mut listing = html;

        if records.len() < min && !rendered {
            log::info!("{} records from the static page; trying a rendered page", records.len());
            if let Some(html) = self.fetch_rendered(url, session).await {
                let retry = self.extract_listing(url, &html)?;
                if retry.len() > records.len() {
                    records = retry;
                    listing = html;
                }
            }
        }

        if records.len() < min {
            log::info!("Listing page yielded {} records; trying deep crawl", records.len());
            let crawler = DeepCrawler::new(self.fetcher.as_ref(), self.observer.as_ref(), &self.config);
            let deep = crawler.crawl(url, session).await?;
            if !deep.is_empty() {
                records = deep;
            }
        }

        Ok(ListingOutcome {
            records,
            html: Some(listing),
        })
    }

    async fn fetch_static(&self, url: &str) -> Option<String> {
        let html = self.fetcher.fetch(url).await;
        self.observer.on_event(&ScrapeEvent::FetchAttempted {
            url: url.to_string(),
            mode: FetchMode::Static,
            success: html.is_some(),
        });
        html
    }

    async fn fetch_rendered(&self, url: &str, session: &mut RenderSession<'_>) -> Option<String> {
        if !session.is_available() {
            return None;
        }
        let html = session.render(url).await;
        self.observer.on_event(&ScrapeEvent::FetchAttempted {
            url: url.to_string(),
            mode: FetchMode::Rendered,
            success: html.is_some(),
        });
        html
    }

    /// Run the listing-page strategies over one document.
    fn extract_listing(&self, url: &str, html: &str) -> Result<Vec<ProfessorRecord>> {
        let document = Html::parse_document(html);
        let min = self.config.extraction.min_records;
        let department = departments::resolve_default(url, &document)?;
        if !department.is_empty() {
            log::debug!("Default department: {department}");
        }

        let mut records =
            SelectorCascade::new(&self.config.extraction, &department)?.extract(&document)?;
        self.observer.on_event(&ScrapeEvent::StrategyApplied {
            strategy: Strategy::SelectorCascade,
            found: records.len(),
            total: records.len(),
        });

        if records.len() < min {
            self.apply_fallback(Strategy::TableFallback, &mut records, || {
                tables::extract(&document, &department)
            });
        }
        if records.len() < min {
            self.apply_fallback(Strategy::MailtoFallback, &mut records, || {
                mailto::extract(&document, &department)
            });
        }

        Ok(deduplicate(records))
    }

    /// Append a fallback's records; its failure only ends that stage.
    fn apply_fallback(
        &self,
        strategy: Strategy,
        records: &mut Vec<ProfessorRecord>,
        extract: impl FnOnce() -> Result<Vec<ProfessorRecord>>,
    ) {
        match extract() {
            Ok(found) => {
                let count = found.len();
                records.extend(found);
                self.observer.on_event(&ScrapeEvent::StrategyApplied {
                    strategy,
                    found: count,
                    total: records.len(),
                });
            }
            Err(e) => self.observer.on_event(&ScrapeEvent::StageFailed {
                strategy,
                message: e.to_string(),
            }),
        }
    }
}

fn log_summary(records: &[ProfessorRecord]) {
    for (i, record) in records.iter().take(SUMMARY_ROWS).enumerate() {
        let department = if record.department.is_empty() {
            "(unknown)"
        } else {
            record.department.as_str()
        };
        log::info!(
            "{:>2}. {:<20} | {:<30} | {}",
            i + 1,
            record.name,
            record.email,
            department
        );
    }
    if records.len() > SUMMARY_ROWS {
        log::info!("... and {} more", records.len() - SUMMARY_ROWS);
    }
}

fn log_empty_page_diagnostics(html: &str) {
    let document = Html::parse_document(html);
    let links = mail_links(document.root_element()).unwrap_or_default();
    log::info!("No professor records found; page has {} mailto links", links.len());
    for link in links.iter().take(3) {
        log::info!("  {}", link.value().attr("href").unwrap_or_default());
    }

    if let Ok(headings) = parse_selector("h1, h2, h3, h4, h5") {
        log::info!("Page has {} heading elements", document.select(&headings).count());
    }
}
