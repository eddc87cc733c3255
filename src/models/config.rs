//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP, rendering and politeness settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Extraction thresholds and caps
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.render_timeout_secs == 0 {
            return Err(AppError::validation(
                "crawler.render_timeout_secs must be > 0",
            ));
        }
        if self.extraction.min_records == 0 {
            return Err(AppError::validation("extraction.min_records must be > 0"));
        }
        if self.extraction.max_detail_pages > self.extraction.max_link_candidates {
            return Err(AppError::validation(
                "extraction.max_detail_pages must not exceed extraction.max_link_candidates",
            ));
        }
        Ok(())
    }
}

/// HTTP client, rendering and politeness settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept-Language header for HTTP requests
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum number of redirects followed per request
    #[serde(default = "defaults::max_redirects")]
    pub max_redirects: usize,

    /// Delay before each static fetch in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Accept TLS certificates that fail verification
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Maximum wait for the rendered DOM to become ready
    #[serde(default = "defaults::render_timeout")]
    pub render_timeout_secs: u64,

    /// Settling wait after the rendered DOM is ready, in milliseconds
    #[serde(default = "defaults::render_settle")]
    pub render_settle_ms: u64,

    /// Delay between detail page fetches during the deep crawl
    #[serde(default = "defaults::detail_delay")]
    pub detail_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            accept_language: defaults::accept_language(),
            timeout_secs: defaults::timeout(),
            max_redirects: defaults::max_redirects(),
            request_delay_ms: defaults::request_delay(),
            accept_invalid_certs: false,
            render_timeout_secs: defaults::render_timeout(),
            render_settle_ms: defaults::render_settle(),
            detail_delay_ms: defaults::detail_delay(),
        }
    }
}

/// Extraction thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Record count at which a strategy is considered sufficient
    #[serde(default = "defaults::min_records")]
    pub min_records: usize,

    /// Link candidates kept for the plausibility pass of the deep crawl
    #[serde(default = "defaults::max_link_candidates")]
    pub max_link_candidates: usize,

    /// Detail pages visited by the deep crawl
    #[serde(default = "defaults::max_detail_pages")]
    pub max_detail_pages: usize,

    /// Records without a department are only collected below this count
    #[serde(default = "defaults::max_unlabeled_records")]
    pub max_unlabeled_records: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_records: defaults::min_records(),
            max_link_candidates: defaults::max_link_candidates(),
            max_detail_pages: defaults::max_detail_pages(),
            max_unlabeled_records: defaults::max_unlabeled_records(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/131.0.0.0 Safari/537.36"
            .into()
    }
    pub fn accept_language() -> String {
        "zh-TW,zh;q=0.9,en-US;q=0.8,en;q=0.7".into()
    }
    pub fn timeout() -> u64 {
        20
    }
    pub fn max_redirects() -> usize {
        5
    }
    pub fn request_delay() -> u64 {
        1000
    }
    pub fn render_timeout() -> u64 {
        10
    }
    pub fn render_settle() -> u64 {
        2000
    }
    pub fn detail_delay() -> u64 {
        500
    }

    // Extraction defaults
    pub fn min_records() -> usize {
        3
    }
    pub fn max_link_candidates() -> usize {
        30
    }
    pub fn max_detail_pages() -> usize {
        20
    }
    pub fn max_unlabeled_records() -> usize {
        50
    }
}
