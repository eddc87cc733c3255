// src/fetch/mod.rs

//! Page acquisition capabilities.
//!
//! - [`PageFetch`]: plain HTTP fetch of a URL into HTML text
//! - [`BrowserLauncher`] / [`RenderedPage`]: headless browser rendering for
//!   JavaScript-driven pages, acquired lazily through a [`RenderSession`]

#[cfg(feature = "browser")]
pub mod browser;
pub mod http;
mod session;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

#[cfg(feature = "browser")]
pub use browser::ChromiumLauncher;
pub use http::HttpFetcher;
pub use session::RenderSession;

/// Fetch a URL into HTML text.
///
/// Network, TLS and status failures yield `None` so callers can fall back
/// to rendering instead of aborting.
#[async_trait]
pub trait PageFetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// A browser tab that renders JavaScript-driven pages.
#[async_trait]
pub trait RenderedPage: Send {
    /// Navigate to a URL
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Wait until the DOM is ready
    async fn wait_for_ready(&mut self, timeout: Duration) -> Result<()>;

    /// Serialized HTML of the current DOM
    async fn current_html(&mut self) -> Result<String>;

    /// Release the browser
    async fn close(&mut self) -> Result<()>;
}

/// Starts a browser on demand.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn RenderedPage>>;
}
