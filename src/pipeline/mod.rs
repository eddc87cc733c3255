//! Pipeline entry points.
//!
//! - `Scraper::scrape`: extract professor records from a listing page
//! - `events`: progress events observed during a scrape

pub mod events;
pub mod scrape;

pub use events::{LogObserver, NullObserver, ScrapeEvent, ScrapeObserver};
pub use scrape::Scraper;
