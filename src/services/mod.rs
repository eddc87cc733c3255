//! Extraction services.
//!
//! - Validation: `names`, `email`, `departments`
//! - Listing strategies: `cascade`, `tables`, `mailto`
//! - Profile link following: `deep_crawl`
//! - Result cleanup: `dedup`

pub mod cascade;
pub mod dedup;
pub mod deep_crawl;
pub mod departments;
pub mod email;
pub mod mailto;
pub mod names;
pub mod tables;

pub use cascade::SelectorCascade;
pub use dedup::deduplicate;
pub use deep_crawl::DeepCrawler;
