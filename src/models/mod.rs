// src/models/mod.rs

//! Domain models for the faculty crawler.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
pub mod keywords;
mod professor;
mod selectors;

// Re-export all public types
pub use config::{Config, CrawlerConfig, ExtractionConfig};
pub use professor::{LinkCandidate, ProfessorRecord};
pub use selectors::{SELECTOR_SETS, SelectorSet};
