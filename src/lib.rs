// src/lib.rs

//! Faculty Crawler Library
//!
//! Extracts professor contact records (name, email, department) from
//! university faculty listing pages.

pub mod error;
pub mod export;
pub mod fetch;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

pub use models::ProfessorRecord;
pub use pipeline::Scraper;
