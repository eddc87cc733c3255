// src/services/departments.rs

//! Department resolution.
//!
//! Infers a page-level default department from the URL (known short codes in
//! path segments or host labels) or from the page title and top headings.

use scraper::Html;
use url::Url;

use crate::error::Result;
use crate::models::keywords::{
    HEADING_DEPARTMENT_KEYWORDS, TITLE_DEPARTMENT_KEYWORDS, URL_DEPARTMENT_CODES, contains_any,
};
use crate::utils::dom::{parse_selector, text_of};

const MAX_LABEL_CHARS: usize = 80;

/// Department name for a known short code appearing in the URL.
pub fn from_url(url: &str) -> Option<&'static str> {
    let parsed = Url::parse(&url.to_lowercase()).ok()?;

    let host_labels: Vec<&str> = parsed
        .host_str()
        .map(|h| {
            let labels: Vec<&str> = h.split('.').collect();
            // The final label is the TLD, never a department code.
            labels[..labels.len().saturating_sub(1)].to_vec()
        })
        .unwrap_or_default();

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    URL_DEPARTMENT_CODES
        .iter()
        .find(|(code, _)| host_labels.contains(code) || segments.contains(code))
        .map(|(_, name)| *name)
}

/// Department name taken from the document `<title>` or its first `<h1>`s.
pub fn from_page(document: &Html) -> Result<Option<String>> {
    let title_sel = parse_selector("title")?;
    if let Some(title) = document.select(&title_sel).next() {
        let title_text: String = title.text().collect();
        for keyword in TITLE_DEPARTMENT_KEYWORDS {
            if !title_text.contains(keyword) {
                continue;
            }
            let hit = title_text
                .split('-')
                .map(str::trim)
                .find(|part| part.contains(keyword) && part.chars().count() < MAX_LABEL_CHARS);
            if let Some(part) = hit {
                return Ok(Some(part.to_string()));
            }
        }
    }

    let h1_sel = parse_selector("h1")?;
    let heading = document
        .select(&h1_sel)
        .take(3)
        .map(text_of)
        .find(|text| {
            contains_any(text, HEADING_DEPARTMENT_KEYWORDS)
                && text.chars().count() < MAX_LABEL_CHARS
        });

    Ok(heading)
}

/// Page-level default department: URL codes first, then the page itself.
pub fn resolve_default(url: &str, document: &Html) -> Result<String> {
    if let Some(name) = from_url(url) {
        return Ok(name.to_string());
    }
    Ok(from_page(document)?.unwrap_or_default())
}
