// src/services/mailto.rs

//! Mail-link fallback.
//!
//! Walks every `mailto:` anchor on the page and infers the owner's name from
//! the anchor text, nearby headings or emphasis, or the closest heading that
//! precedes the anchor.

use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::models::ProfessorRecord;
use crate::models::keywords::{MAILTO_DEPARTMENT_KEYWORDS, contains_any};
use crate::services::names::is_valid_name;
use crate::utils::dom::{
    closest, is_within, mail_links, mailto_address, parse_selector, preceding, text_of,
};

const BLOCK_TAGS: &[&str] = &["div", "li", "td", "article", "section"];
const PRECEDING_TAGS: &[&str] = &["h3", "h4", "h5", "strong"];
const MAX_SIBLING_CANDIDATES: usize = 5;
const MAX_DEPARTMENT_CHARS: usize = 50;

/// Build a record for every mail-link whose owner can be named.
pub fn extract(document: &Html, default_department: &str) -> Result<Vec<ProfessorRecord>> {
    let sibling_sel = parse_selector("h3, h4, h5, strong, b, span")?;
    let text_sel = parse_selector("span, p, div, td")?;
    let root = document.root_element();
    let mut records = Vec::new();

    for link in mail_links(root)? {
        let Some(email) = mailto_address(link).filter(|e| e.contains('@')) else {
            continue;
        };

        let block = closest(link, BLOCK_TAGS);
        let Some(name) = resolve_name(root, link, block, &sibling_sel) else {
            continue;
        };

        let department = block
            .and_then(|b| find_department(b, &text_sel))
            .unwrap_or_else(|| default_department.to_string());

        if let Some(record) = ProfessorRecord::new(name, email, department) {
            records.push(record);
        }
    }

    Ok(records)
}

fn resolve_name(
    root: ElementRef<'_>,
    link: ElementRef<'_>,
    block: Option<ElementRef<'_>>,
    sibling_sel: &Selector,
) -> Option<String> {
    let own = text_of(link);
    if is_valid_name(&own) {
        return Some(own);
    }

    // Only a link inside a recognised block gets the wider search.
    let block = block?;

    let sibling = block
        .select(sibling_sel)
        .take(MAX_SIBLING_CANDIDATES)
        .filter(|el| el.id() != link.id() && !is_within(link, *el))
        .map(text_of)
        .find(|text| is_valid_name(text));
    if sibling.is_some() {
        return sibling;
    }

    preceding(root, link, PRECEDING_TAGS)
        .map(text_of)
        .filter(|text| is_valid_name(text))
}

fn find_department(block: ElementRef<'_>, text_sel: &Selector) -> Option<String> {
    block.select(text_sel).map(text_of).find(|text| {
        contains_any(text, MAILTO_DEPARTMENT_KEYWORDS) && text.chars().count() < MAX_DEPARTMENT_CHARS
    })
}
