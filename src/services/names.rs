// src/services/names.rs

//! Person-name heuristics.
//!
//! `is_valid_name` is the permissive gate used on listing pages;
//! `is_professor_name` adds surname and capitalisation checks and gates the
//! links followed during the deep crawl.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::keywords::{CJK_SURNAMES, DATE_PATTERNS, NAME_DENYLIST};

static DATE_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DATE_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

fn cjk_count(text: &str) -> usize {
    text.chars().filter(|c| is_cjk_ideograph(*c)).count()
}

fn alpha_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

/// Whether `text` is plausibly a person's name.
pub fn is_valid_name(text: &str) -> bool {
    let text = text.trim();
    let len = text.chars().count();
    if !(2..=30).contains(&len) {
        return false;
    }

    if text.contains('@') {
        return false;
    }

    let lower = text.to_lowercase();
    if NAME_DENYLIST.iter().any(|k| lower.contains(k)) {
        return false;
    }

    if DATE_REGEXES.iter().any(|re| re.is_match(text)) {
        return false;
    }

    let digits = text.chars().filter(|c| c.is_ascii_digit()).count();
    if digits as f64 > len as f64 * 0.2 {
        return false;
    }

    if (2..=4).contains(&cjk_count(text)) {
        return true;
    }

    let alpha = alpha_count(text);
    let words = text.split_whitespace().count();
    (3..=25).contains(&alpha) && (2..=4).contains(&words)
}

/// Stricter check used before following a link to a profile page.
pub fn is_professor_name(text: &str) -> bool {
    if !is_valid_name(text) {
        return false;
    }

    let text = text.trim();
    let cjk = cjk_count(text);

    if (2..=4).contains(&cjk) {
        if text.chars().next().is_some_and(|c| CJK_SURNAMES.contains(&c)) {
            return true;
        }
        if cjk == 2 || cjk == 3 {
            return true;
        }
    }

    if !(3..=30).contains(&alpha_count(text)) {
        return false;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || words.len() > 4 {
        return false;
    }
    if !words.iter().all(|w| w.chars().count() >= 2) {
        return false;
    }

    match words.as_slice() {
        [single] => {
            single.chars().count() >= 3
                && single.chars().next().is_some_and(char::is_uppercase)
        }
        _ => true,
    }
}
