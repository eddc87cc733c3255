// src/services/cascade.rs

//! Selector cascade.
//!
//! Tries each [`SelectorSet`] in order against the listing page and builds a
//! record for every container that yields a valid name and email. The
//! cascade stops after the first set that brings the running total to the
//! sufficiency threshold.

use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::models::keywords::{CONTAINER_DEPARTMENT_KEYWORDS, contains_any};
use crate::models::{ExtractionConfig, ProfessorRecord, SELECTOR_SETS, SelectorSet};
use crate::services::email::extract_email;
use crate::services::names::is_valid_name;
use crate::utils::dom::{closest, mail_links, mailto_address, parse_selector, raw_text, text_of};

const MAX_DEPARTMENT_CHARS: usize = 80;

/// Compiled form of a [`SelectorSet`].
struct CompiledSet {
    container: Selector,
    name: Selector,
    email: Selector,
    department: Selector,
}

impl CompiledSet {
    fn compile(set: &SelectorSet) -> Result<Self> {
        Ok(Self {
            container: parse_selector(set.container)?,
            name: parse_selector(set.name)?,
            email: parse_selector(set.email)?,
            department: parse_selector(set.department)?,
        })
    }
}

/// Primary extraction strategy over the static selector table.
pub struct SelectorCascade<'a> {
    config: &'a ExtractionConfig,
    default_department: &'a str,
    block_selector: Selector,
    heading_selector: Selector,
}

impl<'a> SelectorCascade<'a> {
    pub fn new(config: &'a ExtractionConfig, default_department: &'a str) -> Result<Self> {
        Ok(Self {
            config,
            default_department,
            block_selector: parse_selector("span, p, div, td, li")?,
            heading_selector: parse_selector("h1, h2, h3")?,
        })
    }

    /// Run every selector set in order until the threshold is reached.
    pub fn extract(&self, document: &Html) -> Result<Vec<ProfessorRecord>> {
        let mut records = Vec::new();

        for set in &SELECTOR_SETS {
            let compiled = CompiledSet::compile(set)?;
            let before = records.len();

            for container in document.select(&compiled.container) {
                if let Some(record) = self.parse_container(container, &compiled, records.len())? {
                    records.push(record);
                }
            }

            log::debug!(
                "Selector set '{}' yielded {} records",
                set.container,
                records.len() - before
            );

            if records.len() >= self.config.min_records {
                break;
            }
        }

        Ok(records)
    }

    fn parse_container(
        &self,
        container: ElementRef<'_>,
        set: &CompiledSet,
        collected: usize,
    ) -> Result<Option<ProfessorRecord>> {
        let Some(name) = container
            .select(&set.name)
            .next()
            .map(text_of)
            .filter(|n| is_valid_name(n))
        else {
            return Ok(None);
        };

        let Some(email) = self.find_email(container, set)? else {
            return Ok(None);
        };

        let department = self
            .find_department(container, set, &email)
            .unwrap_or_else(|| self.default_department.to_string());

        if department.is_empty() && collected >= self.config.max_unlabeled_records {
            return Ok(None);
        }

        Ok(ProfessorRecord::new(name, email, department))
    }

    fn find_email(&self, container: ElementRef<'_>, set: &CompiledSet) -> Result<Option<String>> {
        if let Some(address) = mail_links(container)?.into_iter().find_map(mailto_address) {
            return Ok(Some(address));
        }

        let from_element = container
            .select(&set.email)
            .next()
            .and_then(|el| extract_email(&text_of(el)));

        Ok(from_element.or_else(|| extract_email(&raw_text(container))))
    }

    fn find_department(
        &self,
        container: ElementRef<'_>,
        set: &CompiledSet,
        email: &str,
    ) -> Option<String> {
        let labelled = container
            .select(&set.department)
            .next()
            .map(text_of)
            .filter(|t| !t.is_empty());
        if labelled.is_some() {
            return labelled;
        }

        let inline = container.select(&self.block_selector).map(text_of).find(|text| {
            contains_any(text, CONTAINER_DEPARTMENT_KEYWORDS)
                && text.chars().count() < MAX_DEPARTMENT_CHARS
                && !text.contains(email)
        });
        if inline.is_some() {
            return inline;
        }

        let section = closest(container, &["div", "section", "article"])?;
        section.select(&self.heading_selector).map(text_of).find(|text| {
            contains_any(text, CONTAINER_DEPARTMENT_KEYWORDS)
                && text.chars().count() < MAX_DEPARTMENT_CHARS
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str, default_department: &str) -> Vec<ProfessorRecord> {
        let config = ExtractionConfig::default();
        let doc = Html::parse_document(html);
        SelectorCascade::new(&config, default_department)
            .unwrap()
            .extract(&doc)
            .unwrap()
    }

    #[test]
    fn test_member_container_with_mailto() {
        let records = run(
            r#"<div class="member"><h3>王小明</h3><a href="mailto:wang@x.edu.tw"></a></div>"#,
            "",
        );
        assert!(!records.is_empty());
        assert_eq!(records[0].name, "王小明");
        assert_eq!(records[0].email, "wang@x.edu.tw");
        assert_eq!(records[0].department, "");
    }

    #[test]
    fn test_email_from_text_and_department_class() {
        let records = run(
            r#"<div class="faculty">
                 <h2>Jane Doe</h2>
                 <span class="department">Department of Physics</span>
                 <p>jane (at) u (dot) edu</p>
               </div>"#,
            "",
        );
        assert_eq!(records[0].email, "jane@u.edu");
        assert_eq!(records[0].department, "Department of Physics");
    }

    #[test]
    fn test_department_from_inline_text_skips_email_line() {
        let records = run(
            r#"<div class="teacher">
                 <h3>陳大文</h3>
                 <p>chen@dept.example.edu</p>
                 <p>機械工程學系 副教授</p>
               </div>"#,
            "",
        );
        assert_eq!(records[0].department, "機械工程學系 副教授");
    }

    #[test]
    fn test_department_from_section_heading() {
        let records = run(
            r#"<section><h2>Institute of Statistics</h2>
                 <div class="profile"><h3>Alan Smith</h3><a href="mailto:alan@u.edu">mail</a></div>
               </section>"#,
            "",
        );
        assert_eq!(records[0].department, "Institute of Statistics");
    }

    #[test]
    fn test_default_department_applies() {
        let records = run(
            r#"<div class="card"><h4>Bob Lee</h4><a href="mailto:bob@u.edu">mail</a></div>"#,
            "化學系",
        );
        assert_eq!(records[0].department, "化學系");
    }

    #[test]
    fn test_invalid_name_skipped() {
        let records = run(
            r#"<div class="member"><h3>Contact Us</h3><a href="mailto:office@u.edu">mail</a></div>"#,
            "",
        );
        assert!(records.is_empty());
    }

    #[test]
    fn test_stops_after_threshold_set() {
        let records = run(
            r#"<div class="member"><h3>王一</h3><a href="mailto:a@u.edu">a</a></div>
               <div class="member"><h3>王二</h3><a href="mailto:b@u.edu">b</a></div>
               <div class="member"><h3>王三</h3><a href="mailto:c@u.edu">c</a></div>
               <div class="card"><h3>李四</h3><a href="mailto:d@u.edu">d</a></div>"#,
            "",
        );
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.name.starts_with('王')));
    }

    #[test]
    fn test_unlabeled_cap() {
        let config = ExtractionConfig {
            max_unlabeled_records: 1,
            ..ExtractionConfig::default()
        };
        let doc = Html::parse_document(
            r#"<div class="member"><h3>王一</h3><a href="mailto:a@u.edu">a</a></div>
               <div class="member"><h3>王二</h3><a href="mailto:b@u.edu">b</a></div>"#,
        );
        let records = SelectorCascade::new(&config, "")
            .unwrap()
            .extract(&doc)
            .unwrap();
        assert!(records.iter().all(|r| r.name == "王一"));
    }
}
