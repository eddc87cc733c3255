// src/models/selectors.rs

//! CSS selector sets for locating staff entries on a listing page.

/// Selectors that describe one layout idiom: the container wrapping a
/// single person plus the name, email and department elements inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorSet {
    /// Selector for each person container
    pub container: &'static str,

    /// Selector for the name element within a container
    pub name: &'static str,

    /// Selector for the email element within a container
    pub email: &'static str,

    /// Selector for the department element within a container
    pub department: &'static str,
}

const MAILTO: &str = r#"a[href^="mailto:"]"#;

/// Layout idioms tried in order by the selector cascade.
///
/// Order matters: the cascade stops after the first set that brings the
/// running total to the sufficiency threshold.
pub const SELECTOR_SETS: [SelectorSet; 12] = [
    SelectorSet {
        container: "div.member",
        name: "h3, h4, .name, strong, .member-name",
        email: MAILTO,
        department: ".dept, .department, .division",
    },
    SelectorSet {
        container: "div.faculty",
        name: "h2, h3, h4, .name, strong, .faculty-name",
        email: MAILTO,
        department: ".dept, .department, .division",
    },
    SelectorSet {
        container: "div.teacher",
        name: "h3, h4, .name, strong, .teacher-name",
        email: MAILTO,
        department: ".dept, .department, .division",
    },
    SelectorSet {
        container: "div.profile",
        name: "h2, h3, h4, .name, strong",
        email: MAILTO,
        department: ".dept, .department, .division",
    },
    SelectorSet {
        container: "li",
        name: "h3, h4, h5, strong, .name, a",
        email: MAILTO,
        department: ".dept, .department, .category",
    },
    SelectorSet {
        container: "article",
        name: "h2, h3, .title, strong",
        email: MAILTO,
        department: ".category, .department",
    },
    SelectorSet {
        container: "div.item",
        name: "h3, h4, .title, strong, .name",
        email: MAILTO,
        department: ".dept, .department",
    },
    SelectorSet {
        container: "div.card",
        name: "h3, h4, .title, strong, .name",
        email: MAILTO,
        department: ".dept, .department",
    },
    SelectorSet {
        container: r#"[class*="member"]"#,
        name: "h3, h4, strong, .name",
        email: MAILTO,
        department: ".dept, .department",
    },
    SelectorSet {
        container: r#"[class*="faculty"]"#,
        name: "h3, h4, strong, .name",
        email: MAILTO,
        department: ".dept, .department",
    },
    SelectorSet {
        container: r#"[class*="teacher"]"#,
        name: "h3, h4, strong, .name",
        email: MAILTO,
        department: ".dept, .department",
    },
    SelectorSet {
        container: r#"[class*="professor"]"#,
        name: "h3, h4, strong, .name",
        email: MAILTO,
        department: ".dept, .department",
    },
];

#[cfg(test)]
mod tests {
    use scraper::Selector;

    use super::*;

    #[test]
    fn test_all_selector_sets_parse() {
        for set in SELECTOR_SETS {
            for s in [set.container, set.name, set.email, set.department] {
                assert!(Selector::parse(s).is_ok(), "selector failed: {s}");
            }
        }
    }

    #[test]
    fn test_structural_sets_come_before_attribute_sets() {
        assert_eq!(SELECTOR_SETS[0].container, "div.member");
        assert_eq!(SELECTOR_SETS[11].container, r#"[class*="professor"]"#);
    }
}
