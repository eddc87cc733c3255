// src/services/email.rs

//! Email extraction from free text, including `(at)`/`(dot)` obfuscation.

use std::sync::LazyLock;

use regex::Regex;

/// Plain `local@domain.tld` addresses.
pub const STANDARD_EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

const EMAIL_PATTERNS: [&str; 3] = [
    STANDARD_EMAIL_PATTERN,
    r"[a-zA-Z0-9._%+-]+\s*\(at\)\s*[a-zA-Z0-9.-]+\s*\(dot\)\s*[a-zA-Z]{2,}",
    r"[a-zA-Z0-9._%+-]+\s*@\s*[a-zA-Z0-9.-]+\s*\.\s*[a-zA-Z]{2,}",
];

static EMAIL_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    EMAIL_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(&format!("(?i){p}")).ok())
        .collect()
});

static STANDARD_EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(STANDARD_EMAIL_PATTERN).ok());

/// Find the first email address in `text`, normalised to lowercase.
pub fn extract_email(text: &str) -> Option<String> {
    let found = EMAIL_REGEXES.iter().find_map(|re| re.find(text))?;

    let email: String = found
        .as_str()
        .to_lowercase()
        .replace("(at)", "@")
        .replace("(dot)", ".")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    Some(email)
}

/// All plain addresses in `text`, in order of appearance.
pub fn find_all_emails(text: &str) -> Vec<String> {
    STANDARD_EMAIL
        .as_ref()
        .map(|re| re.find_iter(text).map(|m| m.as_str().to_string()).collect())
        .unwrap_or_default()
}

/// Whether `email` has exactly one `@`, a non-empty local part without
/// whitespace and a dotted domain of `[A-Za-z0-9-]` labels ending in an
/// alphabetic TLD of at least two letters.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let Some((tld, rest)) = labels.split_last() else {
        return false;
    };

    !rest.is_empty()
        && rest.iter().all(|label| is_domain_label(label))
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_domain_label(label: &str) -> bool {
    !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_email() {
        assert_eq!(
            extract_email("Contact: Jane.Doe@Example.EDU today"),
            Some("jane.doe@example.edu".to_string())
        );
    }

    #[test]
    fn test_extract_obfuscated_email() {
        assert_eq!(
            extract_email("john (at) example (dot) edu"),
            Some("john@example.edu".to_string())
        );
        assert_eq!(
            extract_email("john(AT)example(DOT)edu"),
            Some("john@example.edu".to_string())
        );
    }

    #[test]
    fn test_extract_spaced_email() {
        assert_eq!(
            extract_email("mail: chen @ ee.ntu . edu"),
            Some("chen@ee.ntu.edu".to_string())
        );
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract_email("no address here"), None);
    }

    #[test]
    fn test_find_all_emails() {
        let found = find_all_emails("info@u.edu, then jane@u.edu");
        assert_eq!(found, vec!["info@u.edu", "jane@u.edu"]);
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("wang@x.edu.tw"));
        assert!(is_valid_email("j.doe+lab@cs.example.org"));
        assert!(!is_valid_email("wang@localhost"));
        assert!(!is_valid_email("@x.edu"));
        assert!(!is_valid_email("a@b@x.edu"));
        assert!(!is_valid_email("wang@x.e"));
        assert!(!is_valid_email("wang@x..edu"));
    }

    #[test]
    fn test_is_valid_email_rejects_bad_domain_labels() {
        assert!(!is_valid_email("wang@x edu.tw"));
        assert!(!is_valid_email("wang@x.edu .tw"));
        assert!(!is_valid_email("wang @x.edu.tw"));
        assert!(!is_valid_email("wang@x_y.edu.tw"));
        assert!(!is_valid_email("wang@x/y.edu"));
        assert!(is_valid_email("wang@cs-lab.x.edu.tw"));
    }
}
