// src/services/dedup.rs

//! Result deduplication.

use std::collections::HashSet;

use crate::models::ProfessorRecord;
use crate::services::names::is_valid_name;
use crate::utils::normalize_whitespace;

/// Keep the first record per (name, email) key, case-insensitively, in
/// discovery order. Names are whitespace-normalised and re-validated.
pub fn deduplicate(records: Vec<ProfessorRecord>) -> Vec<ProfessorRecord> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());

    for mut record in records {
        if !is_valid_name(&record.name) {
            continue;
        }

        let name = normalize_whitespace(&record.name);
        let key = (name.to_lowercase(), record.email.trim().to_lowercase());

        if seen.insert(key) {
            record.name = name;
            unique.push(record);
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, email: &str, department: &str) -> ProfessorRecord {
        ProfessorRecord {
            name: name.to_string(),
            email: email.to_string(),
            department: department.to_string(),
        }
    }

    #[test]
    fn test_collapses_case_and_whitespace_variants() {
        let result = deduplicate(vec![
            record("Jane  Doe", "Jane@U.edu", "Physics"),
            record("jane doe", "jane@u.edu ", ""),
            record("John Roe", "john@u.edu", ""),
        ]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Jane Doe");
        assert_eq!(result[0].department, "Physics");
        assert_eq!(result[1].name, "John Roe");
    }

    #[test]
    fn test_same_name_different_email_kept() {
        let result = deduplicate(vec![
            record("王小明", "wang@a.edu", ""),
            record("王小明", "wang@b.edu", ""),
        ]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_drops_invalid_names() {
        let result = deduplicate(vec![record("Contact", "c@u.edu", "")]);
        assert!(result.is_empty());
    }
}
