//! Professor record and deep-crawl link candidate.

use serde::{Deserialize, Serialize};

use crate::services::{email::is_valid_email, names::is_valid_name};

/// A contact record for one member of academic staff.
///
/// Field order is the export order (`name`, `email`, `department`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfessorRecord {
    /// Person name as displayed on the page
    pub name: String,

    /// Email address
    pub email: String,

    /// Department label (empty when none could be resolved)
    pub department: String,
}

impl ProfessorRecord {
    /// Build a record, returning `None` unless both the name and the email
    /// pass validation.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
    ) -> Option<Self> {
        let name = name.into();
        let email = email.into();

        if !is_valid_name(&name) || !is_valid_email(&email) {
            return None;
        }

        Some(Self {
            name,
            email,
            department: department.into(),
        })
    }
}

/// A same-domain link whose anchor text looks like a person's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub display_text: String,
    pub absolute_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_valid_pair() {
        let record = ProfessorRecord::new("王小明", "wang@x.edu.tw", "").unwrap();
        assert_eq!(record.name, "王小明");
        assert_eq!(record.department, "");
    }

    #[test]
    fn test_new_rejects_bad_name_or_email() {
        assert!(ProfessorRecord::new("首頁", "wang@x.edu.tw", "").is_none());
        assert!(ProfessorRecord::new("王小明", "not-an-email", "").is_none());
        assert!(ProfessorRecord::new("王小明", "a@b@c.edu", "").is_none());
    }

    #[test]
    fn test_serializes_in_export_order() {
        let record = ProfessorRecord::new("Jane Doe", "jane@u.edu", "Physics").unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Jane Doe","email":"jane@u.edu","department":"Physics"}"#
        );
    }
}
