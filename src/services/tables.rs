// src/services/tables.rs

//! Table fallback: one person per `<tr>`.

use scraper::{ElementRef, Html};

use crate::error::Result;
use crate::models::ProfessorRecord;
use crate::models::keywords::{TABLE_DEPARTMENT_KEYWORDS, contains_any};
use crate::services::email::extract_email;
use crate::services::names::is_valid_name;
use crate::utils::dom::{mail_links, mailto_address, parse_selector, text_of};

const MAX_DEPARTMENT_CHARS: usize = 50;

/// Scan every table row with at least two cells for a name and an email.
pub fn extract(document: &Html, default_department: &str) -> Result<Vec<ProfessorRecord>> {
    let row_sel = parse_selector("table tr")?;
    let mut records = Vec::new();

    for row in document.select(&row_sel) {
        let cells: Vec<ElementRef<'_>> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| matches!(el.value().name(), "td" | "th"))
            .collect();

        if cells.len() < 2 {
            continue;
        }

        if let Some(record) = parse_row(&cells, default_department)? {
            records.push(record);
        }
    }

    Ok(records)
}

fn parse_row(cells: &[ElementRef<'_>], default_department: &str) -> Result<Option<ProfessorRecord>> {
    let Some(name) = cells
        .iter()
        .take(3)
        .map(|cell| text_of(*cell))
        .find(|text| is_valid_name(text))
    else {
        return Ok(None);
    };

    let mut email: Option<String> = None;
    let mut department: Option<String> = None;

    for cell in cells {
        // A mail-link in any cell wins over text found in earlier cells.
        if let Some(address) = mail_links(*cell)?.into_iter().find_map(mailto_address) {
            email = Some(address);
            continue;
        }

        let text = text_of(*cell);
        if email.is_none() {
            email = extract_email(&text);
        }
        if department.is_none()
            && contains_any(&text, TABLE_DEPARTMENT_KEYWORDS)
            && text.chars().count() < MAX_DEPARTMENT_CHARS
        {
            department = Some(text);
        }
    }

    let Some(email) = email else {
        return Ok(None);
    };

    let department = department.unwrap_or_else(|| default_department.to_string());
    Ok(ProfessorRecord::new(name, email, department))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_row_table() {
        let doc = Html::parse_document(
            "<table>
               <tr><td>李四</td><td>lisi@u.edu</td></tr>
               <tr><td>張三</td><td>zhang@u.edu</td></tr>
             </table>",
        );
        let records = extract(&doc, "").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "李四");
        assert_eq!(records[0].email, "lisi@u.edu");
        assert_eq!(records[1].name, "張三");
        assert_eq!(records[1].department, "");
    }

    #[test]
    fn test_department_cell_and_mailto() {
        let doc = Html::parse_document(
            r#"<table>
                 <tr><th>Name</th><th>Unit</th><th>Mail</th></tr>
                 <tr><td>No.</td><td>Ada Lovelace</td><td>Department of Mathematics</td>
                     <td><a href="mailto:ada@u.edu">write</a></td></tr>
               </table>"#,
        );
        let records = extract(&doc, "數學系").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Ada Lovelace");
        assert_eq!(records[0].email, "ada@u.edu");
        assert_eq!(records[0].department, "Department of Mathematics");
    }

    #[test]
    fn test_default_department_when_no_cell_matches() {
        let doc = Html::parse_document(
            "<table><tr><td>Grace Hopper</td><td>grace@u.edu</td></tr></table>",
        );
        let records = extract(&doc, "資訊科學系").unwrap();
        assert_eq!(records[0].department, "資訊科學系");
    }

    #[test]
    fn test_single_cell_rows_ignored() {
        let doc = Html::parse_document("<table><tr><td>王小明 wang@u.edu</td></tr></table>");
        assert!(extract(&doc, "").unwrap().is_empty());
    }
}
