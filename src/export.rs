// src/export.rs

//! CSV and JSON export of scraped records.

use std::fs;
use std::path::Path;

use chrono::Local;

use crate::error::{AppError, Result};
use crate::models::ProfessorRecord;

const UTF8_BOM: &str = "\u{feff}";

/// Export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// `professors_YYYYMMDD_HHMMSS.<ext>` in local time.
pub fn default_file_name(format: Format) -> String {
    format!(
        "professors_{}.{}",
        Local::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Pretty-printed JSON array; non-ASCII text is kept as-is.
pub fn to_json_string(records: &[ProfessorRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// CSV with a UTF-8 BOM and a `name,email,department` header.
///
/// An empty record set renders as an empty string.
pub fn to_csv_string(records: &[ProfessorRecord]) -> Result<String> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let mut wtr = csv::Writer::from_writer(Vec::from(UTF8_BOM.as_bytes()));
    for record in records {
        wtr.serialize(record)?;
    }
    let buf = wtr
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))?;

    String::from_utf8(buf).map_err(|e| AppError::validation(format!("CSV output: {e}")))
}

/// Write records as JSON to `path`.
pub fn write_json(path: &Path, records: &[ProfessorRecord]) -> Result<()> {
    fs::write(path, to_json_string(records)?)?;
    Ok(())
}

/// Write records as CSV to `path`. Nothing is written for an empty record
/// set; returns whether a file was created.
pub fn write_csv(path: &Path, records: &[ProfessorRecord]) -> Result<bool> {
    if records.is_empty() {
        return Ok(false);
    }
    fs::write(path, to_csv_string(records)?)?;
    Ok(true)
}
