//! Row parsers for the three supported input formats
//!
//! Each parser implements the same contract: raw bytes in, an ordered
//! sequence of flat key-value rows out. Column names come from the header
//! row for the tabular formats and from positional `column_N` keys for the
//! heuristic document path.

pub mod delimited;
pub mod document;
pub mod spreadsheet;

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::format::{detect_format, FileFormat};
use super::IngestError;

/// A single parsed cell value
///
/// Values keep their native type where the source format preserves one
/// (numbers and dates in spreadsheets, opportunistically-cast numbers in
/// delimited text); everything else is a trimmed string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Number(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Render the value as the string an operator would have typed
    ///
    /// Whole numbers print without a trailing `.0` so numeric badge ids
    /// round-trip cleanly.
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            },
            CellValue::Date(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

/// One parsed row: column name -> raw cell value
pub type ParsedRow = HashMap<String, CellValue>;

/// Parse an uploaded file into rows, dispatching on the detected format
///
/// Fails with a job-level [`IngestError`] when the extension is unsupported
/// or the bytes cannot be read as the claimed format.
pub fn parse_file(bytes: &[u8], filename: &str) -> Result<Vec<ParsedRow>, IngestError> {
    match detect_format(filename)? {
        FileFormat::Spreadsheet => spreadsheet::parse(bytes),
        FileFormat::Delimited => delimited::parse(bytes),
        FileFormat::Document => document::parse(bytes),
    }
}
