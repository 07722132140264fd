//! Tabular-spreadsheet (.xlsx/.xls) row parser
//!
//! Reads the first worksheet. Row 1 is the header; a data row is included
//! only if at least one of its cells is non-empty. Numbers and dates keep
//! their native type; everything else becomes a trimmed string.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::{CellValue, ParsedRow};
use crate::ingest::IngestError;

pub fn parse(bytes: &[u8]) -> Result<Vec<ParsedRow>, IngestError> {
    let cursor = Cursor::new(bytes);
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| IngestError::Parse(format!("Failed to open workbook: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::Parse("Workbook has no worksheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestError::Parse(format!("Failed to read worksheet: {}", e)))?;

    let mut row_iter = range.rows();

    let headers: Vec<String> = match row_iter.next() {
        Some(header_row) => header_row.iter().map(header_label).collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for data_row in row_iter {
        let mut row = ParsedRow::new();
        let mut has_data = false;

        for (index, header) in headers.iter().enumerate() {
            let value = data_row.get(index).map(cell_to_value).unwrap_or(CellValue::Null);
            if !value.is_null() {
                has_data = true;
            }
            row.insert(header.clone(), value);
        }

        if has_data {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Convert one spreadsheet cell into a [`CellValue`]
pub fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(trimmed.to_string())
            }
        },
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::Date(naive),
            None => CellValue::Null,
        },
        Data::DateTimeIso(s) => match s.parse() {
            Ok(naive) => CellValue::Date(naive),
            Err(_) => CellValue::Text(s.trim().to_string()),
        },
        Data::DurationIso(s) => CellValue::Text(s.trim().to_string()),
        // Cell-level spreadsheet errors (#N/A etc.) carry no usable value
        Data::Error(_) => CellValue::Null,
    }
}

fn header_label(cell: &Data) -> String {
    cell_to_value(cell).to_display_string().trim().to_string()
}
