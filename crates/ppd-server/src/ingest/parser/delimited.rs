//! Delimited-text (CSV) row parser
//!
//! The header row defines column names. Every field is trimmed; empty
//! fields become null; anything that parses cleanly as a number is kept as
//! one, otherwise the text is retained as-is.

use csv::{ReaderBuilder, Trim};

use super::{CellValue, ParsedRow};
use crate::ingest::IngestError;

pub fn parse(bytes: &[u8]) -> Result<Vec<ParsedRow>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::Parse(format!("Failed to read CSV header row: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| IngestError::Parse(format!("Malformed CSV record: {}", e)))?;

        let mut row = ParsedRow::new();
        for (index, header) in headers.iter().enumerate() {
            let value = record.get(index).unwrap_or("");
            row.insert(header.clone(), coerce_scalar(value));
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Opportunistic numeric cast: keep text when the value does not parse
/// cleanly as a finite number.
fn coerce_scalar(value: &str) -> CellValue {
    if value.is_empty() {
        return CellValue::Null;
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(value.to_string()),
    }
}
