//! Unstructured-document (.pdf) row parser
//!
//! Best-effort only: the whole document text is extracted, split into
//! non-empty lines, and each line is split on runs of two or more
//! whitespace characters (or a single tab). Lines yielding at least two
//! tokens become rows keyed `column_1`, `column_2`, ...
//!
//! There is no header concept and no way to recover named fields, so
//! documents without wide padding between columns will not parse into
//! anything useful. This path stays behind the common parser interface so
//! it can be swapped for a proper table extractor without touching the
//! orchestrator.

use super::{CellValue, ParsedRow};
use crate::ingest::IngestError;

pub fn parse(bytes: &[u8]) -> Result<Vec<ParsedRow>, IngestError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| IngestError::Parse(format!("Failed to extract document text: {}", e)))?;

    Ok(rows_from_text(&text))
}

/// Split extracted text into positional rows
pub fn rows_from_text(text: &str) -> Vec<ParsedRow> {
    let mut rows = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let tokens = split_columns(line);
        if tokens.len() < 2 {
            continue;
        }

        let mut row = ParsedRow::new();
        for (index, token) in tokens.into_iter().enumerate() {
            row.insert(format!("column_{}", index + 1), CellValue::Text(token));
        }
        rows.push(row);
    }

    rows
}

/// Split a line on runs of >=2 whitespace characters or a single tab
fn split_columns(line: &str) -> Vec<String> {
    // A tab counts as a full column break on its own
    let normalized = line.replace('\t', "  ");
    normalized
        .split("  ")
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_padding_splits_columns() {
        let rows = rows_from_text("B1021    Asha Patnaik    Cuttack\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].get("column_1"),
            Some(&CellValue::Text("B1021".to_string()))
        );
        assert_eq!(
            rows[0].get("column_2"),
            Some(&CellValue::Text("Asha Patnaik".to_string()))
        );
        assert_eq!(
            rows[0].get("column_3"),
            Some(&CellValue::Text("Cuttack".to_string()))
        );
    }

    #[test]
    fn test_tab_is_a_column_break() {
        let rows = rows_from_text("B1021\tAsha Patnaik\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].get("column_2"),
            Some(&CellValue::Text("Asha Patnaik".to_string()))
        );
    }

    #[test]
    fn test_single_spaces_stay_within_one_token() {
        // Prose paragraphs produce a single token and are dropped
        let rows = rows_from_text("This line is ordinary prose with single spaces.\n");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let rows = rows_from_text("\n\n   \nB1  Asha\n\n");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_no_tabular_lines_yields_zero_rows() {
        let text = "Quarterly summary\nAll units reported normally.\n";
        assert!(rows_from_text(text).is_empty());
    }

    #[test]
    fn test_garbage_bytes_are_a_parse_error() {
        assert!(parse(b"not a real document").is_err());
    }
}
