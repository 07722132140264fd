//! Field normalization and badge id extraction
//!
//! Cleans raw cell values (trimming, mapping sentinel "empty" tokens to
//! null) and pulls the canonical badge identifier out of a row by checking
//! a fixed list of header aliases. Date promotion of plain strings is left
//! to the transformers that expect a date field, so numeric badge-like
//! strings are never mistaken for dates here.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::parser::{CellValue, ParsedRow};

/// Header aliases checked, in order, when extracting the badge id
pub const BADGE_ID_ALIASES: [&str; 9] = [
    "badgeId",
    "badge_id",
    "badge",
    "officerBadgeId",
    "officer_badge_id",
    "officer_id",
    "id",
    "Badge ID",
    "BadgeID",
];

/// Sentinel tokens treated as an empty cell (case-insensitive)
const NULL_TOKENS: [&str; 2] = ["null", "n/a"];

/// Date formats accepted when a transformer promotes a string to a date
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Normalize one raw cell value
///
/// Empty strings and the tokens "null" / "n/a" become [`CellValue::Null`];
/// text is trimmed; numbers and dates pass through unchanged.
pub fn clean_value(value: &CellValue) -> CellValue {
    match value {
        CellValue::Null => CellValue::Null,
        CellValue::Number(n) => CellValue::Number(*n),
        CellValue::Date(dt) => CellValue::Date(*dt),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty()
                || NULL_TOKENS
                    .iter()
                    .any(|token| trimmed.eq_ignore_ascii_case(token))
            {
                CellValue::Null
            } else {
                CellValue::Text(trimmed.to_string())
            }
        },
    }
}

/// Extract the badge id from a row
///
/// Checks each known alias in order; the first non-empty match is trimmed
/// and upper-cased. `None` is the canonical "row unusable" signal.
pub fn extract_badge_id(row: &ParsedRow) -> Option<String> {
    for alias in BADGE_ID_ALIASES {
        if let Some(value) = row.get(alias) {
            let cleaned = value.to_display_string().trim().to_uppercase();
            if !cleaned.is_empty() {
                return Some(cleaned);
            }
        }
    }
    None
}

/// Promote a cleaned value to a date, if possible
///
/// Native date cells pass through; text is tried against a fixed set of
/// formats (date-only and ISO datetime). Everything else is `None`.
pub fn coerce_date(value: &CellValue) -> Option<DateTime<Utc>> {
    match value {
        CellValue::Date(dt) => Some(dt.and_utc()),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            for format in DATE_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                    return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
                }
            }
            if let Ok(dt) = trimmed.parse::<NaiveDateTime>() {
                return Some(dt.and_utc());
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
                return Some(dt.with_timezone(&Utc));
            }
            None
        },
        _ => None,
    }
}

/// Coerce a cleaned value to a number, if possible
pub fn coerce_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(pairs: &[(&str, CellValue)]) -> ParsedRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_clean_value_trims_text() {
        assert_eq!(
            clean_value(&CellValue::Text("  Cuttack  ".to_string())),
            CellValue::Text("Cuttack".to_string())
        );
    }

    #[test]
    fn test_clean_value_null_tokens() {
        for token in ["", "   ", "null", "NULL", "n/a", "N/A"] {
            assert_eq!(
                clean_value(&CellValue::Text(token.to_string())),
                CellValue::Null,
                "token '{}' should normalize to null",
                token
            );
        }
    }

    #[test]
    fn test_clean_value_passes_numbers_through() {
        assert_eq!(
            clean_value(&CellValue::Number(42.0)),
            CellValue::Number(42.0)
        );
    }

    #[test]
    fn test_extract_badge_id_primary_alias() {
        let r = row(&[("badgeId", CellValue::Text("b1021".to_string()))]);
        assert_eq!(extract_badge_id(&r), Some("B1021".to_string()));
    }

    #[test]
    fn test_extract_badge_id_alias_order() {
        // "badgeId" wins over "id" even when both are present
        let r = row(&[
            ("id", CellValue::Text("IGNORED".to_string())),
            ("badgeId", CellValue::Text("B7".to_string())),
        ]);
        assert_eq!(extract_badge_id(&r), Some("B7".to_string()));
    }

    #[test]
    fn test_extract_badge_id_human_readable_alias() {
        let r = row(&[("Badge ID", CellValue::Text(" b9 ".to_string()))]);
        assert_eq!(extract_badge_id(&r), Some("B9".to_string()));
    }

    #[test]
    fn test_extract_badge_id_numeric_cell() {
        let r = row(&[("badge", CellValue::Number(1021.0))]);
        assert_eq!(extract_badge_id(&r), Some("1021".to_string()));
    }

    #[test]
    fn test_extract_badge_id_missing() {
        let r = row(&[("name", CellValue::Text("Asha".to_string()))]);
        assert_eq!(extract_badge_id(&r), None);

        let empty = row(&[("badgeId", CellValue::Null)]);
        assert_eq!(extract_badge_id(&empty), None);
    }

    #[test]
    fn test_coerce_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 14)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());

        for text in ["2026-03-14", "14/03/2026", "14-03-2026", "2026/03/14"] {
            assert_eq!(
                coerce_date(&CellValue::Text(text.to_string())),
                expected,
                "'{}' should parse as a date",
                text
            );
        }
    }

    #[test]
    fn test_coerce_date_rejects_badge_like_strings() {
        assert_eq!(coerce_date(&CellValue::Text("B1021".to_string())), None);
        assert_eq!(coerce_date(&CellValue::Number(20260314.0)), None);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&CellValue::Number(5.0)), Some(5.0));
        assert_eq!(coerce_number(&CellValue::Text(" 12.5 ".to_string())), Some(12.5));
        assert_eq!(coerce_number(&CellValue::Text("12 cases".to_string())), None);
        assert_eq!(coerce_number(&CellValue::Null), None);
    }
}
