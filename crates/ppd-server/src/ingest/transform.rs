//! Module transformers
//!
//! Three pure functions, one per record kind, each mapping a parsed row to
//! a typed [`NewPerformanceRecord`] or a row-level failure reason. The
//! badge id is the single required field across all three kinds; every
//! other field is optional and read through multiple header aliases.
//!
//! No transformer performs cross-field validation: a future-dated
//! conviction is accepted by design, and the test suite treats that as a
//! documented assumption rather than a gap.

use crate::models::{ModuleKind, NewPerformanceRecord, RecordDetail};

use super::normalize::{clean_value, coerce_date, coerce_number, extract_badge_id};
use super::parser::{CellValue, ParsedRow};

/// Failure reason shared by all module kinds when no badge alias matches
pub const MISSING_BADGE_ID: &str = "Missing badge ID";

const OFFICER_NAME_ALIASES: [&str; 3] = ["officerName", "Officer Name", "officer_name"];
const DEPARTMENT_ALIASES: [&str; 2] = ["department", "Department"];
const DISTRICT_ALIASES: [&str; 2] = ["district", "District"];

const DRIVE_NAME_ALIASES: [&str; 3] = ["driveName", "Drive Name", "drive_name"];
const DRIVE_DATE_ALIASES: [&str; 3] = ["driveDate", "Drive Date", "drive_date"];
const CASES_HANDLED_ALIASES: [&str; 3] = ["casesHandled", "Cases Handled", "cases_handled"];

const CASE_NUMBER_ALIASES: [&str; 3] = ["caseNumber", "Case Number", "case_number"];
const CONVICTION_DATE_ALIASES: [&str; 3] =
    ["convictionDate", "Conviction Date", "conviction_date"];
const CRIME_TYPE_ALIASES: [&str; 3] = ["crimeType", "Crime Type", "crime_type"];
const COURT_NAME_ALIASES: [&str; 3] = ["courtName", "Court Name", "court_name"];

const DETECTION_DATE_ALIASES: [&str; 3] = ["detectionDate", "Detection Date", "detection_date"];
const CRIME_CATEGORY_ALIASES: [&str; 3] = ["crimeCategory", "Crime Category", "crime_category"];
const VALUE_RECOVERED_ALIASES: [&str; 3] = ["valueRecovered", "Value Recovered", "value_recovered"];

/// Transform one parsed row into a typed record for the declared module
///
/// Returns the row-level failure reason on rejection; the orchestrator
/// attaches the row number and failure stage.
pub fn transform_row(
    module: ModuleKind,
    row: &ParsedRow,
) -> Result<NewPerformanceRecord, String> {
    let badge_id = extract_badge_id(row).ok_or_else(|| MISSING_BADGE_ID.to_string())?;

    let detail = match module {
        ModuleKind::SpecialDrives => RecordDetail::SpecialDrive {
            drive_name: text_field(row, &DRIVE_NAME_ALIASES),
            drive_date: date_field(row, &DRIVE_DATE_ALIASES),
            cases_handled: count_field(row, &CASES_HANDLED_ALIASES),
        },
        ModuleKind::Convictions => RecordDetail::Conviction {
            case_number: text_field(row, &CASE_NUMBER_ALIASES),
            conviction_date: date_field(row, &CONVICTION_DATE_ALIASES),
            crime_type: text_field(row, &CRIME_TYPE_ALIASES),
            court_name: display_field(row, &COURT_NAME_ALIASES),
        },
        ModuleKind::Detections => RecordDetail::Detection {
            detection_date: date_field(row, &DETECTION_DATE_ALIASES),
            crime_category: text_field(row, &CRIME_CATEGORY_ALIASES),
            value_recovered: amount_field(row, &VALUE_RECOVERED_ALIASES),
        },
    };

    Ok(NewPerformanceRecord {
        badge_id,
        officer_name: display_field(row, &OFFICER_NAME_ALIASES),
        department: display_field(row, &DEPARTMENT_ALIASES),
        district: display_field(row, &DISTRICT_ALIASES),
        detail,
        raw_data: serde_json::to_value(row).unwrap_or(serde_json::Value::Null),
    })
}

/// First non-null cleaned value among the given aliases
fn field(row: &ParsedRow, aliases: &[&str]) -> CellValue {
    for alias in aliases {
        if let Some(value) = row.get(*alias) {
            let cleaned = clean_value(value);
            if !cleaned.is_null() {
                return cleaned;
            }
        }
    }
    CellValue::Null
}

/// Text-typed field: only string cells count, anything else is absent
fn text_field(row: &ParsedRow, aliases: &[&str]) -> Option<String> {
    match field(row, aliases) {
        CellValue::Text(s) => Some(s),
        _ => None,
    }
}

/// Loosely-typed field: any non-null cell, rendered as text
fn display_field(row: &ParsedRow, aliases: &[&str]) -> Option<String> {
    let value = field(row, aliases);
    if value.is_null() {
        None
    } else {
        Some(value.to_display_string())
    }
}

fn date_field(row: &ParsedRow, aliases: &[&str]) -> Option<chrono::DateTime<chrono::Utc>> {
    coerce_date(&field(row, aliases))
}

/// Non-negative integer count; unparsable or absent values default to 0
fn count_field(row: &ParsedRow, aliases: &[&str]) -> i64 {
    coerce_number(&field(row, aliases))
        .map(|n| n as i64)
        .unwrap_or(0)
        .max(0)
}

/// Non-negative amount; unparsable or absent values default to 0
fn amount_field(row: &ParsedRow, aliases: &[&str]) -> f64 {
    coerce_number(&field(row, aliases)).unwrap_or(0.0).max(0.0)
}
