//! KPI increments derived from performance records
//!
//! Each record kind maps to a fixed counter increment on the officer
//! aggregate. The delta is computed here as pure data; the store applies it
//! atomically (see `store::postgres`).

use crate::models::RecordDetail;

/// Substring (case-insensitive) that marks a detection as cyber-related
pub const CYBER_KEYWORD: &str = "cyber";

/// Counter increments to apply to one officer aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KpiDelta {
    pub cases_closed: i64,
    pub cyber_resolved: i64,
}

/// Compute the increment for one record
///
/// - Drive participation adds its cases-handled to `cases_closed`
/// - A conviction adds exactly 1 to `cases_closed`
/// - A detection adds 1 to `cyber_resolved` only when the crime category
///   contains the cyber keyword; otherwise no counter changes
pub fn kpi_delta(detail: &RecordDetail) -> KpiDelta {
    match detail {
        RecordDetail::SpecialDrive { cases_handled, .. } => KpiDelta {
            cases_closed: *cases_handled,
            cyber_resolved: 0,
        },
        RecordDetail::Conviction { .. } => KpiDelta {
            cases_closed: 1,
            cyber_resolved: 0,
        },
        RecordDetail::Detection { crime_category, .. } => {
            let is_cyber = crime_category
                .as_deref()
                .map(|category| category.to_lowercase().contains(CYBER_KEYWORD))
                .unwrap_or(false);
            KpiDelta {
                cases_closed: 0,
                cyber_resolved: if is_cyber { 1 } else { 0 },
            }
        },
    }
}
