//! Domain models for the import pipeline
//!
//! Import jobs, the three performance-record shapes, and the per-row error
//! entry recorded on a job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Import job lifecycle status
///
/// `pending -> processing -> {completed, failed}`. A job is immutable once
/// it reaches a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ImportStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ImportStatus::Pending => "pending",
            ImportStatus::Processing => "processing",
            ImportStatus::Completed => "completed",
            ImportStatus::Failed => "failed",
        }
    }

    /// Whether the status is terminal (no further transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportStatus::Completed | ImportStatus::Failed)
    }
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ImportStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ImportStatus::Pending),
            "processing" => Ok(ImportStatus::Processing),
            "completed" => Ok(ImportStatus::Completed),
            "failed" => Ok(ImportStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid import status: {}", s)),
        }
    }
}

/// Declared origin of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportSource {
    #[serde(rename = "CCTNS_SpecialDrives")]
    CctnsSpecialDrives,
    #[serde(rename = "CCTNS_Convictions")]
    CctnsConvictions,
    #[serde(rename = "CCTNS_Detections")]
    CctnsDetections,
    Manual,
    Excel,
    #[serde(rename = "CSV")]
    Csv,
    #[serde(rename = "PDF")]
    Pdf,
}

impl ImportSource {
    pub const ALL: [&'static str; 7] = [
        "CCTNS_SpecialDrives",
        "CCTNS_Convictions",
        "CCTNS_Detections",
        "Manual",
        "Excel",
        "CSV",
        "PDF",
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ImportSource::CctnsSpecialDrives => "CCTNS_SpecialDrives",
            ImportSource::CctnsConvictions => "CCTNS_Convictions",
            ImportSource::CctnsDetections => "CCTNS_Detections",
            ImportSource::Manual => "Manual",
            ImportSource::Excel => "Excel",
            ImportSource::Csv => "CSV",
            ImportSource::Pdf => "PDF",
        }
    }
}

impl std::fmt::Display for ImportSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ImportSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CCTNS_SpecialDrives" => Ok(ImportSource::CctnsSpecialDrives),
            "CCTNS_Convictions" => Ok(ImportSource::CctnsConvictions),
            "CCTNS_Detections" => Ok(ImportSource::CctnsDetections),
            "Manual" => Ok(ImportSource::Manual),
            "Excel" => Ok(ImportSource::Excel),
            "CSV" => Ok(ImportSource::Csv),
            "PDF" => Ok(ImportSource::Pdf),
            _ => Err(anyhow::anyhow!(
                "Invalid source '{}'. Must be one of: {}",
                s,
                ImportSource::ALL.join(", ")
            )),
        }
    }
}

/// The three record kinds an upload can declare
///
/// A closed enum: adding a fourth kind is a compile-time-checked change in
/// the transformers, the KPI deltas, and the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleKind {
    SpecialDrives,
    Convictions,
    Detections,
}

impl ModuleKind {
    pub const ALL: [&'static str; 3] = ["SpecialDrives", "Convictions", "Detections"];

    pub fn as_str(&self) -> &str {
        match self {
            ModuleKind::SpecialDrives => "SpecialDrives",
            ModuleKind::Convictions => "Convictions",
            ModuleKind::Detections => "Detections",
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModuleKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SpecialDrives" => Ok(ModuleKind::SpecialDrives),
            "Convictions" => Ok(ModuleKind::Convictions),
            "Detections" => Ok(ModuleKind::Detections),
            _ => Err(anyhow::anyhow!(
                "Invalid module '{}'. Must be one of: {}",
                s,
                ModuleKind::ALL.join(", ")
            )),
        }
    }
}

/// One recorded row-level failure on an import job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-indexed data row number; 0 for job-level (file parsing) failures
    pub row: i32,
    /// Which stage produced the failure: "transformation", "general",
    /// or "file_parsing"
    pub field: String,
    pub message: String,
}

impl RowError {
    pub fn new(row: i32, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Import job: the audit/status record for one upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJob {
    pub id: Uuid,
    pub filename: String,
    pub source: ImportSource,
    pub module: ModuleKind,
    pub status: ImportStatus,
    pub total_rows: i32,
    pub processed_rows: i32,
    pub failed_rows: i32,
    pub errors: Vec<RowError>,
    pub uploaded_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Module-specific payload of a performance record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "module")]
pub enum RecordDetail {
    SpecialDrive {
        drive_name: Option<String>,
        drive_date: Option<DateTime<Utc>>,
        cases_handled: i64,
    },
    Conviction {
        case_number: Option<String>,
        conviction_date: Option<DateTime<Utc>>,
        crime_type: Option<String>,
        court_name: Option<String>,
    },
    Detection {
        detection_date: Option<DateTime<Utc>>,
        crime_category: Option<String>,
        value_recovered: f64,
    },
}

impl RecordDetail {
    pub fn module(&self) -> ModuleKind {
        match self {
            RecordDetail::SpecialDrive { .. } => ModuleKind::SpecialDrives,
            RecordDetail::Conviction { .. } => ModuleKind::Convictions,
            RecordDetail::Detection { .. } => ModuleKind::Detections,
        }
    }
}

/// A successfully transformed row, ready to persist
///
/// Carries the raw parsed row for audit/replay alongside the typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPerformanceRecord {
    pub badge_id: String,
    pub officer_name: Option<String>,
    pub department: Option<String>,
    pub district: Option<String>,
    pub detail: RecordDetail,
    pub raw_data: serde_json::Value,
}

impl NewPerformanceRecord {
    pub fn module(&self) -> ModuleKind {
        self.detail.module()
    }
}

/// A persisted performance record as read back from the store
///
/// Flat shape for the query surface; module-specific columns are null for
/// the kinds that do not use them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredRecord {
    pub id: Uuid,
    pub module: String,
    pub badge_id: String,
    pub officer_name: Option<String>,
    pub department: Option<String>,
    pub district: Option<String>,
    pub drive_name: Option<String>,
    pub drive_date: Option<DateTime<Utc>>,
    pub cases_handled: Option<i64>,
    pub case_number: Option<String>,
    pub conviction_date: Option<DateTime<Utc>>,
    pub crime_type: Option<String>,
    pub court_name: Option<String>,
    pub detection_date: Option<DateTime<Utc>>,
    pub crime_category: Option<String>,
    pub value_recovered: Option<f64>,
    pub raw_data: serde_json::Value,
    pub import_job_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_status_round_trip() {
        for status in [
            ImportStatus::Pending,
            ImportStatus::Processing,
            ImportStatus::Completed,
            ImportStatus::Failed,
        ] {
            let parsed: ImportStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("invalid".parse::<ImportStatus>().is_err());
    }

    #[test]
    fn test_import_status_terminal() {
        assert!(!ImportStatus::Pending.is_terminal());
        assert!(!ImportStatus::Processing.is_terminal());
        assert!(ImportStatus::Completed.is_terminal());
        assert!(ImportStatus::Failed.is_terminal());
    }

    #[test]
    fn test_import_source_from_str() {
        assert_eq!(
            "CCTNS_SpecialDrives".parse::<ImportSource>().unwrap(),
            ImportSource::CctnsSpecialDrives
        );
        assert_eq!("CSV".parse::<ImportSource>().unwrap(), ImportSource::Csv);
        let err = "Fax".parse::<ImportSource>().unwrap_err();
        assert!(err.to_string().contains("Must be one of"));
    }

    #[test]
    fn test_module_kind_from_str() {
        assert_eq!(
            "Detections".parse::<ModuleKind>().unwrap(),
            ModuleKind::Detections
        );
        // Module names are exact, not case-insensitive
        assert!("detections".parse::<ModuleKind>().is_err());
    }

    #[test]
    fn test_record_detail_module() {
        let detail = RecordDetail::Conviction {
            case_number: None,
            conviction_date: None,
            crime_type: None,
            court_name: None,
        };
        assert_eq!(detail.module(), ModuleKind::Convictions);
    }
}
