//! Shared row-mapping types for the imports feature

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{ImportJob, RowError};

/// Raw `import_jobs` row as fetched by the queries in this feature
///
/// Enum-typed columns come back as text and are parsed during conversion so
/// a corrupt row surfaces as a decode error instead of a panic.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImportJobRow {
    pub id: Uuid,
    pub filename: String,
    pub source: String,
    pub module: String,
    pub status: String,
    pub total_rows: i32,
    pub processed_rows: i32,
    pub failed_rows: i32,
    pub errors: serde_json::Value,
    pub uploaded_by: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ImportJobRow> for ImportJob {
    type Error = String;

    fn try_from(row: ImportJobRow) -> Result<Self, Self::Error> {
        let errors: Vec<RowError> = serde_json::from_value(row.errors)
            .map_err(|e| format!("invalid errors payload: {}", e))?;

        Ok(ImportJob {
            id: row.id,
            filename: row.filename,
            source: row
                .source
                .parse()
                .map_err(|e| format!("invalid source: {}", e))?,
            module: row
                .module
                .parse()
                .map_err(|e| format!("invalid module: {}", e))?,
            status: row
                .status
                .parse()
                .map_err(|e| format!("invalid status: {}", e))?,
            total_rows: row.total_rows,
            processed_rows: row.processed_rows,
            failed_rows: row.failed_rows,
            errors,
            uploaded_by: row.uploaded_by,
            metadata: row.metadata,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImportSource, ImportStatus, ModuleKind};

    fn base_row() -> ImportJobRow {
        ImportJobRow {
            id: Uuid::new_v4(),
            filename: "drives.csv".to_string(),
            source: "CCTNS_SpecialDrives".to_string(),
            module: "SpecialDrives".to_string(),
            status: "completed".to_string(),
            total_rows: 3,
            processed_rows: 2,
            failed_rows: 1,
            errors: serde_json::json!([
                {"row": 2, "field": "transformation", "message": "Missing badge ID"}
            ]),
            uploaded_by: "admin".to_string(),
            metadata: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts_to_job() {
        let job = ImportJob::try_from(base_row()).unwrap();
        assert_eq!(job.source, ImportSource::CctnsSpecialDrives);
        assert_eq!(job.module, ModuleKind::SpecialDrives);
        assert_eq!(job.status, ImportStatus::Completed);
        assert_eq!(job.errors.len(), 1);
        assert_eq!(job.errors[0].message, "Missing badge ID");
    }

    #[test]
    fn test_invalid_status_is_a_decode_error() {
        let mut row = base_row();
        row.status = "exploded".to_string();
        let err = ImportJob::try_from(row).unwrap_err();
        assert!(err.contains("invalid status"));
    }
}
