//! Get import query
//!
//! Fetches one import job together with a bounded sample of the
//! performance records it produced.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::imports::types::ImportJobRow;
use crate::models::{ImportJob, StoredRecord};

/// Maximum number of sample records returned alongside the job
const SAMPLE_RECORD_LIMIT: i64 = 100;

/// Query to fetch one import job by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetImportQuery {
    pub id: Uuid,
}

/// Response for the get import query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetImportResponse {
    #[serde(flatten)]
    pub job: ImportJob,
    pub sample_records: Vec<StoredRecord>,
}

/// Error type for the get import query
#[derive(Debug, thiserror::Error)]
pub enum GetImportError {
    #[error("Import job '{0}' not found")]
    NotFound(Uuid),

    #[error("Stored job is corrupt: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<GetImportResponse, GetImportError>> for GetImportQuery {}

pub async fn handle(pool: PgPool, query: GetImportQuery) -> Result<GetImportResponse, GetImportError> {
    let row = sqlx::query_as::<_, ImportJobRow>(
        r#"
        SELECT id, filename, source, module, status,
               total_rows, processed_rows, failed_rows, errors,
               uploaded_by, metadata, created_at, updated_at
        FROM import_jobs
        WHERE id = $1
        "#,
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetImportError::NotFound(query.id))?;

    let job = ImportJob::try_from(row).map_err(GetImportError::Decode)?;

    let sample_records = sqlx::query_as::<_, StoredRecord>(
        r#"
        SELECT id, module, badge_id, officer_name, department, district,
               drive_name, drive_date, cases_handled,
               case_number, conviction_date, crime_type, court_name,
               detection_date, crime_category, value_recovered,
               raw_data, import_job_id, created_at
        FROM performance_records
        WHERE import_job_id = $1
        ORDER BY created_at
        LIMIT $2
        "#,
    )
    .bind(query.id)
    .bind(SAMPLE_RECORD_LIMIT)
    .fetch_all(&pool)
    .await?;

    Ok(GetImportResponse {
        job,
        sample_records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_the_id() {
        let id = Uuid::new_v4();
        let err = GetImportError::NotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
    }
}
