//! List imports query
//!
//! Lists recent import jobs, newest first, with optional status and
//! uploader filters for the operational-visibility UI.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::imports::types::ImportJobRow;
use crate::models::{ImportJob, ImportStatus};

/// Default number of jobs returned when no limit is given
const DEFAULT_LIMIT: i64 = 50;

/// Upper bound on the number of jobs one request can fetch
const MAX_LIMIT: i64 = 200;

/// Query to list import jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListImportsQuery {
    /// Filter by lifecycle status (e.g. "completed", "failed")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Filter by uploader identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
    /// Limit number of results (default 50, max 200)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

/// Response for the list imports query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListImportsResponse {
    pub imports: Vec<ImportJob>,
    pub total: i64,
}

/// Error type for the list imports query
#[derive(Debug, thiserror::Error)]
pub enum ListImportsError {
    #[error("Invalid status filter: {0}")]
    InvalidStatus(String),

    #[error("Stored job is corrupt: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListImportsResponse, ListImportsError>> for ListImportsQuery {}

pub async fn handle(
    pool: PgPool,
    query: ListImportsQuery,
) -> Result<ListImportsResponse, ListImportsError> {
    // Validate the status filter up front so a typo is a 400, not an
    // empty result set.
    let status = match query.status.as_deref() {
        Some(s) => Some(
            s.parse::<ImportStatus>()
                .map_err(|_| ListImportsError::InvalidStatus(s.to_string()))?,
        ),
        None => None,
    };
    let status_text = status.map(|s| s.as_str().to_string());

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let rows = sqlx::query_as::<_, ImportJobRow>(
        r#"
        SELECT id, filename, source, module, status,
               total_rows, processed_rows, failed_rows, errors,
               uploaded_by, metadata, created_at, updated_at
        FROM import_jobs
        WHERE ($1::text IS NULL OR status = $1)
          AND ($2::text IS NULL OR uploaded_by = $2)
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(&status_text)
    .bind(&query.uploaded_by)
    .bind(limit)
    .fetch_all(&pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM import_jobs
        WHERE ($1::text IS NULL OR status = $1)
          AND ($2::text IS NULL OR uploaded_by = $2)
        "#,
    )
    .bind(&status_text)
    .bind(&query.uploaded_by)
    .fetch_one(&pool)
    .await?;

    let imports = rows
        .into_iter()
        .map(ImportJob::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(ListImportsError::Decode)?;

    Ok(ListImportsResponse {
        imports,
        total: total.0,
    })
}
