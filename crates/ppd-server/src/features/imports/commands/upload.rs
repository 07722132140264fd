//! Upload import command
//!
//! Accepts raw file bytes plus the declared source, module, and uploader
//! identity, runs the ingestion pipeline synchronously, and records an
//! audit-log entry for the accepted upload.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::ingest::{IngestError, IngestionPipeline, IngestionReport};
use crate::models::{ImportSource, ImportStatus, ModuleKind, RowError};

/// Command to ingest one uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadImportCommand {
    pub filename: String,
    pub source: ImportSource,
    pub module: ModuleKind,
    pub uploaded_by: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

/// Structured result returned for every upload that got past parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadImportResponse {
    pub success: bool,
    pub job_id: Uuid,
    pub status: ImportStatus,
    pub total_rows: i32,
    pub processed_rows: i32,
    pub failed_rows: i32,
    pub errors: Vec<RowError>,
}

impl From<IngestionReport> for UploadImportResponse {
    fn from(report: IngestionReport) -> Self {
        Self {
            success: report.status == ImportStatus::Completed,
            job_id: report.job_id,
            status: report.status,
            total_rows: report.total_rows,
            processed_rows: report.processed_rows,
            failed_rows: report.failed_rows,
            errors: report.errors,
        }
    }
}

/// Errors that can occur when uploading an import
#[derive(Debug, thiserror::Error)]
pub enum UploadImportError {
    #[error("Filename is required and cannot be empty")]
    FilenameRequired,

    #[error("Filename must not exceed 255 characters")]
    FilenameLength,

    #[error("Uploader identity is required and cannot be empty")]
    UploadedByRequired,

    #[error("File content is required and cannot be empty")]
    ContentRequired,

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl Request<Result<UploadImportResponse, UploadImportError>> for UploadImportCommand {}

impl crate::cqrs::middleware::Command for UploadImportCommand {}

impl UploadImportCommand {
    pub fn validate(&self) -> Result<(), UploadImportError> {
        if self.filename.trim().is_empty() {
            return Err(UploadImportError::FilenameRequired);
        }
        if self.filename.len() > 255 {
            return Err(UploadImportError::FilenameLength);
        }
        if self.uploaded_by.trim().is_empty() {
            return Err(UploadImportError::UploadedByRequired);
        }
        if self.content.is_empty() {
            return Err(UploadImportError::ContentRequired);
        }
        Ok(())
    }
}

/// Handler function for the upload command
#[tracing::instrument(
    skip(pipeline, pool, command),
    fields(
        filename = %command.filename,
        source = %command.source,
        module = %command.module,
        uploaded_by = %command.uploaded_by
    )
)]
pub async fn handle(
    pipeline: IngestionPipeline,
    pool: PgPool,
    command: UploadImportCommand,
) -> Result<UploadImportResponse, UploadImportError> {
    command.validate()?;

    let report = pipeline
        .run(
            &command.content,
            &command.filename,
            command.source,
            command.module,
            &command.uploaded_by,
        )
        .await?;

    // The upload itself succeeded at this point; a failed audit write is
    // logged but does not fail the request.
    if let Err(e) = record_audit(&pool, &command, &report).await {
        tracing::warn!(job_id = %report.job_id, error = %e, "Failed to write audit log entry");
    }

    Ok(report.into())
}

async fn record_audit(
    pool: &PgPool,
    command: &UploadImportCommand,
    report: &IngestionReport,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, action, entity, entity_id, actor, metadata)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind("import.upload")
    .bind("import_job")
    .bind(report.job_id.to_string())
    .bind(&command.uploaded_by)
    .bind(serde_json::json!({
        "filename": command.filename,
        "source": command.source,
        "module": command.module,
        "total_rows": report.total_rows,
        "processed_rows": report.processed_rows,
        "failed_rows": report.failed_rows,
    }))
    .execute(pool)
    .await
    .map(|_| ())
}
