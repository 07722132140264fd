//! Ingestion orchestrator
//!
//! Drives one upload end to end: create the import job, parse the file,
//! transform and persist each row in file order, apply the officer KPI
//! increment, and finalize the job with counts and the ordered error list.
//!
//! Failure policy:
//! - A row-level failure (transformer rejection or a per-row store error)
//!   is recorded and the batch continues. A batch with one success and 999
//!   failures still completes.
//! - A failure before any row is produced (unsupported format, unreadable
//!   bytes) marks the job `failed` with a single synthetic error and
//!   propagates to the caller as a hard failure.
//!
//! Processing is strictly sequential per upload: each store call is awaited
//! before the next row starts, and errors are recorded in file order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::{ImportSource, ImportStatus, ModuleKind, NewPerformanceRecord, RowError};
use crate::store::{IngestStore, JobOutcome, StoreError};

use super::parser::parse_file;
use super::transform::transform_row;
use super::IngestError;

/// Result returned to the caller for every upload that got past parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionReport {
    pub job_id: Uuid,
    pub status: ImportStatus,
    pub total_rows: i32,
    pub processed_rows: i32,
    pub failed_rows: i32,
    pub errors: Vec<RowError>,
}

/// The ingestion orchestrator
///
/// Owns nothing but the injected store client; one instance serves all
/// uploads.
#[derive(Clone)]
pub struct IngestionPipeline {
    store: Arc<dyn IngestStore>,
}

impl IngestionPipeline {
    pub fn new(store: Arc<dyn IngestStore>) -> Self {
        Self { store }
    }

    /// Run one upload through the pipeline
    #[tracing::instrument(
        skip(self, bytes),
        fields(filename = %filename, source = %source, module = %module, uploaded_by = %uploaded_by)
    )]
    pub async fn run(
        &self,
        bytes: &[u8],
        filename: &str,
        source: ImportSource,
        module: ModuleKind,
        uploaded_by: &str,
    ) -> Result<IngestionReport, IngestError> {
        let job_id = self
            .store
            .create_job(filename, source, module, uploaded_by)
            .await?;
        self.store.mark_processing(job_id).await?;

        let rows = match parse_file(bytes, filename) {
            Ok(rows) => rows,
            Err(err) => {
                self.fail_before_rows(job_id, &err).await;
                error!(job_id = %job_id, error = %err, "Import failed before any row was produced");
                return Err(err);
            },
        };

        let total_rows = rows.len() as i32;
        info!(job_id = %job_id, total_rows, "File parsed, processing rows");

        let mut errors: Vec<RowError> = Vec::new();
        let mut processed_rows = 0i32;
        let mut failed_rows = 0i32;

        for (index, row) in rows.iter().enumerate() {
            let row_number = (index + 1) as i32;

            match transform_row(module, row) {
                Ok(record) => match self.persist_row(job_id, &record).await {
                    Ok(()) => processed_rows += 1,
                    Err(err) => {
                        failed_rows += 1;
                        errors.push(RowError::new(row_number, "general", err.to_string()));
                    },
                },
                Err(reason) => {
                    failed_rows += 1;
                    errors.push(RowError::new(row_number, "transformation", reason));
                },
            }
        }

        // Permissive by design: any surviving row completes the job. Only a
        // non-empty file where every row failed is marked failed.
        let status = if total_rows > 0 && failed_rows == total_rows {
            ImportStatus::Failed
        } else {
            ImportStatus::Completed
        };

        let outcome = JobOutcome {
            status,
            total_rows,
            processed_rows,
            failed_rows,
            errors: errors.clone(),
        };
        self.store.finalize_job(job_id, &outcome).await?;

        info!(
            job_id = %job_id,
            status = %status,
            processed_rows,
            failed_rows,
            "Import finished"
        );

        Ok(IngestionReport {
            job_id,
            status,
            total_rows,
            processed_rows,
            failed_rows,
            errors,
        })
    }

    /// Persist one transformed row and fold it into the officer aggregate
    async fn persist_row(
        &self,
        job_id: Uuid,
        record: &NewPerformanceRecord,
    ) -> Result<(), StoreError> {
        self.store.insert_record(job_id, record).await?;
        self.store.apply_kpis(record).await?;
        Ok(())
    }

    /// Mark the job failed with a single synthetic parsing error
    async fn fail_before_rows(&self, job_id: Uuid, err: &IngestError) {
        let outcome = JobOutcome {
            status: ImportStatus::Failed,
            total_rows: 0,
            processed_rows: 0,
            failed_rows: 0,
            errors: vec![RowError::new(0, "file_parsing", err.to_string())],
        };
        if let Err(finalize_err) = self.store.finalize_job(job_id, &outcome).await {
            warn!(
                job_id = %job_id,
                error = %finalize_err,
                "Failed to record job-level parsing failure"
            );
        }
    }
}
