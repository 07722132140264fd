//! Durable store client for the ingestion pipeline
//!
//! The pipeline never reaches for ambient global state: a store client is
//! constructed once at process start and injected into the orchestrator.
//! [`IngestStore`] is the seam — the production implementation is
//! [`postgres::PgStore`]; tests drive the orchestrator through an
//! in-memory implementation.

pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ImportSource, ImportStatus, ModuleKind, NewPerformanceRecord, RowError};

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Final counts and error list written when a job reaches a terminal state
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub status: ImportStatus,
    pub total_rows: i32,
    pub processed_rows: i32,
    pub failed_rows: i32,
    pub errors: Vec<RowError>,
}

/// Storage operations the ingestion orchestrator depends on
///
/// Every method is one blocking (awaited) round-trip; the orchestrator
/// calls them strictly in row order. `apply_kpis` must be atomic at the
/// store level — concurrent uploads naming the same badge id may interleave
/// and their increments must all survive.
#[async_trait]
pub trait IngestStore: Send + Sync {
    /// Create the import job in `pending` and return its id
    async fn create_job(
        &self,
        filename: &str,
        source: ImportSource,
        module: ModuleKind,
        uploaded_by: &str,
    ) -> Result<Uuid, StoreError>;

    /// Transition the job to `processing`
    async fn mark_processing(&self, job_id: Uuid) -> Result<(), StoreError>;

    /// Write the terminal status, counts, and error list
    async fn finalize_job(&self, job_id: Uuid, outcome: &JobOutcome) -> Result<(), StoreError>;

    /// Persist one transformed record, tagged with its owning job
    async fn insert_record(
        &self,
        job_id: Uuid,
        record: &NewPerformanceRecord,
    ) -> Result<Uuid, StoreError>;

    /// Find-or-create the officer aggregate and apply the record's KPI
    /// increment in a single atomic operation
    async fn apply_kpis(&self, record: &NewPerformanceRecord) -> Result<(), StoreError>;
}
