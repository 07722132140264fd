//! File ingestion pipeline
//!
//! Converts uploaded performance-record files (spreadsheet, delimited text,
//! or loosely-structured documents) into typed records and folds them into
//! the per-officer aggregates, tracking every upload through an import job.
//!
//! Data flows one way: bytes -> parsed rows -> transformed records ->
//! persisted records + aggregate increments -> finalized import job.
//!
//! Failures are two-tier: a row-level failure (bad badge id, rejected
//! transform, per-row store error) is recorded on the job and the batch
//! continues; a job-level failure (unsupported format, unreadable file)
//! aborts the upload and surfaces to the caller.

pub mod format;
pub mod kpi;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod transform;

use thiserror::Error;

use crate::store::StoreError;

/// Job-level ingestion failures
///
/// Row-level failures never surface here; they are recorded on the import
/// job instead.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse file: {0}")]
    Parse(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub use format::{detect_format, FileFormat};
pub use pipeline::{IngestionPipeline, IngestionReport};
