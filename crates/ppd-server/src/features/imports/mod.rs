//! Imports feature slice
//!
//! Vertical slice for the ingestion surface: the upload command that runs
//! the pipeline, and the job queries used by the operational-visibility UI.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::imports_routes;
