//! PPD Server Library
//!
//! HTTP server for ingesting personnel performance records.
//!
//! # Overview
//!
//! The server accepts heterogeneous performance-record files (spreadsheet,
//! delimited text, and loosely-structured document exports), converts each
//! row into one of three typed record kinds, and folds the results into a
//! running per-officer aggregate, producing an auditable import job per
//! upload:
//!
//! - **Ingestion Pipeline**: multi-format parsing, alias-based field
//!   extraction, per-row failure isolation (`ingest`)
//! - **Store Layer**: explicit injected store client with atomic aggregate
//!   increments (`store`)
//! - **API Endpoints**: multipart upload plus import-job visibility
//!   (`features`)
//! - **Database Management**: PostgreSQL integration with SQLx (`db`)
//! - **Configuration**: environment-based configuration (`config`)
//! - **Middleware**: CORS and request logging (`middleware`)
//!
//! # Architecture
//!
//! Features follow a **CQRS** layout: commands (write operations, audited)
//! and queries (read operations) are plain data structures handled by
//! standalone async functions, wireable through the `mediator` crate.
//!
//! ## Framework Stack
//!
//! - **Axum**: web framework
//! - **SQLx**: PostgreSQL access
//! - **Tower**: middleware and service abstractions
//!
//! # Example
//!
//! ```no_run
//! use ppd_server::config::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     println!("binding {}:{}", config.server.host, config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod ingest;
pub mod middleware;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use error::AppError;
