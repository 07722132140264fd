//! Feature modules implementing the PPD API
//!
//! Each feature is a vertical slice following the CQRS pattern:
//! `commands/` for write operations, `queries/` for reads, `routes.rs` for
//! the HTTP surface, and `types.rs` for shared row mappings. Commands and
//! queries implement `mediator::Request`, keeping handlers wireable through
//! the mediator as well as callable directly from routes.
//!
//! # Features
//!
//! - **imports**: file upload ingestion and import-job visibility

pub mod imports;

use std::sync::Arc;

use axum::Router;

use crate::ingest::IngestionPipeline;
use crate::store::IngestStore;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool for query handlers
    pub db: sqlx::PgPool,
    /// The ingestion orchestrator with its injected store client
    pub pipeline: IngestionPipeline,
}

impl FeatureState {
    /// Build feature state from the pool and an explicit store client
    pub fn new(db: sqlx::PgPool, store: Arc<dyn IngestStore>) -> Self {
        Self {
            db,
            pipeline: IngestionPipeline::new(store),
        }
    }
}

/// Creates the main API router with all feature routes mounted
pub fn router(state: FeatureState) -> Router<()> {
    Router::new().nest("/imports", imports::imports_routes().with_state(state))
}
