pub use mediator::DefaultAsyncMediator;
use sqlx::PgPool;

use crate::ingest::IngestionPipeline;

pub mod middleware;

pub type AppMediator = DefaultAsyncMediator;

pub fn build_mediator(pool: PgPool, pipeline: IngestionPipeline) -> AppMediator {
    DefaultAsyncMediator::builder()
        // Imports
        .add_handler({
            let pool = pool.clone();
            let pipeline = pipeline.clone();
            move |cmd| {
                let pool = pool.clone();
                let pipeline = pipeline.clone();
                async move {
                    crate::features::imports::commands::upload::handle(pipeline, pool, cmd).await
                }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::imports::queries::list_imports::handle(pool, query).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::imports::queries::get_import::handle(pool, query).await }
            }
        })
        .build()
}
