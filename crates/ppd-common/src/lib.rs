//! PPD Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the PPD workspace.
//!
//! # Overview
//!
//! This crate provides functionality used across all PPD workspace members:
//!
//! - **Error Handling**: the [`PpdError`] type and the [`Result`] alias
//! - **Logging**: centralized `tracing` configuration and initialization
//!
//! # Example
//!
//! ```no_run
//! use ppd_common::logging::{LogConfig, init_logging};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{PpdError, Result};
