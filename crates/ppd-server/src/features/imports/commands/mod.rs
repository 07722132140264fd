//! Write operations for the imports feature

pub mod upload;

pub use upload::{UploadImportCommand, UploadImportError, UploadImportResponse};
