//! Read operations for the imports feature

pub mod get_import;
pub mod list_imports;

pub use get_import::{GetImportQuery, GetImportResponse};
pub use list_imports::{ListImportsQuery, ListImportsResponse};
