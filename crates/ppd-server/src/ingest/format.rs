//! File format detection
//!
//! Maps a filename extension to one of the three supported input formats.
//! Detection is purely name-based; the parsers themselves reject files whose
//! contents do not match the claimed extension.

use super::IngestError;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Tabular spreadsheet (.xlsx, .xls)
    Spreadsheet,
    /// Delimited text with a header row (.csv)
    Delimited,
    /// Loosely-structured document, parsed heuristically (.pdf)
    Document,
}

/// Detect the file format from a filename
///
/// Any extension outside the supported set fails with
/// [`IngestError::UnsupportedFormat`].
pub fn detect_format(filename: &str) -> Result<FileFormat, IngestError> {
    let ext = filename
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xls" => Ok(FileFormat::Spreadsheet),
        "csv" => Ok(FileFormat::Delimited),
        "pdf" => Ok(FileFormat::Document),
        _ => Err(IngestError::UnsupportedFormat(ext)),
    }
}
