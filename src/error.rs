use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the failures that abort a comparison run.
///
/// Problems inside the comparators themselves (missing sheets, values that
/// cannot be compared) never show up here; they degrade to omitted sheets or
/// `N/A` cells instead.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the configuration file or run summary fails to (de)serialise.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a workbook cannot be turned into sheets.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when no reader is available for the input's spreadsheet format.
    #[error(
        "cannot read {path}: unsupported spreadsheet format '{extension}'; save the file as .xlsx and retry"
    )]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the threshold or marker list cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
