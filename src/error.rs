use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Error type returned by extraction functions.
///
/// This is a single error enum shared across all format readers and the
/// unified extractor.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet decoder error.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// JSON parse error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Archive decoder error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The file extension is missing or maps to no supported format.
    ///
    /// Raised before any I/O is attempted.
    #[error("unsupported format: '{}' has an unknown or missing extension", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The file content does not match the shape its format requires
    /// (e.g. a JSON file whose top level is not an array).
    #[error("invalid structure: {message}")]
    InvalidStructure { message: String },

    /// No archive entry matched the requested target.
    #[error("no matching entry found in archive '{}'", path.display())]
    NoEntryFound { path: PathBuf },

    /// A single row failed to parse.
    ///
    /// This kind is recoverable: readers skip the row, report it to the
    /// configured observer, and continue. It is never returned from an
    /// extraction call.
    #[error("failed to parse row {row}: {message}")]
    RowParse { row: usize, message: String },
}
