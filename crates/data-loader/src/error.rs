//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur during dataset loading and parsing.
///
/// A load failure is fatal for the engine: it cannot serve without its base
/// dataset, so these errors propagate to the composition root instead of
/// being silently degraded.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV-level error (malformed record, unbalanced quotes, ...)
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// A record couldn't be interpreted
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A required column is missing from the header row
    #[error("Missing column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    /// Two catalog rows share the same item id
    #[error("Duplicate item id: {item_id}")]
    DuplicateItem { item_id: String },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
