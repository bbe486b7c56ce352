//! Error types for the salesboard library.

use std::path::PathBuf;
use thiserror::Error;

use crate::mapping::MappingError;

/// Main error type for salesboard operations.
#[derive(Debug, Error)]
pub enum SalesError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Table has no rows or no columns.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A row does not have one cell per header.
    #[error("Not tabular: row {row} has {found} cells, expected {expected}")]
    NotTabular {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A table column is not part of the canonical vocabulary.
    #[error("Column '{0}' is not a canonical or derived column")]
    NotCanonical(String),

    /// The column mapping failed validation.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for salesboard operations.
pub type Result<T> = std::result::Result<T, SalesError>;
