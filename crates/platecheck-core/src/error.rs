//! Error types for the platecheck-core library.
//!
//! The plate heuristic itself is total and never fails; these errors cover the
//! ambient operations around it (configuration and recorded data).

use thiserror::Error;

/// Main error type for the platecheck library.
#[derive(Error, Debug)]
pub enum PlateError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A booking or OCR record could not be used.
    #[error("invalid record {record}: {reason}")]
    InvalidRecord { record: String, reason: String },
}

/// Result type for the platecheck library.
pub type Result<T> = std::result::Result<T, PlateError>;
