//! Error types for the piano roll core
//!
//! Structural problems in boundary payloads are reported through
//! `ValidationResult` lists, not through this enum. `PianoRollError` covers
//! the failures a caller has to handle explicitly.

use thiserror::Error;

/// Top-level error type
#[derive(Debug, Error)]
pub enum PianoRollError {
    /// A truly required field was absent while decoding a note record
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    /// Data failed validation and the active policy rejects it
    #[error("{context} validation failed: {}", .errors.join("; "))]
    InvalidData { context: String, errors: Vec<String> },

    /// Two parallel input arrays have different lengths
    #[error("Input arrays must have the same length (got {left} and {right})")]
    LengthMismatch { left: usize, right: usize },

    /// Every sample of a numeric series was filtered out
    #[error("No valid {0} data found")]
    NoValidData(String),

    /// JSON encoding/decoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PianoRollError>;
