//! Error types for the segreview library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Error reading or accessing a file or directory.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A mapping table exists but cannot be used as a whole.
    #[error("Malformed mapping table '{path}': {message}")]
    MappingTable { path: PathBuf, message: String },

    /// Rating outside the five review categories.
    #[error("Invalid rating {0}: expected a value from 1 to 5")]
    InvalidRating(u8),

    /// Label that does not name a review category or mask status.
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// Operation requires a current case but the queue is exhausted.
    #[error("Review session is finished: no current case")]
    SessionFinished,

    /// The image collaborator could not persist an edited mask.
    #[error("Failed to write mask '{path}': {source}")]
    MaskWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The diagnostic trail could not be opened.
    #[error("Diagnostic trail error: {0}")]
    Trail(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReviewError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReviewError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for review operations.
pub type Result<T> = std::result::Result<T, ReviewError>;
