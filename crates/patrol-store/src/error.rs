//! Error types for the quarantine store

use thiserror::Error;

/// Errors that can occur while copying evidence or writing reports
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The temporary report file could not be moved into place
    #[error("Failed to persist {path}: {message}")]
    Persist {
        /// Destination that was being written
        path: String,
        /// Underlying error
        message: String,
    },

    /// The source path has no file name to copy under
    #[error("Invalid source path: {0}")]
    InvalidSource(String),

    /// No free name could be reserved for a copy
    #[error("No free name for {0} in quarantine folder")]
    NameExhausted(String),
}
