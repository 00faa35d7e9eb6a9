//! Error types for scan runs

use patrol_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a scan before or after the file pipeline runs
///
/// Problems with individual files never surface here; they are logged and
/// counted in [`ScanMetrics`](crate::ScanMetrics).
#[derive(Error, Debug)]
pub enum ScanError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The scan root does not exist or is not a readable directory
    #[error("Cannot scan {path}: {reason}")]
    RootInaccessible {
        /// Root that was requested
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Output folder or report could not be written
    #[error("Output error: {0}")]
    Store(#[from] StoreError),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
