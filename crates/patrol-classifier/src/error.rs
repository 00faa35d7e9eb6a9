//! Error types for the Classifier

use patrol_llm::LlmError;
use patrol_store::StoreError;
use thiserror::Error;

/// Errors that can occur during classification
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Report could not be read or written
    #[error("Report error: {0}")]
    Store(#[from] StoreError),

    /// A snippet took longer than the configured timeout
    #[error("Classification timeout")]
    Timeout,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
