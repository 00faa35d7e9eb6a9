//! PassPatrol LLM Provider Layer
//!
//! Pluggable text-generation backends used to judge keyword snippets.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use patrol_llm::{LlmProvider, MockProvider};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let provider = MockProvider::new("OK");
//! let result = rt.block_on(provider.generate("test prompt")).unwrap();
//! assert_eq!(result, "OK");
//! ```

#![warn(missing_docs)]

pub mod ollama;

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The provider could not be constructed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// A text-generation backend
///
/// Calls run on the async runtime; implementations must not block.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model identifier, for logs and reports
    fn model(&self) -> &str;
}

#[async_trait]
impl<P: LlmProvider + ?Sized> LlmProvider for Arc<P> {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).generate(prompt).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Responses can be keyed on a substring of the prompt, which suits prompts
/// that wrap the interesting text in a fixed template.
///
/// # Examples
///
/// ```
/// use patrol_llm::{LlmProvider, MockProvider};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
///
/// // Fixed response
/// let provider = MockProvider::new("OK");
/// assert_eq!(rt.block_on(provider.generate("any prompt")).unwrap(), "OK");
///
/// // Responses keyed on prompt content
/// let mut provider = MockProvider::default();
/// provider.add_response("hunter2", "pass=hunter2");
/// assert_eq!(rt.block_on(provider.generate("pwd: hunter2")).unwrap(), "pass=hunter2");
/// assert_eq!(rt.block_on(provider.generate("nothing here")).unwrap(), "OK");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, MockReply)>>>,
    call_count: Arc<Mutex<usize>>,
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Respond with `response` to any prompt containing `needle`
    ///
    /// Earlier registrations win when several needles match.
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail any prompt containing `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        lock(&self.responses).push((needle.into(), MockReply::Error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *lock(&self.call_count) = 0;
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("OK")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        *lock(&self.call_count) += 1;

        let responses = lock(&self.responses);
        let reply = responses
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
