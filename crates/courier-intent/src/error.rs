//! Error types for intent resolution.

use courier_core::ValidationError;

/// Errors from a [`LanguageModelClient`](crate::LanguageModelClient).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    #[error("http error: {0}")]
    Http(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("provider error (status {status}): {message}")]
    Provider { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("timed out after {0}s")]
    Timeout(u64),
    #[error("language model unavailable")]
    Unavailable,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Http(err.to_string())
    }
}

/// Errors from [`IntentResolver::resolve`](crate::IntentResolver::resolve).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Model output was not a JSON object with a string `operation`.
    #[error("could not parse model output: {0}")]
    Parse(String),
    #[error("language model call failed: {0}")]
    Upstream(#[from] LlmError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
