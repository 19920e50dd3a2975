//! Error types for dispatch and action handlers.

/// Errors from handler registration and execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The handler ran and reported a failure; the message is shown verbatim.
    #[error("{0}")]
    HandlerFailed(String),
    #[error("handler registered for unknown operation: {0}")]
    UnregisteredHandler(String),
    #[error("handler already registered for operation: {0}")]
    DuplicateHandler(String),
    #[error("handler for {operation} uses undeclared parameter '{key}'")]
    UndeclaredParameter { operation: String, key: String },
    #[error("no handler registered for operation: {0}")]
    MissingHandler(String),
    #[error("payload validation failed: {0}")]
    InvalidPayload(String),
    #[error("handler configuration error: {0}")]
    Config(String),
    #[error("handler for {0} panicked")]
    Panicked(String),
}

impl From<reqwest::Error> for ActionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ActionError::HandlerFailed(format!("request timed out: {}", err))
        } else {
            ActionError::HandlerFailed(format!("request failed: {}", err))
        }
    }
}
