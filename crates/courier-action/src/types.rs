//! Dispatch outcome types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a handler returns on success.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionOutput {
    /// Human-readable summary; the formatter falls back to a generic text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Structured result, passed through untouched.
    #[serde(default)]
    pub data: Value,
}

impl ActionOutput {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            data: Value::Null,
        }
    }

    pub fn data(data: Value) -> Self {
        Self {
            message: None,
            data,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

/// Outcome of one request, exactly one variant per request.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
    Success {
        operation: String,
        output: ActionOutput,
    },
    ValidationFailure(String),
    ExecutionFailure(String),
    /// Carries the raw request text.
    Unrecognized(String),
}

impl DispatchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchResult::Success { .. })
    }

    /// Short variant name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchResult::Success { .. } => "success",
            DispatchResult::ValidationFailure(_) => "validation_failure",
            DispatchResult::ExecutionFailure(_) => "execution_failure",
            DispatchResult::Unrecognized(_) => "unrecognized",
        }
    }
}
