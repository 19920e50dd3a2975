//! Response formatting.
//!
//! Every request ends in exactly one [`ResponseEnvelope`], whatever happened
//! along the way.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::DispatchResult;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Uniform reply returned to the caller.
///
/// Built only by [`ResponseFormatter::format`] and read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    response_text: String,
    status: u16,
    echo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

impl ResponseEnvelope {
    pub fn response_text(&self) -> &str {
        &self.response_text
    }

    /// HTTP-style status: 200, 400 or 500.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The original request text.
    pub fn echo(&self) -> &str {
        &self.echo
    }

    /// The operation the request resolved to, when it got that far.
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    /// Handler data on success; absent when the handler returned none.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Converts a [`DispatchResult`] into a [`ResponseEnvelope`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFormatter;

impl ResponseFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, result: DispatchResult, original_text: &str) -> ResponseEnvelope {
        let echo = original_text.to_string();
        match result {
            DispatchResult::Success { operation, output } => {
                let response_text = output
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| format!("{} completed", operation));
                let payload = match output.data {
                    Value::Null => None,
                    data => Some(data),
                };
                ResponseEnvelope {
                    response_text,
                    status: STATUS_OK,
                    echo,
                    operation: Some(operation),
                    payload,
                }
            }
            DispatchResult::ValidationFailure(reason) => ResponseEnvelope {
                response_text: format!("Invalid request: {}", reason),
                status: STATUS_BAD_REQUEST,
                echo,
                operation: None,
                payload: None,
            },
            DispatchResult::ExecutionFailure(reason) => ResponseEnvelope {
                response_text: format!("Error: {}", reason),
                status: STATUS_INTERNAL_ERROR,
                echo,
                operation: None,
                payload: None,
            },
            DispatchResult::Unrecognized(_) => ResponseEnvelope {
                response_text: "Operation not recognized.".to_string(),
                status: STATUS_BAD_REQUEST,
                echo,
                operation: None,
                payload: None,
            },
        }
    }

    /// Like [`format`](Self::format) but records the operation a failed
    /// request had resolved to.
    pub fn format_for(
        &self,
        result: DispatchResult,
        original_text: &str,
        operation: Option<&str>,
    ) -> ResponseEnvelope {
        let mut envelope = self.format(result, original_text);
        if envelope.operation.is_none() {
            envelope.operation = operation.map(str::to_string);
        }
        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionOutput;
    use serde_json::json;

    fn fmt() -> ResponseFormatter {
        ResponseFormatter::new()
    }

    #[test]
    fn test_success_with_message() {
        let env = fmt().format(
            DispatchResult::Success {
                operation: "create_album".into(),
                output: ActionOutput::message("Album 'Trip' created successfully!")
                    .with_data(json!({"album_id": "a1"})),
            },
            "create album Trip",
        );
        assert_eq!(env.status(), 200);
        assert!(env.is_success());
        assert_eq!(env.response_text(), "Album 'Trip' created successfully!");
        assert_eq!(env.echo(), "create album Trip");
        assert_eq!(env.operation(), Some("create_album"));
        assert_eq!(env.payload(), Some(&json!({"album_id": "a1"})));
    }

    #[test]
    fn test_success_generic_text() {
        let env = fmt().format(
            DispatchResult::Success {
                operation: "list_albums".into(),
                output: ActionOutput::data(json!([])),
            },
            "list albums",
        );
        assert_eq!(env.response_text(), "list_albums completed");
        assert_eq!(env.payload(), Some(&json!([])));
    }

    #[test]
    fn test_success_null_payload_omitted() {
        let env = fmt().format(
            DispatchResult::Success {
                operation: "post_tweet".into(),
                output: ActionOutput::default(),
            },
            "tweet hi",
        );
        assert!(env.payload().is_none());
        let json = serde_json::to_value(&env).unwrap();
        assert!(json.get("payload").is_none());
    }

    #[test]
    fn test_validation_failure() {
        let env = fmt().format(
            DispatchResult::ValidationFailure("missing required parameter: name".into()),
            "create a repo",
        );
        assert_eq!(env.status(), 400);
        assert_eq!(
            env.response_text(),
            "Invalid request: missing required parameter: name"
        );
        assert!(env.operation().is_none());
    }

    #[test]
    fn test_execution_failure() {
        let env = fmt().format(
            DispatchResult::ExecutionFailure("HTTP 404: Not Found".into()),
            "delete octocat/gone",
        );
        assert_eq!(env.status(), 500);
        assert_eq!(env.response_text(), "Error: HTTP 404: Not Found");
    }

    #[test]
    fn test_unrecognized() {
        let env = fmt().format(DispatchResult::Unrecognized("hum".into()), "hum");
        assert_eq!(env.status(), 400);
        assert_eq!(env.response_text(), "Operation not recognized.");
        assert_eq!(env.echo(), "hum");
    }

    #[test]
    fn test_format_for_keeps_operation() {
        let env = fmt().format_for(
            DispatchResult::ExecutionFailure("boom".into()),
            "list photos",
            Some("list_photos"),
        );
        assert_eq!(env.operation(), Some("list_photos"));
    }

    #[test]
    fn test_serialized_shape() {
        let env = fmt().format(DispatchResult::Unrecognized("x".into()), "x");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(
            json,
            json!({"response_text": "Operation not recognized.", "status": 400, "echo": "x"})
        );
    }
}
