//! Webhook handler.
//!
//! POSTs `{"operation", "parameters"}` as JSON to a configured URL. The
//! external service performs the real side effect.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use courier_core::config::HandlersConfig;
use courier_core::{OperationSpec, Parameters};

use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::types::ActionOutput;

/// Target and timeout shared by every webhook handler.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout: Duration,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    /// Build from `[handlers]`; the URL must be set.
    pub fn from_config(config: &HandlersConfig) -> Result<Self, ActionError> {
        let url = config
            .webhook_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ActionError::Config("webhook_url is not set".to_string()))?;
        Ok(Self::new(url, Duration::from_secs(config.timeout_secs)))
    }

    pub(crate) fn client(&self) -> Result<reqwest::Client, ActionError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ActionError::HandlerFailed(format!("Failed to create HTTP client: {}", e)))
    }
}

/// Forwards one operation to the webhook.
pub struct WebhookHandler {
    spec: OperationSpec,
    url: String,
    client: reqwest::Client,
}

impl WebhookHandler {
    pub fn new(spec: OperationSpec, config: &WebhookConfig) -> Result<Self, ActionError> {
        Ok(Self::with_client(spec, config.url.clone(), config.client()?))
    }

    pub(crate) fn with_client(spec: OperationSpec, url: String, client: reqwest::Client) -> Self {
        Self { spec, url, client }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Request body sent to the webhook.
pub(crate) fn request_body(operation: &str, parameters: &Parameters) -> Value {
    json!({
        "operation": operation,
        "parameters": parameters,
    })
}

/// Interpret a successful webhook response body.
pub(crate) fn output_from_body(body: &str) -> Result<ActionOutput, ActionError> {
    if body.trim().is_empty() {
        return Ok(ActionOutput::default());
    }
    let data: Value = serde_json::from_str(body)
        .map_err(|e| ActionError::InvalidPayload(format!("webhook response is not JSON: {}", e)))?;
    let message = data
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(ActionOutput { message, data })
}

#[async_trait]
impl ActionHandler for WebhookHandler {
    fn operation(&self) -> &str {
        &self.spec.name
    }

    fn parameter_keys(&self) -> Vec<String> {
        self.spec.params().map(|p| p.key.clone()).collect()
    }

    fn describe(&self, _parameters: &Parameters) -> String {
        format!("POST {} to {}", self.spec.name, self.url)
    }

    async fn invoke(&self, parameters: &Parameters) -> Result<ActionOutput, ActionError> {
        let response = self
            .client
            .post(&self.url)
            .json(&request_body(&self.spec.name, parameters))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(
                operation = %self.spec.name,
                status = status.as_u16(),
                "Webhook returned an error status"
            );
            let detail = body.trim();
            return Err(ActionError::HandlerFailed(if detail.is_empty() {
                format!("webhook returned HTTP {}", status.as_u16())
            } else {
                format!("webhook returned HTTP {}: {}", status.as_u16(), detail)
            }));
        }

        tracing::info!(operation = %self.spec.name, status = status.as_u16(), "Webhook call succeeded");
        output_from_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::{ParamType, ParamValue};

    fn spec() -> OperationSpec {
        OperationSpec::new("post_tweet").required("text", ParamType::String)
    }

    #[test]
    fn test_from_config_requires_url() {
        let config = HandlersConfig::default();
        assert_eq!(
            WebhookConfig::from_config(&config).unwrap_err(),
            ActionError::Config("webhook_url is not set".into())
        );

        let config = HandlersConfig {
            mode: "webhook".into(),
            webhook_url: Some("http://localhost:9000/hook".into()),
            timeout_secs: 3,
        };
        let webhook = WebhookConfig::from_config(&config).unwrap();
        assert_eq!(webhook.url, "http://localhost:9000/hook");
        assert_eq!(webhook.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_request_body() {
        let mut params = Parameters::new();
        params.insert("text".into(), ParamValue::from("hello world"));
        let body = request_body("post_tweet", &params);
        assert_eq!(body, json!({"operation": "post_tweet", "parameters": {"text": "hello world"}}));
    }

    #[test]
    fn test_output_from_body() {
        let out = output_from_body(r#"{"message":"Tweet posted","id":42}"#).unwrap();
        assert_eq!(out.message.as_deref(), Some("Tweet posted"));
        assert_eq!(out.data["id"], 42);

        let out = output_from_body("[1,2,3]").unwrap();
        assert!(out.message.is_none());
        assert_eq!(out.data, json!([1, 2, 3]));

        let out = output_from_body("  ").unwrap();
        assert_eq!(out, ActionOutput::default());

        assert!(matches!(
            output_from_body("<html>"),
            Err(ActionError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_handler_metadata() {
        let config = WebhookConfig::new("http://localhost:9000/hook", Duration::from_secs(1));
        let handler = WebhookHandler::new(spec(), &config).unwrap();
        assert_eq!(handler.operation(), "post_tweet");
        assert_eq!(handler.parameter_keys(), vec!["text"]);
        assert_eq!(handler.url(), "http://localhost:9000/hook");
        assert_eq!(
            handler.describe(&Parameters::new()),
            "POST post_tweet to http://localhost:9000/hook"
        );
    }

    #[tokio::test]
    async fn test_unreachable_webhook_fails() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let config = WebhookConfig::new("http://127.0.0.1:9/hook", Duration::from_secs(2));
        let handler = WebhookHandler::new(spec(), &config).unwrap();
        let err = handler.invoke(&Parameters::new()).await.unwrap_err();
        assert!(matches!(err, ActionError::HandlerFailed(_)));
    }
}
