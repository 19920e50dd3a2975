//! Dry-run handler.
//!
//! Describes the operation it would perform and echoes the parameters
//! without touching any external service.

use async_trait::async_trait;
use serde_json::json;

use courier_core::{OperationSpec, Parameters};

use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::types::ActionOutput;

/// Handler that performs no side effect.
pub struct PreviewHandler {
    spec: OperationSpec,
}

impl PreviewHandler {
    pub fn new(spec: OperationSpec) -> Self {
        Self { spec }
    }
}

#[async_trait]
impl ActionHandler for PreviewHandler {
    fn operation(&self) -> &str {
        &self.spec.name
    }

    fn parameter_keys(&self) -> Vec<String> {
        self.spec.params().map(|p| p.key.clone()).collect()
    }

    fn describe(&self, parameters: &Parameters) -> String {
        let owner = parameters.get("owner");
        let repo = parameters.get("repo");
        if let (Some(owner), Some(repo)) = (owner, repo) {
            return format!("Preview: {} on {}/{}", self.spec.name, owner, repo);
        }
        if parameters.is_empty() {
            return format!("Preview: {}", self.spec.name);
        }
        let args: Vec<String> = parameters
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("Preview: {} with {}", self.spec.name, args.join(", "))
    }

    async fn invoke(&self, parameters: &Parameters) -> Result<ActionOutput, ActionError> {
        tracing::info!(operation = %self.spec.name, "Preview handler invoked");
        Ok(ActionOutput::message(self.describe(parameters)).with_data(json!({
            "dry_run": true,
            "operation": self.spec.name,
            "parameters": parameters,
        })))
    }
}
