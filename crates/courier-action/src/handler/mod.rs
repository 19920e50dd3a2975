//! Action handler trait and the operation-to-handler map.
//!
//! Each registered operation has exactly one handler. The map is filled at
//! startup, checked against the registry with [`HandlerMap::verify`] and
//! read-only afterwards.

pub mod preview;
pub mod webhook;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use courier_core::{OperationRegistry, Parameters};

use crate::error::ActionError;
use crate::types::ActionOutput;

pub use preview::PreviewHandler;
pub use webhook::{WebhookConfig, WebhookHandler};

/// Performs the side effect for one operation.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// The operation this handler serves.
    fn operation(&self) -> &str;

    /// Parameter keys the handler reads. Each must be declared by the
    /// operation's spec.
    fn parameter_keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// One-line description of what `invoke` would do with `parameters`.
    fn describe(&self, parameters: &Parameters) -> String {
        let _ = parameters;
        self.operation().to_string()
    }

    async fn invoke(&self, parameters: &Parameters) -> Result<ActionOutput, ActionError>;
}

/// Direct mapping from operation name to handler.
#[derive(Default, Clone)]
pub struct HandlerMap {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl HandlerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A [`PreviewHandler`] for every operation in `registry`.
    pub fn preview(registry: &OperationRegistry) -> Self {
        let mut map = Self::new();
        for spec in registry.describe() {
            map.handlers.insert(
                spec.name.clone(),
                Arc::new(PreviewHandler::new(spec.clone())),
            );
        }
        map
    }

    /// A [`WebhookHandler`] for every operation in `registry`.
    pub fn webhook(registry: &OperationRegistry, config: &WebhookConfig) -> Result<Self, ActionError> {
        let client = config.client()?;
        let mut map = Self::new();
        for spec in registry.describe() {
            map.handlers.insert(
                spec.name.clone(),
                Arc::new(WebhookHandler::with_client(
                    spec.clone(),
                    config.url.clone(),
                    client.clone(),
                )),
            );
        }
        Ok(map)
    }

    /// Register a handler. A second handler for the same operation is rejected.
    pub fn register(&mut self, handler: Arc<dyn ActionHandler>) -> Result<(), ActionError> {
        let operation = handler.operation().to_string();
        if self.handlers.contains_key(&operation) {
            return Err(ActionError::DuplicateHandler(operation));
        }
        self.handlers.insert(operation, handler);
        Ok(())
    }

    /// Replace or add a handler.
    pub fn replace(&mut self, handler: Arc<dyn ActionHandler>) {
        self.handlers
            .insert(handler.operation().to_string(), handler);
    }

    pub fn get(&self, operation: &str) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(operation).cloned()
    }

    /// Registered operation names, sorted.
    pub fn operations(&self) -> Vec<&str> {
        let mut ops: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        ops.sort_unstable();
        ops
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Check the map covers `registry` exactly.
    ///
    /// Fails when a registered operation has no handler, a handler serves an
    /// operation the registry lacks, or a handler reads an undeclared key.
    pub fn verify(&self, registry: &OperationRegistry) -> Result<(), ActionError> {
        if let Some(name) = registry.names().find(|n| !self.handlers.contains_key(*n)) {
            return Err(ActionError::MissingHandler(name.to_string()));
        }

        for operation in self.operations() {
            let spec = registry
                .lookup(operation)
                .ok_or_else(|| ActionError::UnregisteredHandler(operation.to_string()))?;
            let handler = &self.handlers[operation];
            if let Some(key) = handler
                .parameter_keys()
                .into_iter()
                .find(|k| !spec.declares(k))
            {
                return Err(ActionError::UndeclaredParameter {
                    operation: operation.to_string(),
                    key,
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for HandlerMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerMap")
            .field("operations", &self.operations())
            .finish()
    }
}
