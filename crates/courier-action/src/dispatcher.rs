//! Dispatcher.
//!
//! Runs a validated instruction through its handler and turns whatever
//! happens into a [`DispatchResult`]. Handler errors and panics never escape.

use std::sync::Arc;

use courier_core::Instruction;
use tracing::Instrument;

use crate::error::ActionError;
use crate::handler::HandlerMap;
use crate::types::DispatchResult;

/// Looks up and invokes the handler for an instruction.
#[derive(Clone)]
pub struct Dispatcher {
    handlers: Arc<HandlerMap>,
}

impl Dispatcher {
    pub fn new(handlers: Arc<HandlerMap>) -> Self {
        Self { handlers }
    }

    pub fn handlers(&self) -> &HandlerMap {
        &self.handlers
    }

    /// Invoke the instruction's handler.
    ///
    /// The handler runs on its own task so a panic surfaces as a join error
    /// and becomes `ExecutionFailure` instead of tearing down the request.
    /// The task carries the caller's span.
    pub async fn dispatch(&self, instruction: Instruction) -> DispatchResult {
        let (operation, parameters) = instruction.into_parts();

        let Some(handler) = self.handlers.get(&operation) else {
            tracing::error!(operation = %operation, "No handler for validated operation");
            return DispatchResult::ExecutionFailure(
                ActionError::MissingHandler(operation).to_string(),
            );
        };

        tracing::debug!(
            operation = %operation,
            action = %handler.describe(&parameters),
            "Dispatching"
        );

        let task = tokio::spawn(
            async move { handler.invoke(&parameters).await }.in_current_span(),
        );
        match task.await {
            Ok(Ok(output)) => {
                tracing::info!(operation = %operation, "Handler succeeded");
                DispatchResult::Success { operation, output }
            }
            Ok(Err(e)) => {
                tracing::warn!(operation = %operation, error = %e, "Handler failed");
                DispatchResult::ExecutionFailure(e.to_string())
            }
            Err(join_err) if join_err.is_panic() => {
                tracing::error!(operation = %operation, "Handler panicked");
                DispatchResult::ExecutionFailure(ActionError::Panicked(operation).to_string())
            }
            Err(join_err) => {
                tracing::error!(operation = %operation, error = %join_err, "Handler task aborted");
                DispatchResult::ExecutionFailure(format!("handler for {} was cancelled", operation))
            }
        }
    }
}
