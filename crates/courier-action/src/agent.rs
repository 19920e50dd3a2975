//! Request pipeline: resolve, dispatch, format.

use tracing::Instrument;
use uuid::Uuid;

use courier_core::{OperationRegistry, ValidationError};
use courier_intent::{IntentResolver, ResolveError};

use crate::dispatcher::Dispatcher;
use crate::response::{ResponseEnvelope, ResponseFormatter};
use crate::types::DispatchResult;

/// Default cap on request length, in characters.
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 2000;

/// Single entry point for hosting surfaces.
///
/// Holds only immutable state, so one instance can serve concurrent requests.
pub struct Agent {
    resolver: IntentResolver,
    dispatcher: Dispatcher,
    formatter: ResponseFormatter,
    max_query_length: usize,
}

impl Agent {
    pub fn new(resolver: IntentResolver, dispatcher: Dispatcher) -> Self {
        Self {
            resolver,
            dispatcher,
            formatter: ResponseFormatter::new(),
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
        }
    }

    pub fn with_max_query_length(mut self, max_query_length: usize) -> Self {
        self.max_query_length = max_query_length;
        self
    }

    pub fn registry(&self) -> &OperationRegistry {
        self.resolver.registry()
    }

    pub fn resolver(&self) -> &IntentResolver {
        &self.resolver
    }

    pub fn max_query_length(&self) -> usize {
        self.max_query_length
    }

    /// Turn one request into one envelope. Never fails.
    pub async fn handle(&self, text: &str) -> ResponseEnvelope {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("request", request_id = %request_id);
        self.handle_inner(text).instrument(span).await
    }

    async fn handle_inner(&self, text: &str) -> ResponseEnvelope {
        if text.trim().is_empty() {
            tracing::info!("Blank request");
            return self
                .formatter
                .format(DispatchResult::Unrecognized(text.to_string()), text);
        }

        let length = text.chars().count();
        if length > self.max_query_length {
            tracing::info!(length, max = self.max_query_length, "Request too long");
            return self.formatter.format(
                DispatchResult::ValidationFailure(format!(
                    "query exceeds maximum length of {} characters",
                    self.max_query_length
                )),
                text,
            );
        }

        let instruction = match self.resolver.resolve(text).await {
            Ok(instruction) => instruction,
            Err(e) => {
                let result = resolution_failure(e, text);
                tracing::info!(outcome = result.kind(), "Request finished");
                return self.formatter.format(result, text);
            }
        };

        let operation = instruction.operation().to_string();
        let result = self.dispatcher.dispatch(instruction).await;
        tracing::info!(operation = %operation, outcome = result.kind(), "Request finished");
        self.formatter.format_for(result, text, Some(&operation))
    }
}

/// Map a resolution error onto the dispatch outcome it stands for.
fn resolution_failure(err: ResolveError, text: &str) -> DispatchResult {
    match err {
        ResolveError::Validation(ValidationError::UnknownOperation(op)) => {
            tracing::info!(operation = %op, "Unrecognized operation");
            DispatchResult::Unrecognized(text.to_string())
        }
        ResolveError::Validation(e) => DispatchResult::ValidationFailure(e.to_string()),
        e @ ResolveError::Parse(_) => DispatchResult::ValidationFailure(e.to_string()),
        e @ ResolveError::Upstream(_) => DispatchResult::ExecutionFailure(e.to_string()),
    }
}
