//! Route handler functions.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use courier_action::ResponseEnvelope;
use courier_core::OperationSpec;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /agent.
#[derive(Debug, Serialize, Deserialize)]
pub struct AgentRequest {
    pub query_text: String,
}

/// Response body for GET /operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct OperationsResponse {
    pub count: usize,
    pub operations: Vec<OperationSpec>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub uptime_secs: u64,
    pub operations: usize,
}

/// POST /agent - run one natural-language request through the pipeline.
///
/// The HTTP status mirrors the envelope's status.
pub async fn agent(
    State(state): State<AppState>,
    payload: Result<Json<AgentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ResponseEnvelope>), ApiError> {
    let Json(request) = payload?;
    let envelope = state.agent.handle(&request.query_text).await;
    let status =
        StatusCode::from_u16(envelope.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(envelope)))
}

/// GET /operations - the operation catalog this server accepts.
pub async fn operations(State(state): State<AppState>) -> Json<OperationsResponse> {
    let operations = state.agent.registry().describe().to_vec();
    Json(OperationsResponse {
        count: operations.len(),
        operations,
    })
}

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: state.started_at,
        uptime_secs: state.uptime_secs(),
        operations: state.agent.registry().len(),
    })
}
