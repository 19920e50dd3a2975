//! Application state shared across all route handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use courier_action::Agent;
use courier_core::config::ServerConfig;

/// Shared application state.
///
/// Cloned per request; every field is cheap to clone and immutable.
#[derive(Clone)]
pub struct AppState {
    /// The request pipeline.
    pub agent: Arc<Agent>,
    /// Bind address and port, also used for the CORS allow-list.
    pub server: ServerConfig,
    /// Server start time for uptime calculation.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(agent: Agent, server: ServerConfig) -> Self {
        Self {
            agent: Arc::new(agent),
            server,
            started_at: Utc::now(),
        }
    }

    /// Seconds since the state was created.
    pub fn uptime_secs(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }
}
