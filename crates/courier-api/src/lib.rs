//! HTTP surface for the Courier agent.
//!
//! Exposes `POST /agent`, `GET /operations` and `GET /health` on top of a
//! shared [`courier_action::Agent`].

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorBody};
pub use routes::{create_router, start_server, BODY_LIMIT_BYTES};
pub use state::AppState;
