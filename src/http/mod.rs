//! HTTP API server for dashboard control
//!
//! This module provides a REST API for driving coaching sessions:
//! - POST /sessions/start - Start (or restart) a session
//! - POST /sessions/stop/:id - Stop a session
//! - GET /sessions/:id/status - Query the session snapshot
//! - GET /sessions/:id/metrics - Rolling pitch and pace series
//! - GET /sessions/:id/report - Final coaching report
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{
    ErrorResponse, MetricsResponse, StartSessionRequest, StartSessionResponse, StopSessionResponse,
};
pub use routes::create_router;
pub use state::AppState;
