use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session control
        .route("/sessions/start", post(handlers::start_session))
        .route(
            "/sessions/stop/:session_id",
            post(handlers::stop_session),
        )
        // Session queries
        .route(
            "/sessions/:session_id/status",
            get(handlers::get_session_status),
        )
        .route(
            "/sessions/:session_id/metrics",
            get(handlers::get_session_metrics),
        )
        .route(
            "/sessions/:session_id/report",
            get(handlers::get_session_report),
        )
        // The dashboard is served from its own origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
