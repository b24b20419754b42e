use super::state::AppState;
use crate::audio::{SourceFactory, SourceKind};
use crate::metrics::{PacePoint, SeriesPoint};
use crate::session::{CoachingSession, SessionConfig, SessionError, SessionSnapshot, SessionState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    /// Optional session ID (if not provided, generate UUID)
    pub session_id: Option<String>,

    /// Seed for the session's random draws and the synthetic source
    pub seed: Option<u64>,

    /// Analyze a pre-recorded WAV instead of the synthetic source
    pub wav_path: Option<String>,

    /// Stop automatically after this many seconds
    pub duration_secs: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub session_id: String,
    pub status: String,
    pub message: String,
    pub snapshot: SessionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    /// Rolling pitch history, oldest first
    pub pitch: Vec<SeriesPoint<f32>>,
    /// Rolling pace history, oldest first
    pub pace: Vec<SeriesPoint<PacePoint>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /sessions/start
/// Start a new coaching session (or restart a finished one)
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> impl IntoResponse {
    // Generate or use provided session ID
    let session_id = req
        .session_id
        .unwrap_or_else(|| format!("coach-{}", uuid::Uuid::new_v4()));

    info!("Starting coaching session: {}", session_id);

    // Refuse while a run with this ID is still underway
    {
        let sessions = state.sessions.read().await;
        if let Some(existing) = sessions.get(&session_id) {
            let current = existing.state().await;
            if !matches!(current, SessionState::Idle | SessionState::Complete) {
                return (
                    StatusCode::CONFLICT,
                    Json(ErrorResponse {
                        error: format!("Session {} is already {}", session_id, current),
                    }),
                )
                    .into_response();
            }
        }
    }

    let kind = match &req.wav_path {
        Some(path) => SourceKind::WavFile(path.into()),
        None => SourceKind::Synthetic {
            seed: req
                .seed
                .unwrap_or_else(|| uuid::Uuid::new_v4().as_u128() as u64),
        },
    };

    let config = SessionConfig {
        session_id: session_id.clone(),
        rng_seed: req.seed,
        ..state.template.clone()
    };

    // Create and start the session
    let session = Arc::new(CoachingSession::new(config, Arc::clone(&state.observer)));
    let source = SourceFactory::create(kind);

    if let Err(e) = session.start(source).await {
        error!("Failed to start session: {}", e);
        let status = match e {
            SessionError::DeviceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            SessionError::InvalidTransition { .. } => StatusCode::CONFLICT,
        };
        return (
            status,
            Json(ErrorResponse {
                error: format!("Failed to start session: {}", e),
            }),
        )
            .into_response();
    }

    // Store the session, shutting down any run this replaces
    {
        let mut sessions = state.sessions.write().await;
        if let Some(previous) = sessions.insert(session_id.clone(), Arc::clone(&session)) {
            if previous.state().await == SessionState::Recording {
                warn!("Replacing a live session {}; stopping the old run", session_id);
                previous.stop().await;
            }
        }
    }

    // Timed sessions stop themselves; a manual stop first makes this a no-op
    if let Some(secs) = req.duration_secs {
        let timed = Arc::clone(&session);
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(secs)).await;
            info!("Timed session {} reached {}s; stopping", timed.session_id(), secs);
            timed.stop().await;
        });
    }

    info!("Coaching session started: {}", session_id);

    (
        StatusCode::OK,
        Json(StartSessionResponse {
            session_id: session_id.clone(),
            status: "recording".to_string(),
            message: format!("Coaching session {} started", session_id),
        }),
    )
        .into_response()
}

/// POST /sessions/stop/:session_id
/// Stop a coaching session; the report follows after the settle delay
pub async fn stop_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    info!("Stopping coaching session: {}", session_id);

    let session = {
        let sessions = state.sessions.read().await;
        sessions.get(&session_id).map(Arc::clone)
    };

    match session {
        Some(session) => {
            let snapshot = session.stop().await;
            let message = if snapshot.state == SessionState::Processing {
                "Recording stopped; report will follow after the settle delay".to_string()
            } else {
                format!("Stop ignored; session is {}", snapshot.state)
            };
            (
                StatusCode::OK,
                Json(StopSessionResponse {
                    session_id: session_id.clone(),
                    status: snapshot.state.as_str().to_string(),
                    message,
                    snapshot,
                }),
            )
                .into_response()
        }
        None => {
            error!("Session {} not found", session_id);
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Session {} not found", session_id),
                }),
            )
                .into_response()
        }
    }
}

/// GET /sessions/:session_id/status
/// Get the current snapshot of a coaching session
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&session_id) {
        Some(session) => {
            let snapshot = session.snapshot().await;
            (StatusCode::OK, Json(snapshot)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session {} not found", session_id),
            }),
        )
            .into_response(),
    }
}

/// GET /sessions/:session_id/metrics
/// Get the rolling pitch and pace series for the charts
pub async fn get_session_metrics(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&session_id) {
        Some(session) => {
            let response = MetricsResponse {
                pitch: session.pitch_series().await,
                pace: session.pace_series().await,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session {} not found", session_id),
            }),
        )
            .into_response(),
    }
}

/// GET /sessions/:session_id/report
/// Get the final coaching report, once the session has settled
pub async fn get_session_report(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&session_id) {
        Some(session) => match session.report().await {
            Some(report) => (StatusCode::OK, Json(report)).into_response(),
            None => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Report for session {} is not ready", session_id),
                }),
            )
                .into_response(),
        },
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session {} not found", session_id),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
