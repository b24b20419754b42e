use crate::boundary::ObserverRef;
use crate::session::{CoachingSession, SessionConfig};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Known coaching sessions (session_id → session), live and finished
    pub sessions: Arc<RwLock<HashMap<String, Arc<CoachingSession>>>>,

    /// Session settings applied to every new session
    pub template: SessionConfig,

    /// Observer attached to every new session
    pub observer: ObserverRef,
}

impl AppState {
    pub fn new(template: SessionConfig, observer: ObserverRef) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            template,
            observer,
        }
    }
}
