use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::SessionState;
use crate::metrics::MetricSample;

/// Point-in-time view of a live or finished session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session identifier
    pub session_id: String,

    /// Current lifecycle state
    pub state: SessionState,

    /// When recording started, if it ever did
    pub started_at: Option<DateTime<Utc>>,

    /// Seconds of recording covered by ticks so far
    pub elapsed_secs: f64,

    /// Words counted so far
    pub word_count: u32,

    /// Fillers detected so far
    pub filler_count: usize,

    /// The most recent filler words, oldest first (up to five)
    pub recent_fillers: Vec<String>,

    /// The most recent per-tick reading
    pub last_sample: Option<MetricSample>,
}
