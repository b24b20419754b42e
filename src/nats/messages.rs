use serde::{Deserialize, Serialize};

use crate::metrics::{MetricSample, SessionReport};
use crate::session::SessionState;

/// Per-tick metrics message published to NATS
#[derive(Debug, Serialize, Deserialize)]
pub struct SampleMessage {
    pub session_id: String,
    pub sample: MetricSample,
    pub timestamp: String, // RFC3339 timestamp
}

/// Lifecycle transition message published to NATS
#[derive(Debug, Serialize, Deserialize)]
pub struct StateMessage {
    pub session_id: String,
    pub state: SessionState,
    pub timestamp: String, // RFC3339 timestamp
}

/// Filler detection message published to NATS
#[derive(Debug, Serialize, Deserialize)]
pub struct FillerMessage {
    pub session_id: String,
    pub word: String,
    /// Seconds since the session started
    pub t: f64,
    pub timestamp: String, // RFC3339 timestamp
}

/// Final report message published to NATS
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportMessage {
    pub session_id: String,
    pub report: SessionReport,
    pub timestamp: String, // RFC3339 timestamp
}
