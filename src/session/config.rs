use std::time::Duration;

use crate::metrics::AnalysisParams;

/// Configuration for a coaching session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "coach-2026-08-22-rehearsal")
    pub session_id: String,

    /// Cadence of the analysis loop
    /// Default: 16ms (roughly one tick per display frame)
    pub tick_interval: Duration,

    /// Pause between stop and the final report
    pub settle_delay: Duration,

    /// Capacity of the rolling pitch series
    pub pitch_capacity: usize,

    /// Capacity of the rolling pace series
    pub pace_capacity: usize,

    /// Seed for the session's random draws; None seeds from the clock
    pub rng_seed: Option<u64>,

    /// Metric extraction tuning
    pub analysis: AnalysisParams,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("coach-{}", uuid::Uuid::new_v4()),
            tick_interval: Duration::from_millis(16), // ~60 ticks per second
            settle_delay: Duration::from_millis(1500),
            pitch_capacity: 20,
            pace_capacity: 15,
            rng_seed: None,
            analysis: AnalysisParams::default(),
        }
    }
}
