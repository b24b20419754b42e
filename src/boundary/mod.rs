//! Observer seam between the metrics pipeline and delivery surfaces.
//!
//! The session core publishes through a trait object, so the same
//! pipeline drives NATS feeds, log output, or in-memory capture in tests
//! without knowing which is attached.

use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::metrics::{FillerEvent, MetricSample, SessionReport};
use crate::session::SessionState;

/// Receiver for everything a session surfaces while it runs.
///
/// Calls arrive synchronously from the tick path, so implementations must
/// return quickly and never block.
pub trait MetricsObserver: Send + Sync {
    /// A session entered a new lifecycle state.
    fn on_state(&self, session_id: &str, state: SessionState);

    /// A per-tick reading was produced.
    fn on_sample(&self, session_id: &str, sample: &MetricSample);

    /// A filler word landed.
    fn on_filler(&self, session_id: &str, filler: &FillerEvent);

    /// The final report is ready.
    fn on_report(&self, session_id: &str, report: &SessionReport);
}

/// Type alias for a shared observer reference.
pub type ObserverRef = Arc<dyn MetricsObserver>;

/// A captured notification from [`MemoryObserver`].
#[derive(Debug, Clone)]
pub enum ObservedEvent {
    State {
        session_id: String,
        state: SessionState,
    },
    Sample {
        session_id: String,
        sample: MetricSample,
    },
    Filler {
        session_id: String,
        filler: FillerEvent,
    },
    Report {
        session_id: String,
        report: SessionReport,
    },
}

/// In-memory observer for testing.
///
/// Captures every notification for later inspection.
#[derive(Default)]
pub struct MemoryObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl MemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured notifications, in arrival order.
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// The state transitions seen so far, in order.
    pub fn states(&self) -> Vec<SessionState> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::State { state, .. } => Some(*state),
                _ => None,
            })
            .collect()
    }

    /// The samples seen so far, in order.
    pub fn samples(&self) -> Vec<MetricSample> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Sample { sample, .. } => Some(sample.clone()),
                _ => None,
            })
            .collect()
    }

    /// The filler events seen so far, in order.
    pub fn fillers(&self) -> Vec<FillerEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Filler { filler, .. } => Some(filler.clone()),
                _ => None,
            })
            .collect()
    }

    /// The reports seen so far, in order.
    pub fn reports(&self) -> Vec<SessionReport> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Report { report, .. } => Some(report.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    fn record(&self, event: ObservedEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl MetricsObserver for MemoryObserver {
    fn on_state(&self, session_id: &str, state: SessionState) {
        self.record(ObservedEvent::State {
            session_id: session_id.to_string(),
            state,
        });
    }

    fn on_sample(&self, session_id: &str, sample: &MetricSample) {
        self.record(ObservedEvent::Sample {
            session_id: session_id.to_string(),
            sample: sample.clone(),
        });
    }

    fn on_filler(&self, session_id: &str, filler: &FillerEvent) {
        self.record(ObservedEvent::Filler {
            session_id: session_id.to_string(),
            filler: filler.clone(),
        });
    }

    fn on_report(&self, session_id: &str, report: &SessionReport) {
        self.record(ObservedEvent::Report {
            session_id: session_id.to_string(),
            report: report.clone(),
        });
    }
}

/// No-op observer that discards all notifications.
pub struct NullObserver;

impl MetricsObserver for NullObserver {
    fn on_state(&self, _session_id: &str, _state: SessionState) {}

    fn on_sample(&self, _session_id: &str, _sample: &MetricSample) {}

    fn on_filler(&self, _session_id: &str, _filler: &FillerEvent) {}

    fn on_report(&self, _session_id: &str, _report: &SessionReport) {}
}

/// Observer that writes every notification to the log.
pub struct LogObserver;

impl MetricsObserver for LogObserver {
    fn on_state(&self, session_id: &str, state: SessionState) {
        info!("Session {} entered state: {}", session_id, state);
    }

    fn on_sample(&self, session_id: &str, sample: &MetricSample) {
        debug!(
            "Session {} t={:.1}s: {} wpm, fluency {}%, pitch {:.0} Hz",
            session_id, sample.t, sample.wpm, sample.fluency_pct, sample.pitch_hz
        );
    }

    fn on_filler(&self, session_id: &str, filler: &FillerEvent) {
        info!(
            "Session {} filler at {:.1}s: {:?}",
            session_id, filler.t, filler.word
        );
    }

    fn on_report(&self, session_id: &str, report: &SessionReport) {
        info!(
            "Session {} report: trend {:?}, fluency {}%, pronunciation {}%",
            session_id, report.pace_trend, report.fluency_score_pct, report.pronunciation_score_pct
        );
    }
}
