use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use super::config::SessionConfig;
use super::controller::{SessionController, SessionError};
use super::state::SessionState;
use super::stats::SessionSnapshot;
use crate::audio::{FrameSampler, FrameSource};
use crate::boundary::ObserverRef;
use crate::metrics::{PacePoint, SeriesPoint, SessionReport};

/// A coaching session that drives the analysis loop over a frame source.
///
/// Wraps [`SessionController`] with the scheduling it deliberately leaves
/// out: a tick task running at the configured cadence, and a one-shot
/// settle timer that produces the report after `stop()`.
pub struct CoachingSession {
    /// Session configuration
    config: SessionConfig,

    /// The synchronous state machine, shared with the tick task
    controller: Arc<Mutex<SessionController>>,

    /// Handle for the analysis tick task
    tick_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl CoachingSession {
    /// Create a new session. Nothing runs until `start()`.
    pub fn new(config: SessionConfig, observer: ObserverRef) -> Self {
        info!("Creating coaching session: {}", config.session_id);
        let controller = SessionController::new(config.clone(), observer);
        Self {
            config,
            controller: Arc::new(Mutex::new(controller)),
            tick_task: Arc::new(Mutex::new(None)),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    /// Acquire the source, reset analytics, and begin ticking.
    ///
    /// Fails with `DeviceUnavailable` when the source cannot be acquired
    /// and with `InvalidTransition` when called while a run is already
    /// underway; the session stays usable after either failure.
    pub async fn start(&self, mut source: Box<dyn FrameSource>) -> Result<(), SessionError> {
        let mut controller = self.controller.lock().await;
        if !controller.can_start() {
            return Err(SessionError::InvalidTransition {
                operation: "start",
                state: controller.state(),
            });
        }

        source
            .acquire()
            .await
            .map_err(|e| SessionError::DeviceUnavailable(e.to_string()))?;
        controller.start(FrameSampler::new(source))?;
        drop(controller);

        // Spawn the analysis tick task
        let controller = Arc::clone(&self.controller);
        let tick_interval = self.config.tick_interval;
        let task = tokio::spawn(async move {
            info!("Analysis tick task started");

            let started = Instant::now();
            let mut ticker = interval(tick_interval);
            // a stalled consumer gets no burst of catch-up ticks
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let mut controller = controller.lock().await;
                if controller.state() != SessionState::Recording {
                    break;
                }
                controller.tick(started.elapsed().as_secs_f64());
            }

            info!("Analysis tick task stopped");
        });

        {
            let mut handle = self.tick_task.lock().await;
            *handle = Some(task);
        }

        Ok(())
    }

    /// Stop recording and schedule the final report.
    ///
    /// Outside Recording this is a logged no-op that returns the current
    /// snapshot. After the transition the tick task is joined, so no tick
    /// lands once the returned snapshot says Processing. The settle timer
    /// fires exactly once and is never cancelled.
    pub async fn stop(&self) -> SessionSnapshot {
        {
            let mut controller = self.controller.lock().await;
            if controller.state() != SessionState::Recording {
                warn!(
                    "Stop ignored for session {}: state is {}",
                    controller.session_id(),
                    controller.state()
                );
                return controller.snapshot();
            }
            controller.stop();
        }

        // Wait for the tick task to observe the transition
        {
            let mut handle = self.tick_task.lock().await;
            if let Some(task) = handle.take() {
                if let Err(e) = task.await {
                    error!("Analysis tick task panicked: {}", e);
                }
            }
        }

        // One-shot settle timer; finalize itself rejects stale wakeups
        let controller = Arc::clone(&self.controller);
        let settle_delay = self.config.settle_delay;
        tokio::spawn(async move {
            sleep(settle_delay).await;
            controller.lock().await.finalize();
        });

        self.controller.lock().await.snapshot()
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> SessionState {
        self.controller.lock().await.state()
    }

    /// Current session view.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.controller.lock().await.snapshot()
    }

    /// The final report, present once the session is Complete.
    pub async fn report(&self) -> Option<SessionReport> {
        self.controller.lock().await.report().cloned()
    }

    /// Rolling pitch history, oldest first.
    pub async fn pitch_series(&self) -> Vec<SeriesPoint<f32>> {
        self.controller.lock().await.pitch_snapshot()
    }

    /// Rolling pace history, oldest first.
    pub async fn pace_series(&self) -> Vec<SeriesPoint<PacePoint>> {
        self.controller.lock().await.pace_snapshot()
    }
}
