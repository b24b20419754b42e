use chrono::{DateTime, Utc};
use tracing::{info, trace, warn};

use super::config::SessionConfig;
use super::state::SessionState;
use super::stats::SessionSnapshot;
use crate::audio::FrameSampler;
use crate::boundary::ObserverRef;
use crate::metrics::{
    FillerEvent, InsightGenerator, MetricExtractor, MetricSample, PacePoint, RandomSource,
    RollingSeries, SeededRandom, SeriesPoint, SessionAggregate, SessionReport,
};

/// How many of the latest fillers a snapshot carries.
const RECENT_FILLER_LIMIT: usize = 5;

/// Errors returned by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The frame source could not be acquired.
    #[error("Audio source unavailable: {0}")]
    DeviceUnavailable(String),

    /// The operation is not legal in the current lifecycle state.
    #[error("Cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: SessionState,
    },
}

/// Synchronous heart of a coaching session.
///
/// Owns the lifecycle state machine, the rolling series, and the
/// accumulated word and filler counts. The controller never schedules
/// anything itself: a driver calls `tick()` with the elapsed time, `stop()`
/// when the speaker is done, and `finalize()` once the settle delay has
/// passed. That keeps every transition and every reading exactly
/// reproducible in tests.
pub struct SessionController {
    config: SessionConfig,
    extractor: MetricExtractor,
    observer: ObserverRef,
    rng: Box<dyn RandomSource>,
    state: SessionState,
    sampler: Option<FrameSampler>,
    started_at: Option<DateTime<Utc>>,
    last_t: f64,
    word_count: u32,
    fillers: Vec<FillerEvent>,
    pitch_series: RollingSeries<f32>,
    pace_series: RollingSeries<PacePoint>,
    last_sample: Option<MetricSample>,
    report: Option<SessionReport>,
}

impl SessionController {
    pub fn new(config: SessionConfig, observer: ObserverRef) -> Self {
        let rng: Box<dyn RandomSource> = match config.rng_seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };
        Self::with_rng(config, observer, rng)
    }

    /// Create a controller with a caller-supplied random source.
    pub fn with_rng(config: SessionConfig, observer: ObserverRef, rng: Box<dyn RandomSource>) -> Self {
        let extractor = MetricExtractor::new(config.analysis.clone());
        let pitch_series = RollingSeries::new(config.pitch_capacity);
        let pace_series = RollingSeries::new(config.pace_capacity);
        Self {
            config,
            extractor,
            observer,
            rng,
            state: SessionState::Idle,
            sampler: None,
            started_at: None,
            last_t: 0.0,
            word_count: 0,
            fillers: Vec::new(),
            pitch_series,
            pace_series,
            last_sample: None,
            report: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    /// Whether `start()` would be accepted right now.
    pub fn can_start(&self) -> bool {
        matches!(self.state, SessionState::Idle | SessionState::Complete)
    }

    /// Begin recording from an already-acquired source.
    ///
    /// Clears all analytics from any previous run, so a restarted session
    /// opens with empty series and zeroed counters.
    pub fn start(&mut self, sampler: FrameSampler) -> Result<(), SessionError> {
        if !self.can_start() {
            return Err(SessionError::InvalidTransition {
                operation: "start",
                state: self.state,
            });
        }

        info!(
            "Starting session {} from source: {}",
            self.config.session_id,
            sampler.source_name()
        );

        self.reset_analytics();
        self.started_at = Some(Utc::now());
        self.sampler = Some(sampler);
        self.set_state(SessionState::Recording);
        Ok(())
    }

    /// Run one analysis pass at `elapsed_secs` since start.
    ///
    /// Outside Recording this is a no-op. A tick that finds no frame
    /// leaves every buffer and counter untouched.
    pub fn tick(&mut self, elapsed_secs: f64) {
        if self.state != SessionState::Recording {
            trace!(
                "Tick ignored for session {}: state is {}",
                self.config.session_id,
                self.state
            );
            return;
        }
        let Some(sampler) = self.sampler.as_mut() else {
            return;
        };
        let Some(frame) = sampler.sample() else {
            trace!("No frame available at {:.3}s", elapsed_secs);
            return;
        };

        let extraction = self
            .extractor
            .extract(&frame, elapsed_secs, self.word_count, self.rng.as_mut());

        self.word_count += extraction.word_delta;
        if let Some(filler) = extraction.filler {
            self.observer.on_filler(&self.config.session_id, &filler);
            self.fillers.push(filler);
        }

        self.pitch_series.push(elapsed_secs, extraction.sample.pitch_hz);
        self.pace_series.push(
            elapsed_secs,
            PacePoint {
                wpm: extraction.sample.wpm,
                fluency_pct: extraction.sample.fluency_pct,
            },
        );
        self.last_t = elapsed_secs;

        self.observer.on_sample(&self.config.session_id, &extraction.sample);
        self.last_sample = Some(extraction.sample);
    }

    /// Stop recording and move to Processing.
    ///
    /// Outside Recording this is a logged no-op, so stray stop requests
    /// never disturb the state machine.
    pub fn stop(&mut self) {
        if self.state != SessionState::Recording {
            warn!(
                "Stop ignored for session {}: state is {}",
                self.config.session_id, self.state
            );
            return;
        }

        info!("Stopping session {}", self.config.session_id);
        if let Some(mut sampler) = self.sampler.take() {
            sampler.release();
        }
        self.set_state(SessionState::Processing);
    }

    /// Produce the final report and move to Complete.
    ///
    /// Called by the driver once the settle delay after `stop()` has
    /// passed. Outside Processing this is a logged no-op.
    pub fn finalize(&mut self) {
        if self.state != SessionState::Processing {
            warn!(
                "Finalize ignored for session {}: state is {}",
                self.config.session_id, self.state
            );
            return;
        }

        let aggregate = SessionAggregate {
            total_words: self.word_count,
            filler_events: self.fillers.clone(),
            final_wpm: self.last_sample.as_ref().map(|s| s.wpm).unwrap_or(0),
        };
        let report = InsightGenerator::generate(&aggregate, self.rng.as_mut());

        self.report = Some(report.clone());
        self.set_state(SessionState::Complete);
        self.observer.on_report(&self.config.session_id, &report);
    }

    /// Current session view.
    pub fn snapshot(&self) -> SessionSnapshot {
        let skip = self.fillers.len().saturating_sub(RECENT_FILLER_LIMIT);
        SessionSnapshot {
            session_id: self.config.session_id.clone(),
            state: self.state,
            started_at: self.started_at,
            elapsed_secs: self.last_t,
            word_count: self.word_count,
            filler_count: self.fillers.len(),
            recent_fillers: self.fillers[skip..].iter().map(|f| f.word.clone()).collect(),
            last_sample: self.last_sample.clone(),
        }
    }

    /// The final report, present once the session is Complete.
    pub fn report(&self) -> Option<&SessionReport> {
        self.report.as_ref()
    }

    /// Rolling pitch history, oldest first.
    pub fn pitch_snapshot(&self) -> Vec<SeriesPoint<f32>> {
        self.pitch_series.snapshot()
    }

    /// Rolling pace history, oldest first.
    pub fn pace_snapshot(&self) -> Vec<SeriesPoint<PacePoint>> {
        self.pace_series.snapshot()
    }

    fn set_state(&mut self, next: SessionState) {
        info!(
            "Session {} state: {} -> {}",
            self.config.session_id, self.state, next
        );
        self.state = next;
        self.observer.on_state(&self.config.session_id, next);
    }

    fn reset_analytics(&mut self) {
        self.last_t = 0.0;
        self.word_count = 0;
        self.fillers.clear();
        self.pitch_series.clear();
        self.pace_series.clear();
        self.last_sample = None;
        self.report = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SyntheticSource;
    use crate::boundary::NullObserver;
    use std::sync::Arc;

    fn sampler() -> FrameSampler {
        FrameSampler::new(Box::new(SyntheticSource::new(1)))
    }

    fn controller() -> SessionController {
        let config = SessionConfig {
            rng_seed: Some(42),
            ..SessionConfig::default()
        };
        SessionController::new(config, Arc::new(NullObserver))
    }

    #[test]
    fn starts_idle_with_empty_analytics() {
        let ctl = controller();
        assert_eq!(ctl.state(), SessionState::Idle);
        let snapshot = ctl.snapshot();
        assert_eq!(snapshot.word_count, 0);
        assert_eq!(snapshot.filler_count, 0);
        assert!(snapshot.started_at.is_none());
        assert!(ctl.report().is_none());
    }

    #[test]
    fn full_lifecycle_reaches_complete_with_a_report() {
        let mut ctl = controller();
        ctl.start(sampler()).unwrap();
        assert_eq!(ctl.state(), SessionState::Recording);

        for i in 1..=30 {
            ctl.tick(i as f64 * 0.1);
        }
        ctl.stop();
        assert_eq!(ctl.state(), SessionState::Processing);

        ctl.finalize();
        assert_eq!(ctl.state(), SessionState::Complete);
        assert_eq!(ctl.report().unwrap().insights.len(), 3);
    }

    #[test]
    fn start_while_recording_is_rejected() {
        let mut ctl = controller();
        ctl.start(sampler()).unwrap();
        let err = ctl.start(sampler()).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                operation: "start",
                state: SessionState::Recording
            }
        ));
        // still recording, still usable
        assert_eq!(ctl.state(), SessionState::Recording);
        ctl.tick(1.0);
        assert!(ctl.snapshot().last_sample.is_some());
    }

    #[test]
    fn start_while_processing_is_rejected() {
        let mut ctl = controller();
        ctl.start(sampler()).unwrap();
        ctl.stop();
        assert!(ctl.start(sampler()).is_err());
        assert_eq!(ctl.state(), SessionState::Processing);
    }

    #[test]
    fn stop_outside_recording_is_a_noop() {
        let mut ctl = controller();
        ctl.stop();
        assert_eq!(ctl.state(), SessionState::Idle);

        ctl.start(sampler()).unwrap();
        ctl.stop();
        ctl.stop();
        assert_eq!(ctl.state(), SessionState::Processing);
    }

    #[test]
    fn finalize_outside_processing_is_a_noop() {
        let mut ctl = controller();
        ctl.finalize();
        assert_eq!(ctl.state(), SessionState::Idle);
        assert!(ctl.report().is_none());

        ctl.start(sampler()).unwrap();
        ctl.finalize();
        assert_eq!(ctl.state(), SessionState::Recording);
    }

    #[test]
    fn tick_outside_recording_changes_nothing() {
        let mut ctl = controller();
        ctl.tick(1.0);
        assert!(ctl.snapshot().last_sample.is_none());
        assert_eq!(ctl.pitch_snapshot().len(), 0);

        ctl.start(sampler()).unwrap();
        ctl.tick(1.0);
        ctl.stop();
        let before = ctl.snapshot();
        ctl.tick(2.0);
        let after = ctl.snapshot();
        assert_eq!(before.elapsed_secs, after.elapsed_secs);
        assert_eq!(before.word_count, after.word_count);
    }

    #[test]
    fn restart_from_complete_resets_analytics() {
        let mut ctl = controller();
        ctl.start(sampler()).unwrap();
        for i in 1..=25 {
            ctl.tick(i as f64 * 0.2);
        }
        ctl.stop();
        ctl.finalize();
        assert!(ctl.report().is_some());

        ctl.start(sampler()).unwrap();
        assert_eq!(ctl.state(), SessionState::Recording);
        let snapshot = ctl.snapshot();
        assert_eq!(snapshot.word_count, 0);
        assert_eq!(snapshot.filler_count, 0);
        assert_eq!(snapshot.elapsed_secs, 0.0);
        assert!(snapshot.last_sample.is_none());
        assert!(ctl.report().is_none());
        assert!(ctl.pitch_snapshot().is_empty());
        assert!(ctl.pace_snapshot().is_empty());
    }

    #[test]
    fn series_respect_their_capacities() {
        let config = SessionConfig {
            rng_seed: Some(9),
            ..SessionConfig::default()
        };
        let mut ctl = SessionController::new(config, Arc::new(NullObserver));
        ctl.start(sampler()).unwrap();
        for i in 1..=40 {
            ctl.tick(i as f64 * 0.05);
        }
        assert_eq!(ctl.pitch_snapshot().len(), 20);
        assert_eq!(ctl.pace_snapshot().len(), 15);

        // newest points survive
        let pitch = ctl.pitch_snapshot();
        assert!((pitch.last().unwrap().t - 2.0).abs() < 1e-9);
    }

    #[test]
    fn snapshot_keeps_only_the_latest_fillers() {
        let config = SessionConfig {
            rng_seed: Some(5),
            analysis: crate::metrics::AnalysisParams {
                word_probability: 1.0,
                filler_probability: 1.0,
                ..Default::default()
            },
            ..SessionConfig::default()
        };
        let mut ctl = SessionController::new(config, Arc::new(NullObserver));
        ctl.start(sampler()).unwrap();
        for i in 1..=8 {
            ctl.tick(i as f64);
        }
        let snapshot = ctl.snapshot();
        assert_eq!(snapshot.filler_count, 8);
        assert_eq!(snapshot.recent_fillers.len(), 5);
        assert_eq!(snapshot.word_count, 8);
    }
}
