use std::f32::consts::TAU;

use super::frame::{AnalysisFrame, ANALYSIS_BINS, ANALYSIS_WINDOW};
use super::source::{FrameSource, SourceError};
use crate::metrics::random::{RandomSource, SeededRandom};

/// Internal clock step per generated frame, in seconds.
const FRAME_STEP: f32 = 0.02;

/// Rate of the loudness swell cycle, in Hz.
const SWELL_RATE: f32 = 0.9;

/// Generated speech-like signal.
///
/// Produces a harmonic waveform under a slow loudness swell, so frames
/// alternate between energetic and quiet stretches. Every frame is a pure
/// function of the seed and the pull count, which makes whole sessions
/// reproducible. Ready to produce frames as soon as it is constructed.
pub struct SyntheticSource {
    rng: SeededRandom,
    pulls: u64,
    active: bool,
}

impl SyntheticSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SeededRandom::new(seed),
            pulls: 0,
            active: true,
        }
    }
}

#[async_trait::async_trait]
impl FrameSource for SyntheticSource {
    async fn acquire(&mut self) -> Result<(), SourceError> {
        self.active = true;
        Ok(())
    }

    fn current_frame(&mut self) -> Option<AnalysisFrame> {
        if !self.active {
            return None;
        }
        self.pulls += 1;
        let t = self.pulls as f32 * FRAME_STEP;

        // loudness swell between quiet and voiced stretches
        let envelope = 0.5 + 0.5 * (TAU * SWELL_RATE * t).sin();
        let fundamental = 120.0 + 30.0 * (0.7 * t).sin();

        let mut time_domain = Vec::with_capacity(ANALYSIS_WINDOW);
        for i in 0..ANALYSIS_WINDOW {
            let x = i as f32 / ANALYSIS_WINDOW as f32;
            let harmonic = (TAU * fundamental * x).sin() * 0.6 + (TAU * fundamental * 2.0 * x).sin() * 0.3;
            let jitter = (self.rng.next_unit() as f32 - 0.5) * 0.08;
            let byte = ((envelope * harmonic + jitter) * 120.0 + 128.0).clamp(0.0, 255.0) as u8;
            time_domain.push(byte);
        }

        let mut freq_bins = Vec::with_capacity(ANALYSIS_BINS);
        for bin in 0..ANALYSIS_BINS {
            let falloff = (-(bin as f32) / 350.0).exp();
            let magnitude = envelope * 230.0 * falloff + self.rng.next_unit() as f32 * 12.0;
            freq_bins.push(magnitude.clamp(0.0, 255.0) as u8);
        }

        Some(AnalysisFrame {
            time_domain,
            freq_bins,
        })
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn release(&mut self) {
        self.active = false;
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}
