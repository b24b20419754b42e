use crate::audio::{AnalysisFrame, SAMPLE_CEILING};

use super::random::RandomSource;
use super::sample::{FillerEvent, MetricSample, SignalQuality};

/// Filler vocabulary used when none is configured.
pub const DEFAULT_FILLER_WORDS: &[&str] = &["um", "uh", "like", "you know", "basically"];

/// Center of the synthesized pitch band in Hz.
const PITCH_BASE_HZ: f64 = 150.0;
/// Amplitude of the slow pitch oscillation in Hz.
const PITCH_SWING_HZ: f64 = 50.0;
/// Uniform jitter added on top of the pitch curve in Hz.
const PITCH_JITTER_HZ: f64 = 20.0;
/// Center and swing of the fluency curve in percent.
const FLUENCY_CENTER: f64 = 85.0;
const FLUENCY_SWING: f64 = 10.0;
/// Conversion from mean bin magnitude to a dominant-frequency estimate.
const DOMINANT_FREQ_SCALE: f32 = 10.0;

/// Tunable analysis behavior.
#[derive(Debug, Clone)]
pub struct AnalysisParams {
    /// Vocabulary drawn from when a filler lands
    pub filler_vocabulary: Vec<String>,
    /// Per-tick probability that a word boundary lands
    pub word_probability: f64,
    /// Probability that a landed word is a filler
    pub filler_probability: f64,
    /// Lower fluency bound in percent
    pub fluency_floor: f64,
    /// Upper fluency bound in percent
    pub fluency_ceiling: f64,
    /// Mean magnitude above which the signal grades Good
    pub quality_threshold: f32,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            filler_vocabulary: DEFAULT_FILLER_WORDS.iter().map(|w| w.to_string()).collect(),
            word_probability: 0.15,
            filler_probability: 0.10,
            fluency_floor: 70.0,
            fluency_ceiling: 95.0,
            quality_threshold: 50.0,
        }
    }
}

/// Output of one extraction pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The reading surfaced to buffers and observers
    pub sample: MetricSample,
    /// 1 when a word boundary landed on this tick
    pub word_delta: u32,
    /// Filler detected on this tick, if any
    pub filler: Option<FillerEvent>,
}

/// Pure per-tick metric computation.
///
/// Holds no session state: everything is derived from the frame, the
/// elapsed time, the running word count, and the caller's random source.
/// The draw order is fixed (word boundary, then filler, then filler
/// choice, then pitch jitter) so a seeded session replays exactly.
#[derive(Debug, Clone)]
pub struct MetricExtractor {
    params: AnalysisParams,
}

impl MetricExtractor {
    pub fn new(params: AnalysisParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Compute the metrics for one tick.
    ///
    /// `words_before` is the session word count before this tick; the
    /// returned sample's pace already includes this tick's word, if any.
    pub fn extract(
        &self,
        frame: &AnalysisFrame,
        elapsed_secs: f64,
        words_before: u32,
        rng: &mut dyn RandomSource,
    ) -> Extraction {
        let word_delta = u32::from(rng.next_unit() < self.params.word_probability);
        let filler = if word_delta > 0 && rng.next_unit() < self.params.filler_probability {
            self.pick_filler(elapsed_secs, rng)
        } else {
            None
        };

        let words = words_before + word_delta;
        let wpm = if elapsed_secs > 0.0 {
            (words as f64 / elapsed_secs * 60.0).round() as u32
        } else {
            0
        };

        let fluency = FLUENCY_CENTER + FLUENCY_SWING * elapsed_secs.sin();
        let fluency_pct = fluency
            .min(self.params.fluency_ceiling)
            .max(self.params.fluency_floor)
            .round() as u8;

        let mean = frame.mean_magnitude();
        let signal_quality = if mean > self.params.quality_threshold {
            SignalQuality::Good
        } else {
            SignalQuality::Poor
        };

        let pitch = PITCH_BASE_HZ
            + PITCH_SWING_HZ * (2.0 * elapsed_secs).sin()
            + rng.next_unit() * PITCH_JITTER_HZ;

        Extraction {
            sample: MetricSample {
                t: elapsed_secs,
                pitch_hz: pitch as f32,
                wpm,
                fluency_pct,
                dominant_freq_hz: mean * DOMINANT_FREQ_SCALE,
                amplitude: mean / SAMPLE_CEILING,
                signal_quality,
            },
            word_delta,
            filler,
        }
    }

    fn pick_filler(&self, t: f64, rng: &mut dyn RandomSource) -> Option<FillerEvent> {
        let vocab = &self.params.filler_vocabulary;
        if vocab.is_empty() {
            return None;
        }
        let idx = ((rng.next_unit() * vocab.len() as f64) as usize).min(vocab.len() - 1);
        Some(FillerEvent {
            word: vocab[idx].clone(),
            t,
        })
    }
}
