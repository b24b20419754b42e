use serde::{Deserialize, Serialize};

/// Signal quality grade derived from the mean spectrum magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalQuality {
    Good,
    Poor,
}

/// One per-tick metrics reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Seconds since the session started
    pub t: f64,
    /// Synthesized pitch estimate in Hz
    pub pitch_hz: f32,
    /// Words per minute over the whole session so far
    pub wpm: u32,
    /// Fluency percentage, bounded by the configured floor and ceiling
    pub fluency_pct: u8,
    /// Strongest frequency component estimate in Hz
    pub dominant_freq_hz: f32,
    /// Mean signal level normalized to 0..=1
    pub amplitude: f32,
    /// Good when the spectrum carries enough energy
    pub signal_quality: SignalQuality,
}

/// A detected filler word and the moment it occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillerEvent {
    pub word: String,
    /// Seconds since the session started
    pub t: f64,
}

/// Paired pace reading held by the rolling pace series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacePoint {
    pub wpm: u32,
    pub fluency_pct: u8,
}
