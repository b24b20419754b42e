use super::source::FrameSource;

/// Analysis window length in time-domain samples.
pub const ANALYSIS_WINDOW: usize = 2048;

/// Number of frequency bins carried by each frame (half the window).
pub const ANALYSIS_BINS: usize = ANALYSIS_WINDOW / 2;

/// Upper bound of the byte-quantized magnitude scale.
pub const SAMPLE_CEILING: f32 = 255.0;

/// Midpoint of the byte-quantized waveform scale (silence level).
pub const WAVEFORM_MIDPOINT: u8 = 128;

/// One snapshot of the captured signal: waveform and spectrum views,
/// both quantized to the 0..=255 byte scale.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisFrame {
    /// Time-domain samples centered on [`WAVEFORM_MIDPOINT`]
    pub time_domain: Vec<u8>,
    /// Frequency-bin magnitudes, 0 = silent
    pub freq_bins: Vec<u8>,
}

impl AnalysisFrame {
    /// A frame representing pure silence.
    pub fn silent() -> Self {
        Self {
            time_domain: vec![WAVEFORM_MIDPOINT; ANALYSIS_WINDOW],
            freq_bins: vec![0; ANALYSIS_BINS],
        }
    }

    /// Mean magnitude across all frequency bins, 0.0 for an empty spectrum.
    pub fn mean_magnitude(&self) -> f32 {
        if self.freq_bins.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.freq_bins.iter().map(|&b| b as u32).sum();
        sum as f32 / self.freq_bins.len() as f32
    }
}

/// Per-tick frame puller with a last-frame fallback.
///
/// `sample()` never blocks: when the source has nothing fresh it re-serves
/// the most recent frame, and once the source goes inactive it yields
/// nothing at all.
pub struct FrameSampler {
    source: Box<dyn FrameSource>,
    last_frame: Option<AnalysisFrame>,
}

impl FrameSampler {
    pub fn new(source: Box<dyn FrameSource>) -> Self {
        Self {
            source,
            last_frame: None,
        }
    }

    /// Pull a frame for the current tick.
    pub fn sample(&mut self) -> Option<AnalysisFrame> {
        if !self.source.is_active() {
            return None;
        }
        match self.source.current_frame() {
            Some(frame) => {
                self.last_frame = Some(frame.clone());
                Some(frame)
            }
            None => self.last_frame.clone(),
        }
    }

    /// Release the underlying source.
    pub fn release(&mut self) {
        self.source.release();
    }

    /// Name of the underlying source, for logging.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }
}
