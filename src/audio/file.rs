use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hound::WavReader;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use tracing::info;

use super::frame::{AnalysisFrame, ANALYSIS_BINS, ANALYSIS_WINDOW, SAMPLE_CEILING};
use super::source::{FrameSource, SourceError};

/// Frame source backed by a pre-recorded WAV file.
///
/// Playback is paced by the analysis clock, not wall time: every pull
/// consumes one non-overlapping window of samples, runs it through a
/// Hann-windowed FFT, and quantizes both views to the byte scale. The
/// source goes inactive once fewer than a full window of samples remains.
pub struct WavFileSource {
    path: PathBuf,
    samples: Vec<f32>,
    cursor: usize,
    fft: Option<Arc<dyn Fft<f32>>>,
    acquired: bool,
}

impl WavFileSource {
    /// Create a source for the given file. No I/O happens until `acquire()`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            samples: Vec::new(),
            cursor: 0,
            fft: None,
            acquired: false,
        }
    }

    /// Read the file and fold interleaved channels down to mono in -1..=1.
    fn load(path: &Path) -> Result<Vec<f32>, SourceError> {
        let decode_err = |reason: String| SourceError::Decode {
            path: path.display().to_string(),
            reason,
        };

        let mut reader = WavReader::open(path).map_err(|e| decode_err(e.to_string()))?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let raw: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| decode_err(e.to_string()))?
            }
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| decode_err(e.to_string()))?,
        };

        if channels == 1 {
            return Ok(raw);
        }
        Ok(raw
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect())
    }
}

#[async_trait::async_trait]
impl FrameSource for WavFileSource {
    async fn acquire(&mut self) -> Result<(), SourceError> {
        info!("Opening audio file: {}", self.path.display());

        let samples = Self::load(&self.path)?;
        if samples.len() < ANALYSIS_WINDOW {
            return Err(SourceError::Decode {
                path: self.path.display().to_string(),
                reason: format!(
                    "file holds {} samples, shorter than one analysis window of {}",
                    samples.len(),
                    ANALYSIS_WINDOW
                ),
            });
        }

        info!(
            "Audio file loaded: {} mono samples, {} analysis windows",
            samples.len(),
            samples.len() / ANALYSIS_WINDOW
        );

        let mut planner = FftPlanner::new();
        self.fft = Some(planner.plan_fft_forward(ANALYSIS_WINDOW));
        self.samples = samples;
        self.cursor = 0;
        self.acquired = true;
        Ok(())
    }

    fn current_frame(&mut self) -> Option<AnalysisFrame> {
        if !self.is_active() {
            return None;
        }
        let fft = self.fft.as_ref()?;

        let window = &self.samples[self.cursor..self.cursor + ANALYSIS_WINDOW];
        self.cursor += ANALYSIS_WINDOW;

        let time_domain: Vec<u8> = window
            .iter()
            .map(|&s| (s * 127.0 + 128.0).clamp(0.0, 255.0) as u8)
            .collect();

        // Hann window, then forward FFT over the same samples
        let mut buffer: Vec<Complex<f32>> = window
            .iter()
            .enumerate()
            .map(|(i, &s)| Complex::new(s * hann_window(i, ANALYSIS_WINDOW), 0.0))
            .collect();
        fft.process(&mut buffer);

        let scale = 2.0 / ANALYSIS_WINDOW as f32;
        let freq_bins: Vec<u8> = buffer[..ANALYSIS_BINS]
            .iter()
            .map(|c| (c.norm() * scale * SAMPLE_CEILING).clamp(0.0, 255.0) as u8)
            .collect();

        Some(AnalysisFrame {
            time_domain,
            freq_bins,
        })
    }

    fn is_active(&self) -> bool {
        self.acquired && self.cursor + ANALYSIS_WINDOW <= self.samples.len()
    }

    fn release(&mut self) {
        self.acquired = false;
    }

    fn name(&self) -> &str {
        "wav-file"
    }
}

/// Hann window coefficient for one sample index.
fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
