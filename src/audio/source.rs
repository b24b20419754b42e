use std::path::PathBuf;

use super::frame::AnalysisFrame;

/// Errors raised while opening or reading a frame source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The capture device or stream could not be opened.
    #[error("Audio source unavailable: {0}")]
    Unavailable(String),

    /// A WAV file could not be read or decoded.
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// A producer of analysis frames.
///
/// Implementations:
/// - Synthetic: seeded signal generator (demos, deterministic tests)
/// - WavFile: FFT over a pre-recorded WAV, one window per pull
#[async_trait::async_trait]
pub trait FrameSource: Send + Sync {
    /// Open the underlying device or file.
    async fn acquire(&mut self) -> Result<(), SourceError>;

    /// Pull the newest frame, or `None` when nothing fresh is available.
    fn current_frame(&mut self) -> Option<AnalysisFrame>;

    /// Whether the source can still produce frames.
    fn is_active(&self) -> bool;

    /// Release the underlying device or file.
    fn release(&mut self);

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Selects which frame source a session reads from.
#[derive(Debug, Clone)]
pub enum SourceKind {
    /// Generated speech-like signal, seeded for reproducibility.
    Synthetic { seed: u64 },
    /// Pre-recorded WAV file, played back one analysis window per tick.
    WavFile(PathBuf),
}

/// Frame source factory.
pub struct SourceFactory;

impl SourceFactory {
    /// Create a frame source for the requested kind.
    pub fn create(kind: SourceKind) -> Box<dyn FrameSource> {
        match kind {
            SourceKind::Synthetic { seed } => Box::new(super::synthetic::SyntheticSource::new(seed)),
            SourceKind::WavFile(path) => Box::new(super::file::WavFileSource::new(path)),
        }
    }
}
