pub mod file;
pub mod frame;
pub mod source;
pub mod synthetic;

pub use file::WavFileSource;
pub use frame::{AnalysisFrame, FrameSampler, ANALYSIS_BINS, ANALYSIS_WINDOW, SAMPLE_CEILING, WAVEFORM_MIDPOINT};
pub use source::{FrameSource, SourceError, SourceFactory, SourceKind};
pub use synthetic::SyntheticSource;
