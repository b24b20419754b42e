pub mod audio;
pub mod boundary;
pub mod config;
pub mod http;
pub mod metrics;
pub mod nats;
pub mod session;

pub use audio::{
    AnalysisFrame, FrameSampler, FrameSource, SourceError, SourceFactory, SourceKind,
    SyntheticSource, WavFileSource,
};
pub use boundary::{LogObserver, MemoryObserver, MetricsObserver, NullObserver, ObserverRef};
pub use config::Config;
pub use http::{create_router, AppState};
pub use metrics::{
    AnalysisParams, FillerEvent, InsightGenerator, MetricExtractor, MetricSample, PacePoint,
    PaceTrend, RollingSeries, SeriesPoint, SessionAggregate, SessionReport, SignalQuality,
};
pub use nats::{FillerMessage, NatsObserver, ReportMessage, SampleMessage, StateMessage};
pub use session::{
    CoachingSession, SessionConfig, SessionController, SessionError, SessionSnapshot, SessionState,
};
