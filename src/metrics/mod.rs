pub mod extractor;
pub mod insight;
pub mod random;
pub mod sample;
pub mod series;

pub use extractor::{AnalysisParams, Extraction, MetricExtractor, DEFAULT_FILLER_WORDS};
pub use insight::{Insight, InsightCategory, InsightGenerator, PaceTrend, SessionAggregate, SessionReport};
pub use random::{RandomSource, SeededRandom};
pub use sample::{FillerEvent, MetricSample, PacePoint, SignalQuality};
pub use series::{RollingSeries, SeriesPoint};
