use serde::{Deserialize, Serialize};
use tracing::debug;

use super::random::RandomSource;
use super::sample::FillerEvent;

/// Pace below this reads as too slow.
const SLOW_WPM: u32 = 120;
/// Pace above this reads as too fast.
const FAST_WPM: u32 = 180;
/// Pace above this grades the session trend Increasing.
const TREND_WPM: u32 = 150;
/// Filler count above this triggers the reduction insight.
const FILLER_TOLERANCE: usize = 5;
/// Fluency score floor in percent.
const FLUENCY_SCORE_FLOOR: i64 = 75;
/// Fluency penalty per filler in percent.
const FLUENCY_PENALTY: i64 = 3;
/// Pronunciation score band: base plus a uniform spread.
const PRONUNCIATION_BASE: f64 = 90.0;
const PRONUNCIATION_SPREAD: f64 = 8.0;

const PACE_TOO_SLOW: &str = "Try to increase speaking pace slightly for better engagement";
const PACE_TOO_FAST: &str = "Consider slowing down slightly for better comprehension";
const PACE_OPTIMAL: &str = "Your speaking pace is optimal for comprehension";
const FILLERS_HIGH: &str = "Work on reducing filler words for more professional delivery";
const FILLERS_MINIMAL: &str = "Minimal use of filler words detected";
const INTONATION_REMARK: &str = "Pitch variation shows good intonation patterns";

/// Coaching feedback themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightCategory {
    Pace,
    FillerUsage,
    Intonation,
}

/// One piece of end-of-session feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub text: String,
}

/// Direction of the speaking pace across the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaceTrend {
    Increasing,
    Stable,
}

/// Final coaching summary produced once a stopped session settles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub insights: Vec<Insight>,
    pub pace_trend: PaceTrend,
    /// 75..=100, penalized per filler
    pub fluency_score_pct: u8,
    /// Sampled in 90..=98
    pub pronunciation_score_pct: u8,
}

/// Totals accumulated over a session, the input to report generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAggregate {
    pub total_words: u32,
    pub filler_events: Vec<FillerEvent>,
    /// Pace reading from the last sample of the session
    pub final_wpm: u32,
}

/// Turns session totals into the final coaching report.
pub struct InsightGenerator;

impl InsightGenerator {
    pub fn generate(aggregate: &SessionAggregate, rng: &mut dyn RandomSource) -> SessionReport {
        let filler_count = aggregate.filler_events.len();
        debug!(
            "Generating report: {} words, {} fillers, final pace {} wpm",
            aggregate.total_words, filler_count, aggregate.final_wpm
        );

        let pace_text = if aggregate.final_wpm < SLOW_WPM {
            PACE_TOO_SLOW
        } else if aggregate.final_wpm > FAST_WPM {
            PACE_TOO_FAST
        } else {
            PACE_OPTIMAL
        };

        let filler_text = if filler_count > FILLER_TOLERANCE {
            FILLERS_HIGH
        } else {
            FILLERS_MINIMAL
        };

        let insights = vec![
            Insight {
                category: InsightCategory::Pace,
                text: pace_text.to_string(),
            },
            Insight {
                category: InsightCategory::FillerUsage,
                text: filler_text.to_string(),
            },
            Insight {
                category: InsightCategory::Intonation,
                text: INTONATION_REMARK.to_string(),
            },
        ];

        let pace_trend = if aggregate.final_wpm > TREND_WPM {
            PaceTrend::Increasing
        } else {
            PaceTrend::Stable
        };

        let fluency_score_pct =
            (100 - FLUENCY_PENALTY * filler_count as i64).max(FLUENCY_SCORE_FLOOR) as u8;
        let pronunciation_score_pct =
            (PRONUNCIATION_BASE + rng.next_unit() * PRONUNCIATION_SPREAD).round() as u8;

        SessionReport {
            insights,
            pace_trend,
            fluency_score_pct,
            pronunciation_score_pct,
        }
    }
}
