// Example: Run a full coaching session over a generated signal
//
// This example demonstrates the complete metrics pipeline:
// 1. Build a session around a seeded synthetic frame source
// 2. Let the analysis loop tick for the requested duration
// 3. Stop, wait out the settle delay, and print the coaching report
//
// Usage: cargo run --example simulated_session -- --duration 10 --seed 42
//
// Pass --wav path/to/file.wav to analyze a recording instead.

use anyhow::Result;
use clap::Parser;
use speech_coach::audio::{SourceFactory, SourceKind};
use speech_coach::boundary::LogObserver;
use speech_coach::session::{CoachingSession, SessionConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "simulated_session")]
#[command(about = "Run a coaching session over a synthetic or WAV source")]
struct Args {
    /// Duration to record in seconds
    #[arg(short, long, default_value = "10")]
    duration: u64,

    /// Seed for the session's random draws
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Session ID
    #[arg(long, default_value = "demo-session")]
    session_id: String,

    /// Tick interval in milliseconds
    #[arg(short, long, default_value = "16")]
    tick_ms: u64,

    /// Analyze a WAV file instead of the synthetic source
    #[arg(short, long)]
    wav: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let args = Args::parse();

    info!("Speech Coach - Simulated Session Example");
    info!("Recording for {} seconds", args.duration);
    info!("Session ID: {}", args.session_id);
    info!("Seed: {}", args.seed);

    let config = SessionConfig {
        session_id: args.session_id.clone(),
        tick_interval: Duration::from_millis(args.tick_ms),
        rng_seed: Some(args.seed),
        ..SessionConfig::default()
    };
    let settle_delay = config.settle_delay;

    let kind = match args.wav {
        Some(path) => SourceKind::WavFile(path),
        None => SourceKind::Synthetic { seed: args.seed },
    };

    let session = CoachingSession::new(config, Arc::new(LogObserver));
    let source = SourceFactory::create(kind);

    info!("Starting analysis...");
    session.start(source).await?;

    sleep(Duration::from_secs(args.duration)).await;

    info!("Stopping session...");
    let snapshot = session.stop().await;
    info!(
        "Recorded {:.1}s: {} words, {} fillers",
        snapshot.elapsed_secs, snapshot.word_count, snapshot.filler_count
    );
    if !snapshot.recent_fillers.is_empty() {
        info!("Recent fillers: {}", snapshot.recent_fillers.join(", "));
    }

    // Wait for the report to settle
    sleep(settle_delay + Duration::from_millis(200)).await;

    match session.report().await {
        Some(report) => {
            info!("Coaching report:");
            for insight in &report.insights {
                info!("  - [{:?}] {}", insight.category, insight.text);
            }
            info!("Pace trend: {:?}", report.pace_trend);
            info!("Fluency score: {}%", report.fluency_score_pct);
            info!("Pronunciation score: {}%", report.pronunciation_score_pct);
        }
        None => info!("Report not ready"),
    }

    Ok(())
}
