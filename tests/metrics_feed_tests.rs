// Integration tests for the metrics feed
//
// Covers the JSON shape of the NATS messages, analysis over a real WAV
// fixture written with hound, and the rolling-series bounds as a full
// session streams through the pipeline.

use std::f32::consts::TAU;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use speech_coach::audio::{
    FrameSampler, FrameSource, SourceFactory, SourceKind, SyntheticSource, WavFileSource,
    ANALYSIS_BINS, ANALYSIS_WINDOW,
};
use speech_coach::boundary::MemoryObserver;
use speech_coach::metrics::{
    FillerEvent, InsightGenerator, MetricSample, SeededRandom, SessionAggregate, SignalQuality,
};
use speech_coach::nats::{FillerMessage, ReportMessage, SampleMessage, StateMessage};
use speech_coach::session::{SessionConfig, SessionController, SessionState};
use tempfile::TempDir;

const FIXTURE_RATE: u32 = 16_000;
const FIXTURE_TONE_HZ: f32 = 440.0;

/// Write a one-channel 16-bit sine tone for the analysis tests.
fn write_tone(path: &Path, seconds: f32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: FIXTURE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    let total = (seconds * FIXTURE_RATE as f32) as u32;
    for i in 0..total {
        let t = i as f32 / FIXTURE_RATE as f32;
        let value = 0.8 * (TAU * FIXTURE_TONE_HZ * t).sin();
        writer.write_sample((value * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

#[test]
fn test_sample_message_serialization() -> Result<()> {
    let msg = SampleMessage {
        session_id: "coach-abc".to_string(),
        sample: MetricSample {
            t: 4.5,
            pitch_hz: 172.4,
            wpm: 168,
            fluency_pct: 88,
            dominant_freq_hz: 620.0,
            amplitude: 0.24,
            signal_quality: SignalQuality::Good,
        },
        timestamp: "2025-06-01T12:00:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg)?;
    assert!(json.contains("coach-abc"));
    assert!(json.contains("\"wpm\":168"));
    assert!(json.contains("\"signal_quality\":\"Good\""));

    let decoded: SampleMessage = serde_json::from_str(&json)?;
    assert_eq!(decoded.session_id, msg.session_id);
    assert_eq!(decoded.sample, msg.sample);
    Ok(())
}

#[test]
fn test_state_message_serializes_lowercase_states() -> Result<()> {
    let msg = StateMessage {
        session_id: "coach-abc".to_string(),
        state: SessionState::Recording,
        timestamp: "2025-06-01T12:00:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg)?;
    assert!(json.contains("\"state\":\"recording\""));

    let decoded: StateMessage = serde_json::from_str(&json)?;
    assert_eq!(decoded.state, SessionState::Recording);
    Ok(())
}

#[test]
fn test_filler_message_round_trip() -> Result<()> {
    let msg = FillerMessage {
        session_id: "coach-abc".to_string(),
        word: "you know".to_string(),
        t: 12.25,
        timestamp: "2025-06-01T12:00:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg)?;
    assert!(json.contains("you know"));

    let decoded: FillerMessage = serde_json::from_str(&json)?;
    assert_eq!(decoded.word, "you know");
    assert_eq!(decoded.t, 12.25);
    Ok(())
}

#[test]
fn test_report_message_round_trip() -> Result<()> {
    let aggregate = SessionAggregate {
        total_words: 42,
        filler_events: vec![FillerEvent {
            word: "um".to_string(),
            t: 3.0,
        }],
        final_wpm: 160,
    };
    let mut rng = SeededRandom::new(7);
    let report = InsightGenerator::generate(&aggregate, &mut rng);

    let msg = ReportMessage {
        session_id: "coach-abc".to_string(),
        report,
        timestamp: "2025-06-01T12:00:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg)?;
    assert!(json.contains("\"insights\""));
    assert!(json.contains("\"pace_trend\""));

    let decoded: ReportMessage = serde_json::from_str(&json)?;
    assert_eq!(decoded.report.insights.len(), 3);
    assert_eq!(decoded.report.fluency_score_pct, 97);
    assert_eq!(decoded.report.pace_trend, msg.report.pace_trend);
    Ok(())
}

#[tokio::test]
async fn test_wav_source_yields_every_full_window() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("tone.wav");
    write_tone(&path, 1.0)?;

    let mut source = WavFileSource::new(&path);
    assert!(!source.is_active());
    source.acquire().await?;

    // 16000 samples hold exactly 7 non-overlapping windows of 2048
    for _ in 0..7 {
        let frame = source.current_frame().expect("a full window remains");
        assert_eq!(frame.time_domain.len(), ANALYSIS_WINDOW);
        assert_eq!(frame.freq_bins.len(), ANALYSIS_BINS);
    }

    assert!(!source.is_active());
    assert!(source.current_frame().is_none());
    Ok(())
}

#[tokio::test]
async fn test_wav_frames_locate_the_tone() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("tone.wav");
    write_tone(&path, 1.0)?;

    let mut source = WavFileSource::new(&path);
    source.acquire().await?;
    let frame = source.current_frame().expect("first window");

    // The waveform swings well away from the silence midpoint
    let max = *frame.time_domain.iter().max().unwrap();
    let min = *frame.time_domain.iter().min().unwrap();
    assert!(max > 200, "waveform peak too low: {max}");
    assert!(min < 60, "waveform trough too high: {min}");

    // The spectrum peaks at the tone: 440 Hz / (16000 / 2048) = bin 56
    let (peak_bin, peak_level) = frame
        .freq_bins
        .iter()
        .enumerate()
        .max_by_key(|(_, &level)| level)
        .map(|(i, &level)| (i, level))
        .unwrap();
    assert!(
        (53..=59).contains(&peak_bin),
        "tone landed in bin {peak_bin}"
    );
    assert!(peak_level > 40, "tone magnitude too low: {peak_level}");
    Ok(())
}

#[tokio::test]
async fn test_session_over_a_wav_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("tone.wav");
    write_tone(&path, 1.0)?;

    let mut source = SourceFactory::create(SourceKind::WavFile(path));
    source.acquire().await?;

    let observer = Arc::new(MemoryObserver::new());
    let config = SessionConfig {
        session_id: "wav-session".to_string(),
        rng_seed: Some(11),
        ..SessionConfig::default()
    };
    let mut controller = SessionController::new(config, observer.clone());
    controller.start(FrameSampler::new(source)).unwrap();

    // Ticks past the end of the file find no frame and change nothing
    for i in 1..=9 {
        controller.tick(i as f64 * 0.5);
    }

    let samples = observer.samples();
    assert_eq!(samples.len(), 7);
    let last = samples.last().unwrap();
    assert!(last.amplitude > 0.0);
    assert!(last.dominant_freq_hz > 0.0);
    assert_eq!(controller.snapshot().elapsed_secs, 3.5);

    controller.stop();
    controller.finalize();
    assert_eq!(controller.state(), SessionState::Complete);
    assert!(controller.report().is_some());
    Ok(())
}

#[test]
fn test_rolling_series_caps_hold_through_a_long_session() {
    let observer = Arc::new(MemoryObserver::new());
    let config = SessionConfig {
        session_id: "long-session".to_string(),
        rng_seed: Some(3),
        ..SessionConfig::default()
    };
    let mut controller = SessionController::new(config, observer.clone());
    controller
        .start(FrameSampler::new(Box::new(SyntheticSource::new(3))))
        .unwrap();

    for i in 1..=40 {
        controller.tick(i as f64 * 0.25);
    }

    // Chart histories stay bounded while the observer feed sees every tick
    assert_eq!(controller.pitch_snapshot().len(), 20);
    assert_eq!(controller.pace_snapshot().len(), 15);
    assert_eq!(observer.samples().len(), 40);
    assert!(controller.snapshot().recent_fillers.len() <= 5);

    // The oldest retained pitch point is tick 21 of 40
    let pitch = controller.pitch_snapshot();
    assert_eq!(pitch.first().unwrap().t, 21.0 * 0.25);
    assert_eq!(pitch.last().unwrap().t, 40.0 * 0.25);
}

#[test]
fn test_factory_builds_deterministic_synthetic_sources() {
    let mut first = SourceFactory::create(SourceKind::Synthetic { seed: 7 });
    let mut second = SourceFactory::create(SourceKind::Synthetic { seed: 7 });

    assert!(first.is_active());
    assert_eq!(first.name(), "synthetic");
    assert_eq!(first.current_frame(), second.current_frame());
}
