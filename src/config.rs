use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

use crate::metrics::AnalysisParams;
use crate::session::SessionConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub session: SessionSettings,
    pub analysis: AnalysisSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
    /// Forward session events to NATS when set
    pub nats_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    pub tick_ms: u64,
    pub settle_ms: u64,
    pub pitch_capacity: usize,
    pub pace_capacity: usize,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisSettings {
    pub filler_vocabulary: Vec<String>,
    pub word_probability: f64,
    pub filler_probability: f64,
    pub fluency_floor: f64,
    pub fluency_ceiling: f64,
    pub quality_threshold: f32,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Session settings applied to every new session.
    pub fn session_template(&self) -> SessionConfig {
        SessionConfig {
            tick_interval: Duration::from_millis(self.session.tick_ms),
            settle_delay: Duration::from_millis(self.session.settle_ms),
            pitch_capacity: self.session.pitch_capacity,
            pace_capacity: self.session.pace_capacity,
            analysis: AnalysisParams {
                filler_vocabulary: self.analysis.filler_vocabulary.clone(),
                word_probability: self.analysis.word_probability,
                filler_probability: self.analysis.filler_probability,
                fluency_floor: self.analysis.fluency_floor,
                fluency_ceiling: self.analysis.fluency_ceiling,
                quality_threshold: self.analysis.quality_threshold,
            },
            ..SessionConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_the_shipped_config() {
        let config = Config::load("config/speech-coach").unwrap();
        assert_eq!(config.service.name, "speech-coach");

        let template = config.session_template();
        assert_eq!(template.tick_interval, Duration::from_millis(16));
        assert_eq!(template.settle_delay, Duration::from_millis(1500));
        assert_eq!(template.pitch_capacity, 20);
        assert_eq!(template.pace_capacity, 15);
        assert_eq!(template.analysis.filler_vocabulary.len(), 5);
    }
}
