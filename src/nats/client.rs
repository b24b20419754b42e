use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{error, info};

use super::messages::{FillerMessage, ReportMessage, SampleMessage, StateMessage};
use crate::boundary::MetricsObserver;
use crate::metrics::{FillerEvent, MetricSample, SessionReport};
use crate::session::SessionState;

enum Outbound {
    Sample(SampleMessage),
    State(StateMessage),
    Filler(FillerMessage),
    Report(ReportMessage),
}

impl Outbound {
    fn subject(&self) -> String {
        match self {
            Outbound::Sample(m) => format!("coach.metrics.{}", m.session_id),
            Outbound::State(m) => format!("coach.state.{}", m.session_id),
            Outbound::Filler(m) => format!("coach.filler.{}", m.session_id),
            Outbound::Report(m) => format!("coach.report.{}", m.session_id),
        }
    }

    fn payload(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            Outbound::Sample(m) => serde_json::to_vec(m),
            Outbound::State(m) => serde_json::to_vec(m),
            Outbound::Filler(m) => serde_json::to_vec(m),
            Outbound::Report(m) => serde_json::to_vec(m),
        }
    }
}

/// Observer that forwards session events to NATS subjects.
///
/// Notifications are queued on an unbounded channel and published by a
/// background task, so the tick path never waits on the wire.
pub struct NatsObserver {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl NatsObserver {
    /// Connect to NATS and spawn the publisher task.
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        let (tx, mut rx) = mpsc::unbounded_channel::<Outbound>();

        tokio::spawn(async move {
            info!("NATS publisher task started");

            while let Some(outbound) = rx.recv().await {
                let subject = outbound.subject();
                let payload = match outbound.payload() {
                    Ok(payload) => payload,
                    Err(e) => {
                        error!("Failed to encode message for {}: {}", subject, e);
                        continue;
                    }
                };

                if let Err(e) = client.publish(subject.clone(), payload.into()).await {
                    error!("Failed to publish to {}: {}", subject, e);
                }
            }

            info!("NATS publisher task stopped");
        });

        Ok(Self { tx })
    }

    fn send(&self, outbound: Outbound) {
        if self.tx.send(outbound).is_err() {
            error!("NATS publisher task is gone; dropping message");
        }
    }
}

impl MetricsObserver for NatsObserver {
    fn on_state(&self, session_id: &str, state: SessionState) {
        self.send(Outbound::State(StateMessage {
            session_id: session_id.to_string(),
            state,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }));
    }

    fn on_sample(&self, session_id: &str, sample: &MetricSample) {
        self.send(Outbound::Sample(SampleMessage {
            session_id: session_id.to_string(),
            sample: sample.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }));
    }

    fn on_filler(&self, session_id: &str, filler: &FillerEvent) {
        self.send(Outbound::Filler(FillerMessage {
            session_id: session_id.to_string(),
            word: filler.word.clone(),
            t: filler.t,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }));
    }

    fn on_report(&self, session_id: &str, report: &SessionReport) {
        self.send(Outbound::Report(ReportMessage {
            session_id: session_id.to_string(),
            report: report.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }));
    }
}
