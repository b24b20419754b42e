use std::sync::Arc;

use anyhow::Result;
use speech_coach::boundary::{LogObserver, ObserverRef};
use speech_coach::nats::NatsObserver;
use speech_coach::{create_router, AppState, Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = Config::load("config/speech-coach")?;

    info!("Speech Coach v0.1.0");
    info!("Loaded config: {}", cfg.service.name);

    let observer: ObserverRef = match &cfg.service.nats_url {
        Some(url) => Arc::new(NatsObserver::connect(url).await?),
        None => {
            info!("No NATS URL configured; session events go to the log");
            Arc::new(LogObserver)
        }
    };

    let state = AppState::new(cfg.session_template(), observer);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
