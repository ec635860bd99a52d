//! pronunciation-relay - Pronunciation Assessment Middleware
//!
//! Bridges chatbot platforms to Azure Speech pronunciation assessment:
//! - GET  /          service status
//! - POST /assess    score a recording against reference text
//! - GET  /languages supported locales

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pronunciation_relay::{build_router, AppState, CliArgs, RelayConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pronunciation_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting pronunciation-relay v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = RelayConfig::from(CliArgs::parse());

    if config.is_speech_configured() {
        info!(region = %config.region, "Azure Speech configured");
    } else {
        warn!("AZURE_SPEECH_KEY not set; /assess will answer 500 until it is configured");
    }
    if config.transcode {
        info!(ffmpeg = %config.ffmpeg_path.display(), "Audio normalization enabled");
    }

    let addr = config
        .listen_addr()
        .context("Invalid listen address")?;

    let state = AppState::from_config(config).context("Failed to initialize HTTP clients")?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("pronunciation-relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
