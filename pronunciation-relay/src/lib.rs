//! pronunciation-relay library interface
//!
//! Relays a chat platform's audio URL and reference text to Azure Speech
//! pronunciation assessment and returns a simplified score and feedback
//! payload. Exposed as a library for integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::config::{CliArgs, RelayConfig};
pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{AudioFetcher, AudioSource, AzureAssessmentClient, PronunciationAssessor};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Startup configuration
    pub config: Arc<RelayConfig>,
    /// Audio downloader
    pub audio_source: Arc<dyn AudioSource>,
    /// Pronunciation assessment backend
    pub assessor: Arc<dyn PronunciationAssessor>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        config: RelayConfig,
        audio_source: Arc<dyn AudioSource>,
        assessor: Arc<dyn PronunciationAssessor>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            audio_source,
            assessor,
            startup_time: Utc::now(),
        }
    }

    /// State wired to the real downloader and Azure client
    pub fn from_config(config: RelayConfig) -> anyhow::Result<Self> {
        let audio_source = AudioFetcher::from_config(&config)?;
        let assessor = AzureAssessmentClient::from_config(&config)?;
        Ok(Self::new(config, Arc::new(audio_source), Arc::new(assessor)))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::assess_routes())
        .merge(api::language_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
