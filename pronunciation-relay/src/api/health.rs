//! Service status endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

pub const SERVICE_NAME: &str = "Pronunciation Assessment Middleware";

/// GET / response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Always "running" while the process serves requests
    pub status: String,
    pub service: String,
    /// Whether a usable speech key is present (the key itself is never exposed)
    pub azure_configured: bool,
    pub region: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
}

/// GET /
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    Json(StatusResponse {
        status: "running".to_string(),
        service: SERVICE_NAME.to_string(),
        azure_configured: state.config.is_speech_configured(),
        region: state.config.region.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
    })
}

/// Build status routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(status))
}
