//! Azure Speech pronunciation assessment client
//!
//! Uploads audio to the short-audio recognition endpoint with a
//! base64-encoded `Pronunciation-Assessment` header and decodes the
//! detailed response.

use crate::config::RelayConfig;
use crate::models::{AssessmentConfig, AudioPayload, RawAssessmentResult};
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("pronunciation-relay/", env!("CARGO_PKG_VERSION"));
const ASSESSMENT_TIMEOUT: Duration = Duration::from_secs(30);

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const ASSESSMENT_HEADER: &str = "Pronunciation-Assessment";

/// Assessment call errors
///
/// All variants are terminal for the request; nothing is retried.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Azure error {status}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Transport(String),

    #[error("Malformed assessment response: {0}")]
    Malformed(String),
}

impl RemoteError {
    /// Raw body returned by the service, when there was one
    pub fn details(&self) -> &str {
        match self {
            RemoteError::Status { body, .. } => body,
            _ => "",
        }
    }
}

/// Scores recorded speech against reference text
#[async_trait]
pub trait PronunciationAssessor: Send + Sync {
    async fn assess(
        &self,
        audio: AudioPayload,
        reference_text: &str,
        language: &str,
    ) -> Result<RawAssessmentResult, RemoteError>;
}

/// Encode the assessment configuration for the `Pronunciation-Assessment` header
pub fn encode_assessment_header(config: &AssessmentConfig) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(config)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(json))
}

/// Azure Speech REST client
pub struct AzureAssessmentClient {
    http_client: reqwest::Client,
    endpoint_url: String,
    api_key: String,
}

impl AzureAssessmentClient {
    pub fn new(endpoint_url: String, api_key: String) -> Result<Self, RemoteError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(ASSESSMENT_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint_url,
            api_key,
        })
    }

    /// Client for the configured region; an unset key yields an empty key
    /// header, which handlers reject before any call is made.
    pub fn from_config(config: &RelayConfig) -> Result<Self, RemoteError> {
        Self::new(
            config.assessment_url(),
            config.speech_key().unwrap_or_default().to_string(),
        )
    }
}

#[async_trait]
impl PronunciationAssessor for AzureAssessmentClient {
    async fn assess(
        &self,
        audio: AudioPayload,
        reference_text: &str,
        language: &str,
    ) -> Result<RawAssessmentResult, RemoteError> {
        let header = encode_assessment_header(&AssessmentConfig::new(reference_text))
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let content_type = audio.content_type().to_string();
        tracing::debug!(
            language = %language,
            bytes = audio.len(),
            content_type = %content_type,
            "Requesting pronunciation assessment"
        );

        let response = self
            .http_client
            .post(&self.endpoint_url)
            .query(&[("language", language), ("format", "detailed")])
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(ASSESSMENT_HEADER, header)
            .header(reqwest::header::ACCEPT, "application/json")
            .body(audio.bytes)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Assessment service returned an error");
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let raw = RawAssessmentResult::from_slice(&body)
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;

        tracing::info!(
            recognition_status = raw.recognition_status.as_deref().unwrap_or("unknown"),
            candidates = raw.n_best.as_ref().map(|n| n.len()).unwrap_or(0),
            "Assessment response received"
        );

        Ok(raw)
    }
}
