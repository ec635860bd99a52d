//! Audio download from caller-supplied URLs

use crate::config::RelayConfig;
use crate::models::AudioPayload;
use crate::services::transcoder::Transcoder;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("pronunciation-relay/", env!("CARGO_PKG_VERSION"));
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Download errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Download returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Audio exceeds {limit} bytes")]
    TooLarge { limit: u64 },
}

/// Source of audio for an assessment
#[async_trait]
pub trait AudioSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<AudioPayload, FetchError>;
}

/// reqwest-backed downloader with optional normalization
pub struct AudioFetcher {
    http_client: reqwest::Client,
    max_bytes: u64,
    transcoder: Option<Transcoder>,
}

impl AudioFetcher {
    pub fn new(max_bytes: u64, transcoder: Option<Transcoder>) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            max_bytes,
            transcoder,
        })
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, FetchError> {
        let transcoder = config
            .transcode
            .then(|| Transcoder::new(config.ffmpeg_path.clone()));
        Self::new(config.max_audio_bytes, transcoder)
    }

    async fn download(&self, url: &str) -> Result<AudioPayload, FetchError> {
        let mut response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        if let Some(declared) = response.content_length() {
            if declared > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Chunked bodies carry no length; enforce the cap while streaming
        let mut bytes = Vec::with_capacity(
            response
                .content_length()
                .unwrap_or(0)
                .min(self.max_bytes) as usize,
        );
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::NetworkError(e.to_string()))?
        {
            if (bytes.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(AudioPayload::source(bytes, content_type))
    }
}

#[async_trait]
impl AudioSource for AudioFetcher {
    async fn fetch(&self, url: &str) -> Result<AudioPayload, FetchError> {
        tracing::debug!(url = %url, "Downloading audio");

        let audio = self.download(url).await?;
        tracing::info!(
            bytes = audio.len(),
            content_type = audio.content_type(),
            "Audio downloaded"
        );

        match &self.transcoder {
            Some(transcoder) => Ok(transcoder.normalize(audio).await),
            None => Ok(audio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        let fetcher = AudioFetcher::new(1024, None);
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_from_config_respects_transcode_flag() {
        let config = RelayConfig::new(None).with_transcode(false);
        let fetcher = AudioFetcher::from_config(&config).unwrap();
        assert!(fetcher.transcoder.is_none());

        let config = RelayConfig::new(None).with_transcode(true);
        let fetcher = AudioFetcher::from_config(&config).unwrap();
        assert!(fetcher.transcoder.is_some());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let fetcher = AudioFetcher::new(1024, None).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:9/a.ogg").await;
        assert!(matches!(result, Err(FetchError::NetworkError(_))));
    }
}
