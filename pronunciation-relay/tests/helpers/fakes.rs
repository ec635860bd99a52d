//! In-process stand-ins for the download and assessment backends

use async_trait::async_trait;
use pronunciation_relay::models::{AudioPayload, RawAssessmentResult};
use pronunciation_relay::services::{AudioSource, FetchError, PronunciationAssessor, RemoteError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Audio source returning fixed bytes or a fixed HTTP failure
pub struct FakeAudioSource {
    outcome: Result<Vec<u8>, u16>,
    calls: AtomicUsize,
    last_url: Mutex<Option<String>>,
}

impl FakeAudioSource {
    pub fn returning(bytes: &[u8]) -> Self {
        Self {
            outcome: Ok(bytes.to_vec()),
            calls: AtomicUsize::new(0),
            last_url: Mutex::new(None),
        }
    }

    pub fn failing_with(status: u16) -> Self {
        Self {
            outcome: Err(status),
            calls: AtomicUsize::new(0),
            last_url: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_url(&self) -> Option<String> {
        self.last_url.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioSource for FakeAudioSource {
    async fn fetch(&self, url: &str) -> Result<AudioPayload, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock().unwrap() = Some(url.to_string());
        match &self.outcome {
            Ok(bytes) => Ok(AudioPayload::source(bytes.clone(), None)),
            Err(status) => Err(FetchError::HttpStatus(*status)),
        }
    }
}

/// What the fake assessor answers with
pub enum FakeResponse {
    Json(serde_json::Value),
    Status(u16, String),
    Transport(String),
}

/// Assessor recording every call it receives
pub struct FakeAssessor {
    response: FakeResponse,
    calls: AtomicUsize,
    last_call: Mutex<Option<(String, String)>>,
}

impl FakeAssessor {
    pub fn new(response: FakeResponse) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        }
    }

    pub fn with_json(value: serde_json::Value) -> Self {
        Self::new(FakeResponse::Json(value))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (reference_text, language) of the most recent call
    pub fn last_call(&self) -> Option<(String, String)> {
        self.last_call.lock().unwrap().clone()
    }
}

#[async_trait]
impl PronunciationAssessor for FakeAssessor {
    async fn assess(
        &self,
        _audio: AudioPayload,
        reference_text: &str,
        language: &str,
    ) -> Result<RawAssessmentResult, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some((reference_text.to_string(), language.to_string()));

        match &self.response {
            FakeResponse::Json(value) => RawAssessmentResult::from_slice(value.to_string().as_bytes())
                .map_err(|e| RemoteError::Malformed(e.to_string())),
            FakeResponse::Status(status, body) => Err(RemoteError::Status {
                status: *status,
                body: body.clone(),
            }),
            FakeResponse::Transport(message) => Err(RemoteError::Transport(message.clone())),
        }
    }
}
