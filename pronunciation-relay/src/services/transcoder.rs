//! Audio normalization through an external transcoder
//!
//! Converts arbitrary input audio to 16 kHz mono 16-bit PCM WAV using
//! `ffmpeg`. Input and output live in a per-call scratch directory that is
//! removed when the call returns, whatever the outcome.

use crate::models::audio::{is_normalized_wav, TARGET_SAMPLE_RATE};
use crate::models::AudioPayload;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

const INPUT_FILE: &str = "input.audio";
const OUTPUT_FILE: &str = "output.wav";

/// Upper bound on a single transcoder run
pub const TRANSCODE_TIMEOUT: Duration = Duration::from_secs(60);

/// Transcoding errors (never fatal to a request)
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// Transcoder binary could not be started
    #[error("Failed to execute transcoder: {0}")]
    ExecutionError(String),

    /// Transcoder exited unsuccessfully
    #[error("Transcoder failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    /// Output was not 16 kHz mono 16-bit PCM
    #[error("Transcoder produced unexpected output format")]
    UnexpectedFormat,

    /// Scratch file I/O
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// ffmpeg-backed transcoder
#[derive(Debug, Clone)]
pub struct Transcoder {
    binary_path: PathBuf,
    scratch_parent: PathBuf,
    timeout: Duration,
}

impl Transcoder {
    pub fn new(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
            scratch_parent: std::env::temp_dir(),
            timeout: TRANSCODE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create scratch directories under `parent` instead of the system temp dir
    pub fn with_scratch_parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.scratch_parent = parent.into();
        self
    }

    /// Normalize downloaded audio, falling back to the original bytes
    ///
    /// Audio that is already normalized is tagged as such without running
    /// the transcoder.
    pub async fn normalize(&self, audio: AudioPayload) -> AudioPayload {
        if audio.is_normalized() {
            return audio;
        }
        if is_normalized_wav(&audio.bytes) {
            tracing::debug!(bytes = audio.len(), "Audio already 16 kHz mono PCM");
            return AudioPayload::pcm(audio.bytes);
        }

        match self.transcode(&audio.bytes).await {
            Ok(pcm) => {
                tracing::debug!(
                    source_bytes = audio.len(),
                    pcm_bytes = pcm.len(),
                    "Audio normalized to 16 kHz mono PCM"
                );
                AudioPayload::pcm(pcm)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Transcoding failed, sending original audio");
                audio
            }
        }
    }

    /// Run the transcoder on `input` and return the WAV bytes
    pub async fn transcode(&self, input: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        let scratch = tempfile::Builder::new()
            .prefix("relay-transcode-")
            .tempdir_in(&self.scratch_parent)?;

        let input_path = scratch.path().join(INPUT_FILE);
        let output_path = scratch.path().join(OUTPUT_FILE);
        tokio::fs::write(&input_path, input).await?;

        self.run(&input_path, &output_path).await?;

        let output = tokio::fs::read(&output_path).await?;
        if !is_normalized_wav(&output) {
            return Err(TranscodeError::UnexpectedFormat);
        }

        Ok(output)
    }

    async fn run(&self, input_path: &Path, output_path: &Path) -> Result<(), TranscodeError> {
        // ffmpeg -y -i in -ar 16000 -ac 1 -c:a pcm_s16le out.wav
        let child = Command::new(&self.binary_path)
            .arg("-hide_banner")
            .args(["-loglevel", "error"])
            .arg("-y")
            .arg("-i")
            .arg(input_path)
            .arg("-ar")
            .arg(TARGET_SAMPLE_RATE.to_string())
            .args(["-ac", "1"])
            .args(["-c:a", "pcm_s16le"])
            .arg(output_path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        // The child is killed when the timed-out future is dropped
        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| TranscodeError::Failed {
                status: format!("timed out after {:?}", self.timeout),
                stderr: String::new(),
            })?
            .map_err(|e| TranscodeError::ExecutionError(e.to_string()))?;

        if !output.status.success() {
            return Err(TranscodeError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
