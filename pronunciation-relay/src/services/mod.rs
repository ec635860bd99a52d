//! Assessment pipeline components
//!
//! Fetcher → (transcoder) → assessment client → normalizer

pub mod assessment_client;
pub mod audio_fetcher;
pub mod normalizer;
pub mod transcoder;

pub use assessment_client::{AzureAssessmentClient, PronunciationAssessor, RemoteError};
pub use audio_fetcher::{AudioFetcher, AudioSource, FetchError};
pub use normalizer::normalize;
pub use transcoder::{TranscodeError, Transcoder};
