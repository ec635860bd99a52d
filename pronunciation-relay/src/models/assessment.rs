//! Assessment request, outbound configuration and the raw service response

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_LANGUAGE: &str = "en-US";

/// POST /assess request body
///
/// Every field is optional at the parsing layer so that missing fields
/// can be reported by name instead of as a generic decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub reference_text: Option<String>,
    /// Alias accepted from older chatbot templates
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl AssessmentRequest {
    pub fn audio_url(&self) -> Option<&str> {
        non_blank(self.audio_url.as_deref())
    }

    /// `reference_text`, falling back to `text`
    pub fn reference_text(&self) -> Option<&str> {
        non_blank(self.reference_text.as_deref()).or_else(|| non_blank(self.text.as_deref()))
    }

    pub fn language(&self) -> &str {
        non_blank(self.language.as_deref()).unwrap_or(DEFAULT_LANGUAGE)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Pronunciation assessment parameters sent with every upload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssessmentConfig {
    pub reference_text: String,
    pub grading_system: &'static str,
    pub granularity: &'static str,
    pub dimension: &'static str,
    /// The service expects the string form
    pub enable_prosody_assessment: &'static str,
}

impl AssessmentConfig {
    pub fn new(reference_text: impl Into<String>) -> Self {
        Self {
            reference_text: reference_text.into(),
            grading_system: "HundredMark",
            granularity: "Word",
            dimension: "Comprehensive",
            enable_prosody_assessment: "true",
        }
    }
}

/// Raw response could not be decoded
#[derive(Debug, Error)]
pub enum RawResultError {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),

    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("response has an unexpected shape: {0}")]
    InvalidShape(String),
}

/// Detailed recognition response from the speech service
///
/// Every field is optional; the service omits fields freely depending on
/// API revision and recognition outcome.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawAssessmentResult {
    #[serde(default)]
    pub recognition_status: Option<String>,
    #[serde(default)]
    pub display_text: Option<String>,
    #[serde(default, rename = "NBest")]
    pub n_best: Option<Vec<NBestCandidate>>,
}

impl RawAssessmentResult {
    /// Decode a response body, tolerating absent fields
    pub fn from_slice(body: &[u8]) -> Result<Self, RawResultError> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| RawResultError::NotJson(e.to_string()))?;
        if !value.is_object() {
            return Err(RawResultError::NotAnObject);
        }
        serde_json::from_value(value).map_err(|e| RawResultError::InvalidShape(e.to_string()))
    }

    /// Top-ranked candidate, if any
    pub fn best(&self) -> Option<&NBestCandidate> {
        self.n_best.as_ref()?.first()
    }
}

/// Scores nested under `PronunciationAssessment` in newer API revisions
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NestedScores {
    #[serde(default)]
    pub pron_score: Option<f64>,
    #[serde(default)]
    pub accuracy_score: Option<f64>,
    #[serde(default)]
    pub fluency_score: Option<f64>,
    #[serde(default)]
    pub completeness_score: Option<f64>,
    #[serde(default)]
    pub prosody_score: Option<f64>,
    #[serde(default)]
    pub error_type: Option<String>,
}

/// One recognition candidate
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NBestCandidate {
    #[serde(default)]
    pub pron_score: Option<f64>,
    #[serde(default)]
    pub accuracy_score: Option<f64>,
    #[serde(default)]
    pub fluency_score: Option<f64>,
    #[serde(default)]
    pub completeness_score: Option<f64>,
    #[serde(default)]
    pub prosody_score: Option<f64>,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub words: Option<Vec<RawWord>>,
    #[serde(default)]
    pub pronunciation_assessment: Option<NestedScores>,
}

impl NBestCandidate {
    fn nested(&self, pick: impl Fn(&NestedScores) -> Option<f64>) -> Option<f64> {
        self.pronunciation_assessment.as_ref().and_then(pick)
    }

    pub fn pron_score(&self) -> Option<f64> {
        self.pron_score.or_else(|| self.nested(|n| n.pron_score))
    }

    pub fn accuracy_score(&self) -> Option<f64> {
        self.accuracy_score.or_else(|| self.nested(|n| n.accuracy_score))
    }

    pub fn fluency_score(&self) -> Option<f64> {
        self.fluency_score.or_else(|| self.nested(|n| n.fluency_score))
    }

    pub fn completeness_score(&self) -> Option<f64> {
        self.completeness_score
            .or_else(|| self.nested(|n| n.completeness_score))
    }

    pub fn prosody_score(&self) -> Option<f64> {
        self.prosody_score.or_else(|| self.nested(|n| n.prosody_score))
    }

    pub fn words(&self) -> &[RawWord] {
        self.words.as_deref().unwrap_or(&[])
    }
}

/// Word-level diagnostics
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawWord {
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub accuracy_score: Option<f64>,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub pronunciation_assessment: Option<NestedScores>,
}

impl RawWord {
    pub fn accuracy_score(&self) -> Option<f64> {
        self.accuracy_score.or_else(|| {
            self.pronunciation_assessment
                .as_ref()
                .and_then(|n| n.accuracy_score)
        })
    }

    pub fn error_type(&self) -> Option<&str> {
        self.error_type.as_deref().or_else(|| {
            self.pronunciation_assessment
                .as_ref()
                .and_then(|n| n.error_type.as_deref())
        })
    }
}
