//! Caller-facing assessment result

use serde::Serialize;

/// Per-word diagnostic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordFeedback {
    pub word: Option<String>,
    pub score: f64,
    pub error_type: String,
}

/// Successful assessment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAssessment {
    pub success: bool,
    pub pronunciation_score: f64,
    pub accuracy_score: f64,
    pub fluency_score: f64,
    pub completeness_score: f64,
    /// `None` when the service did not score prosody
    pub prosody_score: Option<f64>,
    pub feedback: String,
    pub words: Vec<WordFeedback>,
    pub recognized_text: String,
}

/// Assessment that did not complete
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedAssessment {
    pub success: bool,
    pub error: String,
    pub details: String,
    pub feedback: String,
}

/// Body returned by POST /assess once the pipeline ran
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormattedResult {
    Scored(ScoredAssessment),
    Failed(FailedAssessment),
}

impl FormattedResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FormattedResult::Scored(_))
    }
}
