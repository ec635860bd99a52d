//! Reshapes raw assessment output into the caller-facing result
//!
//! Pure functions only: no I/O, no logging.

use crate::models::{
    FailedAssessment, FormattedResult, RawAssessmentResult, RawWord, ScoredAssessment,
    WordFeedback,
};
use crate::services::assessment_client::RemoteError;

/// Feedback used whenever the assessment could not be completed
pub const RETRY_FEEDBACK: &str = "Sorry, I couldn't assess your pronunciation. Please try again.";

/// Words scoring below this are flagged for practice
pub const PROBLEM_WORD_THRESHOLD: f64 = 70.0;

const NO_ERROR: &str = "None";

/// Feedback tier selected from the pronunciation score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTier {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl FeedbackTier {
    pub fn for_score(score: f64) -> Self {
        if score >= 90.0 {
            FeedbackTier::Excellent
        } else if score >= 75.0 {
            FeedbackTier::Good
        } else if score >= 60.0 {
            FeedbackTier::Fair
        } else {
            FeedbackTier::NeedsImprovement
        }
    }

    pub fn message(self, score: f64) -> String {
        match self {
            FeedbackTier::Excellent => {
                format!("🌟 Excellent! Your pronunciation scored {score:.1}/100.")
            }
            FeedbackTier::Good => format!("👍 Good job! Your pronunciation scored {score:.1}/100."),
            FeedbackTier::Fair => format!("📚 Not bad! Your pronunciation scored {score:.1}/100."),
            FeedbackTier::NeedsImprovement => {
                format!("💪 Keep trying! Your pronunciation scored {score:.1}/100.")
            }
        }
    }
}

/// Round to one decimal place, halves away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Map the assessment outcome to the caller-facing result
pub fn normalize(outcome: Result<RawAssessmentResult, RemoteError>) -> FormattedResult {
    match outcome {
        Ok(raw) => FormattedResult::Scored(score(&raw)),
        Err(e) => FormattedResult::Failed(failure(&e)),
    }
}

fn failure(error: &RemoteError) -> FailedAssessment {
    FailedAssessment {
        success: false,
        error: error.to_string(),
        details: error.details().to_string(),
        feedback: RETRY_FEEDBACK.to_string(),
    }
}

fn score(raw: &RawAssessmentResult) -> ScoredAssessment {
    let best = raw.best().cloned().unwrap_or_default();

    let pronunciation_score = round1(best.pron_score().unwrap_or(0.0));
    let mut feedback = FeedbackTier::for_score(pronunciation_score).message(pronunciation_score);

    let words: Vec<WordFeedback> = best.words().iter().map(word_feedback).collect();

    let problem_words: Vec<&str> = words
        .iter()
        .filter(|w| is_problem_word(w))
        .filter_map(|w| w.word.as_deref())
        .filter(|w| !w.is_empty())
        .collect();

    if !problem_words.is_empty() {
        feedback.push_str(" Words to practice: ");
        feedback.push_str(&problem_words.join(", "));
    }

    ScoredAssessment {
        success: true,
        pronunciation_score,
        accuracy_score: round1(best.accuracy_score().unwrap_or(0.0)),
        fluency_score: round1(best.fluency_score().unwrap_or(0.0)),
        completeness_score: round1(best.completeness_score().unwrap_or(0.0)),
        prosody_score: best.prosody_score().map(round1),
        feedback,
        words,
        recognized_text: best.display.clone().unwrap_or_default(),
    }
}

fn word_feedback(word: &RawWord) -> WordFeedback {
    WordFeedback {
        word: word.word.clone(),
        score: round1(word.accuracy_score().unwrap_or(0.0)),
        error_type: word.error_type().unwrap_or(NO_ERROR).to_string(),
    }
}

/// Low accuracy or any classified error
pub fn is_problem_word(word: &WordFeedback) -> bool {
    word.score < PROBLEM_WORD_THRESHOLD || word.error_type != NO_ERROR
}
