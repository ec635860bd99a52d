//! Request-scoped data types

pub mod assessment;
pub mod audio;
pub mod result;

pub use assessment::{
    AssessmentConfig, AssessmentRequest, NBestCandidate, RawAssessmentResult, RawResultError,
    RawWord, DEFAULT_LANGUAGE,
};
pub use audio::{AudioEncoding, AudioPayload};
pub use result::{FailedAssessment, FormattedResult, ScoredAssessment, WordFeedback};
