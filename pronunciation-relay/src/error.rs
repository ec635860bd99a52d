//! Error types for pronunciation-relay
//!
//! Errors that stop a request before the assessment pipeline runs. Remote
//! assessment failures are not represented here; they are normalized into
//! a 200 response with `success: false`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::FetchError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Speech credential missing (500)
    #[error("Azure key not configured")]
    Configuration,

    /// Missing or invalid request data (400)
    #[error("{0}")]
    Validation(String),

    /// Audio could not be downloaded (400)
    #[error("Failed to download audio")]
    Download(#[from] FetchError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) | ApiError::Download(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn feedback(&self) -> &'static str {
        match self {
            ApiError::Configuration => {
                "Pronunciation assessment is not available right now. Please try again later."
            }
            ApiError::Validation(_) => {
                "Please send both a voice recording and the text you were reading."
            }
            ApiError::Download(_) => {
                "Sorry, I couldn't get your recording. Please record it again."
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
            "feedback": self.feedback(),
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
