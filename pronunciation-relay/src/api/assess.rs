//! POST /assess
//!
//! Validates the request, then runs download → assessment → normalization.
//! The first failing stage ends the request.

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{AssessmentRequest, FormattedResult},
    services::normalize,
    AppState,
};

/// Validated request fields
#[derive(Debug)]
struct AssessmentInput<'a> {
    audio_url: &'a str,
    reference_text: &'a str,
    language: &'a str,
}

/// Parse the body into an [`AssessmentRequest`]
///
/// Anything other than a JSON object counts as "no JSON data".
fn parse_request(body: &[u8]) -> ApiResult<AssessmentRequest> {
    let no_json = || ApiError::Validation("No JSON data".to_string());

    let value: serde_json::Value = serde_json::from_slice(body).map_err(|_| no_json())?;
    if !value.is_object() {
        return Err(no_json());
    }

    serde_json::from_value(value)
        .map_err(|e| ApiError::Validation(format!("Invalid request body: {}", e)))
}

fn validate(request: &AssessmentRequest) -> ApiResult<AssessmentInput<'_>> {
    let audio_url = request
        .audio_url()
        .ok_or_else(|| ApiError::Validation("audio_url required".to_string()))?;
    let reference_text = request
        .reference_text()
        .ok_or_else(|| ApiError::Validation("reference_text required".to_string()))?;

    match reqwest::Url::parse(audio_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => {
            return Err(ApiError::Validation(
                "audio_url must be an http(s) URL".to_string(),
            ))
        }
    }

    Ok(AssessmentInput {
        audio_url,
        reference_text,
        language: request.language(),
    })
}

async fn run_assessment(state: &AppState, body: &[u8]) -> ApiResult<FormattedResult> {
    if !state.config.is_speech_configured() {
        tracing::error!("Rejecting assessment: Azure key not configured");
        return Err(ApiError::Configuration);
    }

    let request = parse_request(body)?;
    let input = validate(&request)?;

    let audio = state.audio_source.fetch(input.audio_url).await.map_err(|e| {
        tracing::warn!(error = %e, "Audio download failed");
        ApiError::Download(e)
    })?;

    let outcome = state
        .assessor
        .assess(audio, input.reference_text, input.language)
        .await;
    if let Err(e) = &outcome {
        tracing::warn!(error = %e, "Pronunciation assessment failed");
    }

    let result = normalize(outcome);
    match &result {
        FormattedResult::Scored(scored) => tracing::info!(
            language = %input.language,
            score = scored.pronunciation_score,
            words = scored.words.len(),
            "Assessment completed"
        ),
        FormattedResult::Failed(failed) => {
            tracing::info!(error = %failed.error, "Assessment returned failure payload")
        }
    }

    Ok(result)
}

/// POST /assess
///
/// 200 with the formatted result once the pipeline ran (including remote
/// failures), 400 for request or download problems, 500 without a key.
pub async fn assess(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<FormattedResult>> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("assess", %request_id);

    run_assessment(&state, &body).instrument(span).await.map(Json)
}

/// Build assessment routes
pub fn assess_routes() -> Router<AppState> {
    Router::new().route("/assess", post(assess))
}
