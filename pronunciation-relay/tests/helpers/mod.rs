//! Test helper utilities
//!
//! Shared utilities for testing pronunciation-relay

#![allow(dead_code)]

pub mod audio_generator;
pub mod fakes;

pub use audio_generator::{generate_test_wav, generate_wav_bytes, AudioConfig};
pub use fakes::{FakeAssessor, FakeAudioSource, FakeResponse};

use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;

/// Build a JSON POST request
pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a GET request
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Collect and parse a JSON response body
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Typical detailed response with one candidate
pub fn azure_response(pron_score: f64) -> Value {
    serde_json::json!({
        "RecognitionStatus": "Success",
        "Offset": 300000,
        "Duration": 12500000,
        "DisplayText": "Hello world.",
        "NBest": [{
            "Confidence": 0.97,
            "Lexical": "hello world",
            "Display": "Hello world.",
            "PronScore": pron_score,
            "AccuracyScore": 94.04,
            "FluencyScore": 91.0,
            "CompletenessScore": 100.0,
            "Words": [
                { "Word": "hello", "AccuracyScore": 96.0, "ErrorType": "None" },
                { "Word": "world", "AccuracyScore": 92.0, "ErrorType": "None" }
            ]
        }]
    })
}
