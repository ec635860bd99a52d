//! Supported assessment locales

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// Locales offered to chat flows, in display order
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language {
        code: "en-US",
        name: "English (US)",
    },
    Language {
        code: "es-MX",
        name: "Spanish (Mexico)",
    },
    Language {
        code: "fr-FR",
        name: "French",
    },
];

/// GET /languages
pub async fn languages() -> Json<&'static [Language]> {
    Json(SUPPORTED_LANGUAGES)
}

pub fn language_routes() -> Router<AppState> {
    Router::new().route("/languages", get(languages))
}
