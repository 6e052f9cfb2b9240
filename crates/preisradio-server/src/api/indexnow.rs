//! IndexNow push notifications for changed URLs.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use preisradio_client::{key_location, submit_to_indexnow};
use serde::Deserialize;
use serde_json::json;

use super::AppState;

const DOCUMENTATION_URL: &str = "https://www.indexnow.org/documentation";

#[derive(Debug, Default, Deserialize)]
struct SubmitBody {
    #[serde(default)]
    urls: Vec<String>,
}

pub(super) async fn submit(State(state): State<AppState>, body: Bytes) -> Response {
    let SubmitBody { urls } = serde_json::from_slice(&body).unwrap_or_default();
    if urls.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "URLs array is required" })),
        )
            .into_response();
    }

    match submit_to_indexnow(&state.http, &state.config, &state.site, &urls).await {
        Ok(outcome) if outcome.accepted => Json(json!({
            "success": true,
            "message": format!("Successfully submitted {} URLs to IndexNow", urls.len()),
            "statusCode": outcome.status,
        }))
        .into_response(),
        Ok(outcome) => {
            tracing::warn!(status = outcome.status, details = %outcome.details, "indexnow refused submission");
            let status =
                StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                Json(json!({
                    "success": false,
                    "error": "IndexNow API request failed",
                    "details": outcome.details,
                    "statusCode": outcome.status,
                })),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!(error = %error, "indexnow submission error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to submit to IndexNow",
                    "details": error.to_string(),
                })),
            )
                .into_response()
        }
    }
}

pub(super) async fn status(State(state): State<AppState>) -> Response {
    let key_location = state
        .config
        .indexnow_key
        .as_deref()
        .map(|key| key_location(&state.site, key));

    Json(json!({
        "service": "IndexNow API",
        "status": if key_location.is_some() { "active" } else { "disabled" },
        "keyLocation": key_location,
        "documentation": DOCUMENTATION_URL,
    }))
    .into_response()
}

/// Serves the key verification file. Only routed when a key is configured.
pub(super) async fn key_file(State(state): State<AppState>) -> Response {
    let key = state.config.indexnow_key.clone().unwrap_or_default();
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], key).into_response()
}
