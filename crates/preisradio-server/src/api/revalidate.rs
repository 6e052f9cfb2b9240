use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use subtle::ConstantTimeEq;

use super::AppState;

#[derive(Debug, Default, Deserialize)]
struct RevalidateBody {
    #[serde(default)]
    path: Option<String>,
}

fn token_matches(expected: Option<&str>, provided: Option<&str>) -> bool {
    match (expected, provided) {
        (Some(expected), Some(provided)) => {
            bool::from(expected.as_bytes().ct_eq(provided.as_bytes()))
        }
        _ => false,
    }
}

/// `POST /api/revalidate?token=...` with an optional `{"path": "/..."}` body.
/// Evicts the path from the render cache. Without a configured token every
/// request is rejected.
pub(super) async fn revalidate(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let provided = params.get("token").map(String::as_str);
    if !token_matches(state.config.revalidate_token.as_deref(), provided) {
        tracing::warn!("revalidate: invalid token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid token" })),
        )
            .into_response();
    }

    let parsed: RevalidateBody = if body.is_empty() {
        RevalidateBody::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(error) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Error revalidating", "error": error.to_string() })),
                )
                    .into_response();
            }
        }
    };

    let path = parsed
        .path
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| "/".to_string());
    let evicted = state.cache.evict_path(&path).await;
    tracing::info!(path = %path, evicted, "revalidated");

    Json(json!({
        "revalidated": true,
        "path": path,
        "now": chrono::Utc::now().timestamp_millis(),
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tower::ServiceExt;

    use super::super::test_support::{body_json, post_json, test_config, test_state};
    use super::*;
    use crate::api::{build_app, default_rate_limit_state};
    use crate::cache::CachedBody;

    #[test]
    fn token_comparison() {
        assert!(token_matches(Some("s3cret"), Some("s3cret")));
        assert!(!token_matches(Some("s3cret"), Some("s3cre")));
        assert!(!token_matches(Some("s3cret"), None));
        assert!(!token_matches(None, Some("anything")));
    }

    #[tokio::test]
    async fn wrong_token_is_unauthorized() {
        let mut config = test_config("http://127.0.0.1:9");
        config.revalidate_token = Some("s3cret".to_string());
        let app = build_app(test_state(config), default_rate_limit_state());

        let response = app
            .oneshot(post_json("/api/revalidate?token=nope", &json!({"path": "/"})))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Invalid token");
    }

    #[tokio::test]
    async fn valid_token_evicts_cached_path() {
        let mut config = test_config("http://127.0.0.1:9");
        config.revalidate_token = Some("s3cret".to_string());
        let state = test_state(config);
        state
            .cache
            .insert(
                "/product/42".to_string(),
                CachedBody {
                    content_type: "text/html; charset=utf-8",
                    body: "cached".to_string(),
                },
            )
            .await;
        let cache = state.cache.clone();
        let app = build_app(state, default_rate_limit_state());

        let response = app
            .oneshot(post_json(
                "/api/revalidate?token=s3cret",
                &json!({"path": "/product/42"}),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["revalidated"], true);
        assert_eq!(json["path"], "/product/42");
        assert!(json["now"].is_i64());
        assert!(cache.get("/product/42").await.is_none());
    }
}
