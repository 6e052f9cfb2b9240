use axum::{
    extract::{Path, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};

use super::{ApiError, AppState};
use crate::middleware::RequestId;

/// Upstream path for a proxied request. The upstream API routes only
/// slash-terminated paths.
fn upstream_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/api/".to_string()
    } else {
        format!("/api/{trimmed}/")
    }
}

/// `GET /api/{*path}` relayed to the upstream product API with status,
/// content type and body passed through.
pub(super) async fn proxy_get(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    let target = upstream_path(&path);
    match state.api.forward_get(&target, query.as_deref()).await {
        Ok(forwarded) => {
            let status = StatusCode::from_u16(forwarded.status).unwrap_or(StatusCode::BAD_GATEWAY);
            let content_type = forwarded
                .content_type
                .unwrap_or_else(|| "application/json".to_string());
            (status, [(header::CONTENT_TYPE, content_type)], forwarded.body).into_response()
        }
        Err(error) => {
            tracing::error!(error = %error, path = %target, "proxy request failed");
            ApiError::new(req_id.0, "upstream_error", "upstream API unreachable").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::test_support::{body_json, body_text, get, test_app, test_config};
    use super::*;

    #[test]
    fn upstream_path_gets_trailing_slash() {
        assert_eq!(upstream_path("products"), "/api/products/");
        assert_eq!(upstream_path("products/42/"), "/api/products/42/");
        assert_eq!(upstream_path(""), "/api/");
    }

    #[tokio::test]
    async fn forwards_query_and_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/"))
            .and(query_param("search", "tv"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "results": []})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/products/999/"))
            .respond_with(ResponseTemplate::new(404).set_body_bytes(b"{\"detail\":\"Not found.\"}".to_vec()))
            .mount(&server)
            .await;

        let app = test_app(test_config(&server.uri()));

        let response = app
            .clone()
            .oneshot(get("/api/products?search=tv"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["count"], 0);

        let response = app
            .oneshot(get("/api/products/999"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert!(body_text(response).await.contains("Not found."));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_bad_gateway() {
        let app = test_app(test_config("http://127.0.0.1:9"));
        let response = app
            .oneshot(get("/api/products"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"]["code"], "upstream_error");
    }
}
