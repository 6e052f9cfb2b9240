mod forms;
mod indexnow;
mod proxy;
mod revalidate;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use preisradio_client::ApiClient;
use preisradio_core::{AppConfig, RetailerLookup, SiteConfig};
use preisradio_seo::SeoContext;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::cache::RenderCache;
use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};
use crate::{feeds, pages};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub site: Arc<SiteConfig>,
    pub retailers: Arc<dyn RetailerLookup>,
    pub api: ApiClient,
    /// Outbound client for IndexNow and the mail relay.
    pub http: reqwest::Client,
    pub cache: RenderCache,
}

impl AppState {
    pub fn seo(&self) -> SeoContext<'_> {
        SeoContext::new(&self.site, self.retailers.as_ref())
    }

    pub fn retailer_ids(&self) -> Vec<String> {
        self.retailers.retailer_ids()
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    version: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn api_router(state: &AppState, rate_limit: RateLimitState) -> Router<AppState> {
    let limited = axum::middleware::from_fn_with_state(rate_limit, enforce_rate_limit);

    let mut router = Router::new()
        .route("/api/health", get(health))
        .route("/api/contact", post(forms::contact).layer(limited.clone()))
        .route(
            "/api/shop-request",
            post(forms::shop_request).layer(limited.clone()),
        )
        .route(
            "/api/indexnow",
            post(indexnow::submit)
                .layer(limited.clone())
                .get(indexnow::status),
        )
        .route(
            "/api/revalidate",
            post(revalidate::revalidate).layer(limited),
        )
        .route("/api/{*path}", get(proxy::proxy_get));

    if let Some(key) = state.config.indexnow_key.as_deref() {
        router = router.route(&format!("/{key}.txt"), get(indexnow::key_file));
    }
    router
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    Router::new()
        .merge(pages::router())
        .merge(feeds::router())
        .merge(api_router(&state, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(CompressionLayer::new())
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(30, Duration::from_secs(60))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::Request,
        response::Response,
    };
    use preisradio_client::ApiClient;
    use preisradio_core::{load_app_config_from_env, AppConfig, RetailerDirectory, SiteConfig};
    use std::sync::Arc;

    use super::*;

    /// Config pointing every upstream at `upstream` (usually a wiremock server).
    pub fn test_config(upstream: &str) -> AppConfig {
        let mut config = load_app_config_from_env().expect("default config");
        config.site_url = "https://preisradio.de".to_string();
        config.api_url = upstream.to_string();
        config.indexnow_endpoint = format!("{upstream}/indexnow");
        config.resend_endpoint = format!("{upstream}/emails");
        config.indexnow_key = None;
        config.revalidate_token = None;
        config.resend_api_key = None;
        config
    }

    pub fn test_state(config: AppConfig) -> AppState {
        AppState {
            api: ApiClient::from_config(&config).expect("client"),
            site: Arc::new(SiteConfig::from_app_config(&config)),
            retailers: Arc::new(RetailerDirectory::builtin()),
            http: reqwest::Client::new(),
            cache: RenderCache::new(Duration::from_secs(60), 100),
            config: Arc::new(config),
        }
    }

    pub fn test_app(config: AppConfig) -> Router {
        build_app(test_state(config), default_rate_limit_state())
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    pub async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    pub async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_text(response).await).expect("json parse")
    }
}
