//! Crawler and web-app files: sitemaps, `robots.txt`, service worker, manifest.

use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use preisradio_client::SITEMAP_USER_AGENT;
use preisradio_core::{Product, ProductQuery};
use preisradio_seo::sitemap::{
    brand_entries, category_entries, product_entries, render_index, render_urlset,
    static_entries,
};
use preisradio_seo::{robots_txt, SeoError};

use crate::api::AppState;
use crate::cache::CachedBody;

const XML: &str = "application/xml; charset=utf-8";
const SITEMAP_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const SERVICE_WORKER: &str = include_str!("../assets/sw.js");
const MANIFEST: &str = include_str!("../assets/manifest.webmanifest");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProductSitemap {
    Products,
    Brands,
    Categories,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sitemap.xml", get(sitemap_index))
        .route("/sitemap-static.xml", get(sitemap_static))
        .route(
            "/sitemap-products.xml",
            get(|state: State<AppState>| product_sitemap(state, ProductSitemap::Products)),
        )
        .route(
            "/sitemap-brands.xml",
            get(|state: State<AppState>| product_sitemap(state, ProductSitemap::Brands)),
        )
        .route(
            "/sitemap-categories.xml",
            get(|state: State<AppState>| product_sitemap(state, ProductSitemap::Categories)),
        )
        .route("/robots.txt", get(robots))
        .route("/sw.js", get(service_worker))
        .route("/manifest.webmanifest", get(manifest))
}

fn xml_response(rendered: Result<String, SeoError>) -> Response {
    match rendered {
        Ok(body) => ([(header::CONTENT_TYPE, XML)], body).into_response(),
        Err(error) => {
            tracing::error!(error = %error, "sitemap rendering failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn sitemap_index(State(state): State<AppState>) -> Response {
    xml_response(render_index(&state.site, Utc::now()))
}

async fn sitemap_static(State(state): State<AppState>) -> Response {
    xml_response(render_urlset(&static_entries(&state.site, Utc::now())))
}

/// Every product of every retailer, up to the sitemap page size each.
/// A failing retailer contributes nothing.
pub async fn fetch_sitemap_products(state: &AppState) -> Vec<Product> {
    let client = match state.api.with_user_agent(SITEMAP_USER_AGENT) {
        Ok(client) => client,
        Err(error) => {
            tracing::error!(error = %error, "sitemap client could not be built");
            return Vec::new();
        }
    };
    let query = ProductQuery {
        page_size: Some(state.config.sitemap_page_size),
        ..ProductQuery::default()
    };
    client
        .products_per_retailer(&query, &state.retailer_ids())
        .await
}

async fn product_sitemap(State(state): State<AppState>, kind: ProductSitemap) -> Response {
    let key = match kind {
        ProductSitemap::Products => "/sitemap-products.xml",
        ProductSitemap::Brands => "/sitemap-brands.xml",
        ProductSitemap::Categories => "/sitemap-categories.xml",
    };
    if let Some(cached) = state.cache.get(key).await {
        return ([(header::CONTENT_TYPE, cached.content_type)], cached.body).into_response();
    }

    let products = fetch_sitemap_products(&state).await;
    let now = Utc::now();
    let entries = match kind {
        ProductSitemap::Products => product_entries(&state.site, &products, now),
        ProductSitemap::Brands => brand_entries(&state.site, &products, now),
        ProductSitemap::Categories => category_entries(&state.site, &products, now),
    };
    tracing::info!(sitemap = key, products = products.len(), entries = entries.len(), "sitemap generated");

    let rendered = render_urlset(&entries);
    if let Ok(body) = &rendered {
        if !products.is_empty() {
            state
                .cache
                .insert_with_ttl(
                    key.to_string(),
                    CachedBody {
                        content_type: XML,
                        body: body.clone(),
                    },
                    SITEMAP_TTL,
                )
                .await;
        }
    }
    xml_response(rendered)
}

async fn robots(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&state.site),
    )
        .into_response()
}

async fn service_worker() -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        SERVICE_WORKER,
    )
        .into_response()
}

async fn manifest() -> Response {
    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        MANIFEST,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{header as header_eq, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::test_support::{body_text, get, test_app, test_config};

    #[tokio::test]
    async fn index_and_static_sitemaps() {
        let app = test_app(test_config("http://127.0.0.1:9"));

        let response = app.clone().oneshot(get("/sitemap.xml")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], XML);
        let xml = body_text(response).await;
        assert!(xml.contains("<loc>https://preisradio.de/sitemap-products.xml</loc>"));

        let response = app.oneshot(get("/sitemap-static.xml")).await.expect("response");
        let xml = body_text(response).await;
        assert_eq!(xml.matches("<url>").count(), 7);
    }

    #[tokio::test]
    async fn product_sitemaps_fan_out_with_sitemap_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/"))
            .and(query_param("retailer", "saturn"))
            .and(query_param("page_size", "10000"))
            .and(header_eq("user-agent", SITEMAP_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2,
                "results": [
                    {"id": 1, "title": "Galaxy S21", "brand": "Samsung", "category": "Smartphones", "price": 699},
                    {"id": 2, "title": "Galaxy Tab", "brand": "Samsung", "category": "Tablets", "price": 399},
                ],
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/products/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let app = test_app(test_config(&server.uri()));

        let products = body_text(
            app.clone()
                .oneshot(get("/sitemap-products.xml"))
                .await
                .expect("response"),
        )
        .await;
        assert!(products.contains("<loc>https://preisradio.de/product/1</loc>"));
        assert!(products.contains("<loc>https://preisradio.de/product/2</loc>"));

        let brands = body_text(
            app.clone()
                .oneshot(get("/sitemap-brands.xml"))
                .await
                .expect("response"),
        )
        .await;
        assert_eq!(brands.matches("<url>").count(), 1);
        assert!(brands.contains("/marken/samsung</loc>"));

        let categories = body_text(
            app.oneshot(get("/sitemap-categories.xml"))
                .await
                .expect("response"),
        )
        .await;
        assert_eq!(categories.matches("<url>").count(), 2);
    }

    #[tokio::test]
    async fn failing_upstream_yields_empty_sitemap() {
        let app = test_app(test_config("http://127.0.0.1:9"));
        let response = app
            .oneshot(get("/sitemap-products.xml"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let xml = body_text(response).await;
        assert!(xml.contains("<urlset"));
        assert!(!xml.contains("<url>"));
    }

    #[tokio::test]
    async fn robots_and_shell_files() {
        let app = test_app(test_config("http://127.0.0.1:9"));

        let robots = body_text(app.clone().oneshot(get("/robots.txt")).await.expect("response")).await;
        assert!(robots.contains("Sitemap: https://preisradio.de/sitemap.xml"));

        let sw = app.clone().oneshot(get("/sw.js")).await.expect("response");
        assert_eq!(
            sw.headers()[header::CONTENT_TYPE],
            "application/javascript; charset=utf-8"
        );
        assert!(body_text(sw).await.contains("/offline"));

        let manifest = body_text(
            app.oneshot(get("/manifest.webmanifest"))
                .await
                .expect("response"),
        )
        .await;
        let parsed: serde_json::Value = serde_json::from_str(&manifest).expect("manifest json");
        assert_eq!(parsed["name"], "Preisradio");
    }
}
