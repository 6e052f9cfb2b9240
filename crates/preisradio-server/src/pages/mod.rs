//! Server-rendered storefront pages.
//!
//! Upstream failures never fail a page: the affected section becomes a retry
//! panel and the page is answered without being cached.

mod home;
mod layout;
mod listing;
mod product;

use std::future::Future;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use preisradio_seo::PageMetadata;

use crate::api::AppState;
use crate::cache::CachedBody;
use layout::{render_document, Document};

const HTML: &str = "text/html; charset=utf-8";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/product/{id}", get(product::product_page))
        .route("/kategorien/{slug}", get(listing::category_page))
        .route("/marken/{slug}", get(listing::brand_page))
        .route("/search", get(listing::search_page))
        .route("/offline", get(offline))
}

/// Outcome of rendering one page.
#[derive(Debug)]
pub(crate) struct Rendered {
    status: StatusCode,
    document: Document,
    /// Only fully loaded pages are cached.
    cacheable: bool,
}

impl Rendered {
    fn ok(document: Document) -> Self {
        Self {
            status: StatusCode::OK,
            document,
            cacheable: true,
        }
    }

    fn degraded(document: Document) -> Self {
        Self {
            status: StatusCode::OK,
            document,
            cacheable: false,
        }
    }

    fn not_found(document: Document) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            document,
            cacheable: false,
        }
    }
}

fn html_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, HTML)], body).into_response()
}

/// Serve `key` from the render cache, or render it and cache the result.
/// Without a key the page is rendered on every request.
async fn serve_cached<F, Fut>(state: &AppState, key: Option<String>, render: F) -> Response
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Rendered>,
{
    let Some(key) = key else {
        let rendered = render().await;
        return html_response(rendered.status, render_document(&rendered.document));
    };

    if let Some(cached) = state.cache.get(&key).await {
        tracing::debug!(key = %key, "render cache hit");
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, cached.content_type)],
            cached.body,
        )
            .into_response();
    }

    let rendered = render().await;
    let html = render_document(&rendered.document);
    if rendered.cacheable {
        state
            .cache
            .insert(
                key,
                CachedBody {
                    content_type: HTML,
                    body: html.clone(),
                },
            )
            .await;
    }
    html_response(rendered.status, html)
}

async fn offline() -> Response {
    let document = Document {
        metadata: PageMetadata::fallback("Offline | Preisradio", "Keine Internetverbindung"),
        json_ld: Vec::new(),
        body: r#"<section class="offline">
  <h1>Keine Internetverbindung</h1>
  <p>Sie sind derzeit offline. Bitte überprüfen Sie Ihre Internetverbindung und versuchen Sie es erneut.</p>
  <a class="retry" href="">Erneut versuchen</a>
  <a href="/">Zur Startseite</a>
</section>"#
            .to_string(),
    };
    html_response(StatusCode::OK, render_document(&document))
}
