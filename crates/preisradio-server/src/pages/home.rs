use axum::{extract::State, http::Uri, response::Response};
use preisradio_core::{slugify, ListQuery, ProductQuery, SortKey};
use preisradio_seo::metadata::home_metadata;
use preisradio_seo::schema::{organization_schema, site_faq_schema, website_schema};

use super::layout::{html_escape, product_grid, retry_panel, Document};
use super::{serve_cached, Rendered};
use crate::api::AppState;

const TOP_CATEGORIES: u32 = 12;
const TOP_BRANDS: u32 = 24;
const NEWEST_PRODUCTS: u32 = 20;

fn link_list(label: &str, section: &str, names: &[String]) -> String {
    if names.is_empty() {
        return String::new();
    }
    let items: String = names
        .iter()
        .map(|name| {
            format!(
                "<li><a href=\"/{section}/{}\">{}</a></li>",
                html_escape(&slugify(name)),
                html_escape(name)
            )
        })
        .collect();
    format!(
        "<nav aria-label=\"{label}\"><h2>{label}</h2><ul>{items}</ul></nav>\n",
        label = html_escape(label)
    )
}

pub(super) async fn home(State(state): State<AppState>, uri: Uri) -> Response {
    serve_cached(&state, Some(uri.path().to_string()), || render_home(&state)).await
}

async fn render_home(state: &AppState) -> Rendered {
    let newest_query = ProductQuery {
        page_size: Some(NEWEST_PRODUCTS),
        sort: Some(SortKey::Newest),
        ..ProductQuery::default()
    };
    let category_query = ListQuery {
        page_size: Some(TOP_CATEGORIES),
        ..ListQuery::default()
    };
    let brand_query = ListQuery {
        page_size: Some(TOP_BRANDS),
        ..ListQuery::default()
    };
    let retailer_ids = state.retailer_ids();
    let (categories, brands, newest) = tokio::join!(
        state.api.categories(&category_query),
        state.api.brands(&brand_query),
        state.api.products_interleaved(&newest_query, &retailer_ids),
    );

    let ctx = state.seo();
    let mut complete = true;
    let mut body = String::from("<h1>Preisvergleich für Elektronik in Deutschland</h1>\n");

    match categories {
        Ok(page) => {
            let names: Vec<String> = page.results.iter().map(|c| c.name().to_string()).collect();
            body.push_str(&link_list("Top Kategorien", "kategorien", &names));
        }
        Err(error) => {
            tracing::warn!(error = %error, "home: categories unavailable");
            complete = false;
        }
    }
    match brands {
        Ok(page) => body.push_str(&link_list("Top Marken", "marken", &page.results)),
        Err(error) => {
            tracing::warn!(error = %error, "home: brands unavailable");
            complete = false;
        }
    }
    body.push_str("<h2>Neueste Angebote</h2>\n");
    match newest {
        Ok(page) => body.push_str(&product_grid(&ctx, &page.results)),
        Err(error) => {
            tracing::warn!(error = %error, "home: products unavailable");
            complete = false;
            body.push_str(&retry_panel("Produkte konnten nicht geladen werden."));
        }
    }

    let document = Document {
        metadata: home_metadata(&state.site),
        json_ld: vec![
            organization_schema(&state.site),
            website_schema(&state.site),
            site_faq_schema(),
        ],
        body,
    };
    if complete {
        Rendered::ok(document)
    } else {
        Rendered::degraded(document)
    }
}
