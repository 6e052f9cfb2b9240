//! Category, brand and search listings.
//!
//! Retailer, price range and sort travel to the upstream API; only the
//! discount threshold is applied to the fetched page, so `count` is the
//! size of the filtered page whenever that threshold is set.

use axum::{
    extract::{Path, Query, State},
    http::Uri,
    response::Response,
};
use preisradio_client::ClientError;
use preisradio_core::catalog::brand_facets;
use preisradio_core::slug::{display_name_from_slug, resolve_by_slug};
use preisradio_core::{slugify, CatalogFilter, ListQuery, Product, ProductQuery, SortKey};
use preisradio_seo::metadata::{brand_metadata, category_metadata, search_metadata};
use preisradio_seo::schema::{item_list_schema, search_results_schema, section_breadcrumb, Section};
use preisradio_seo::text::encode_uri_component;
use preisradio_seo::PageMetadata;
use serde::Deserialize;
use serde_json::Value;

use super::layout::{empty_panel, html_escape, pagination, product_grid, retry_panel, Document};
use super::{serve_cached, Rendered};
use crate::api::AppState;

const LISTING_PAGE_SIZE: u32 = 100;
const SEARCH_PAGE_SIZE: u32 = 20;
const CATEGORY_LOOKUP_SIZE: u32 = 1000;
const BRAND_LOOKUP_SIZE: u32 = 50;

/// Query string of a listing view. Every value arrives as text and is parsed
/// leniently: anything unparseable is ignored.
#[derive(Debug, Default, Clone, Deserialize)]
pub(super) struct ListingParams {
    q: Option<String>,
    category: Option<String>,
    brand: Option<String>,
    retailer: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
    min_discount: Option<String>,
    sort: Option<String>,
    page: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_number(value: Option<&String>) -> Option<f64> {
    non_blank(value)
        .and_then(|v| v.replace(',', ".").parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

impl ListingParams {
    fn filter(&self) -> CatalogFilter {
        CatalogFilter {
            retailer: non_blank(self.retailer.as_ref()),
            min_price: parse_number(self.min_price.as_ref()),
            max_price: parse_number(self.max_price.as_ref()),
            min_discount: parse_number(self.min_discount.as_ref()),
            sort: non_blank(self.sort.as_ref()).and_then(|s| s.parse::<SortKey>().ok()),
        }
    }

    fn page(&self) -> u32 {
        non_blank(self.page.as_ref())
            .and_then(|p| p.parse::<u32>().ok())
            .unwrap_or(1)
            .max(1)
    }

    fn search(&self) -> String {
        non_blank(self.q.as_ref()).unwrap_or_default()
    }

    /// Render cache key: `path` plus the known parameters in a fixed order.
    /// Free-text searches are not cached.
    fn cache_key(&self, path: &str) -> Option<String> {
        if !self.search().is_empty() {
            return None;
        }
        let base = self.link_base(path);
        match self.page() {
            1 => Some(base),
            page if base.contains('?') => Some(format!("{base}&page={page}")),
            page => Some(format!("{base}?page={page}")),
        }
    }

    /// `path` with every set parameter except `page`, for pagination links.
    fn link_base(&self, path: &str) -> String {
        let pairs = [
            ("q", self.q.as_ref()),
            ("category", self.category.as_ref()),
            ("brand", self.brand.as_ref()),
            ("retailer", self.retailer.as_ref()),
            ("min_price", self.min_price.as_ref()),
            ("max_price", self.max_price.as_ref()),
            ("min_discount", self.min_discount.as_ref()),
            ("sort", self.sort.as_ref()),
        ];
        let query: Vec<String> = pairs
            .into_iter()
            .filter_map(|(key, value)| {
                non_blank(value).map(|v| format!("{key}={}", encode_uri_component(&v)))
            })
            .collect();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", query.join("&"))
        }
    }
}

/// One page of a listing after pushdown and the residual filter.
#[derive(Debug)]
struct Listing {
    products: Vec<Product>,
    count: u64,
    has_next: bool,
    has_previous: bool,
}

async fn load_listing(
    state: &AppState,
    base: ProductQuery,
    filter: &CatalogFilter,
) -> Result<Listing, ClientError> {
    let query = filter.push_down(base);
    let page = state
        .api
        .products_interleaved(&query, &state.retailer_ids())
        .await?;

    let has_next = page.next.is_some();
    let has_previous = page.previous.is_some() || query.current_page() > 1;
    if filter.has_residual() {
        let products = filter.apply_residual(page.results);
        Ok(Listing {
            count: products.len() as u64,
            products,
            has_next,
            has_previous,
        })
    } else {
        Ok(Listing {
            products: page.results,
            count: page.count,
            has_next,
            has_previous,
        })
    }
}

fn filter_form(action: &str, params: &ListingParams, retailer_ids: &[String]) -> String {
    let value = |v: &Option<String>| html_escape(v.as_deref().unwrap_or_default());
    let selected_retailer = params.retailer.as_deref().unwrap_or_default().to_lowercase();
    let selected_sort = params.sort.as_deref().unwrap_or_default();

    let mut retailer_options = String::from("<option value=\"\">Alle Händler</option>");
    for id in retailer_ids {
        let selected = if *id == selected_retailer { " selected" } else { "" };
        retailer_options.push_str(&format!(
            "<option value=\"{id}\"{selected}>{id}</option>",
            id = html_escape(id)
        ));
    }
    let mut sort_options = String::from("<option value=\"\">Relevanz</option>");
    for (key, label) in [
        (SortKey::PriceAsc, "Preis aufsteigend"),
        (SortKey::PriceDesc, "Preis absteigend"),
        (SortKey::Newest, "Neueste"),
    ] {
        let selected = if key.as_str() == selected_sort { " selected" } else { "" };
        sort_options.push_str(&format!(
            "<option value=\"{}\"{selected}>{label}</option>",
            key.as_str()
        ));
    }

    let hidden_query = non_blank(params.q.as_ref())
        .map(|q| format!("<input type=\"hidden\" name=\"q\" value=\"{}\">", html_escape(&q)))
        .unwrap_or_default();

    format!(
        r#"<form class="filters" action="{action}" method="get">
  {hidden_query}
  <select name="retailer">{retailer_options}</select>
  <input type="number" name="min_price" placeholder="Min €" value="{min}">
  <input type="number" name="max_price" placeholder="Max €" value="{max}">
  <input type="number" name="min_discount" placeholder="Rabatt ab %" value="{discount}">
  <select name="sort">{sort_options}</select>
  <button type="submit">Filtern</button>
</form>
"#,
        action = html_escape(action),
        min = value(&params.min_price),
        max = value(&params.max_price),
        discount = value(&params.min_discount),
    )
}

fn brand_facet_list(products: &[Product]) -> String {
    let brands = brand_facets(products);
    if brands.is_empty() {
        return String::new();
    }
    let items: String = brands
        .iter()
        .map(|b| {
            format!(
                "<li><a href=\"/marken/{}\">{}</a></li>",
                html_escape(&slugify(b)),
                html_escape(b)
            )
        })
        .collect();
    format!("<aside class=\"facets\"><h2>Marken</h2><ul>{items}</ul></aside>\n")
}

struct ListingView<'a> {
    heading: String,
    path: &'a str,
    metadata: PageMetadata,
    breadcrumb: Option<Value>,
    item_list: fn(&AppState, &str, &[Product]) -> Value,
    list_name: String,
}

async fn render_listing(
    state: &AppState,
    params: &ListingParams,
    base: ProductQuery,
    view: ListingView<'_>,
) -> Rendered {
    let filter = params.filter();
    let page = params.page();
    let outcome = load_listing(state, base, &filter).await;

    let ctx = state.seo();
    let mut body = format!("<h1>{}</h1>\n", html_escape(&view.heading));
    body.push_str(&filter_form(view.path, params, &state.retailer_ids()));

    let mut json_ld: Vec<Value> = view.breadcrumb.into_iter().collect();
    let complete = match outcome {
        Ok(listing) => {
            body.push_str(&format!(
                "<p class=\"result-count\">{} Produkte</p>\n",
                listing.count
            ));
            if listing.products.is_empty() {
                body.push_str(&empty_panel("Keine Produkte gefunden."));
            } else {
                body.push_str(&brand_facet_list(&listing.products));
                body.push_str(&product_grid(&ctx, &listing.products));
                json_ld.push((view.item_list)(state, &view.list_name, &listing.products));
            }
            body.push_str(&pagination(
                &params.link_base(view.path),
                page,
                listing.has_previous,
                listing.has_next,
            ));
            true
        }
        Err(error) => {
            tracing::warn!(path = view.path, error = %error, "listing unavailable");
            body.push_str(&retry_panel("Produkte konnten nicht geladen werden."));
            false
        }
    };

    let document = Document {
        metadata: view.metadata,
        json_ld,
        body,
    };
    if complete {
        Rendered::ok(document)
    } else {
        Rendered::degraded(document)
    }
}

fn named_item_list(state: &AppState, name: &str, products: &[Product]) -> Value {
    item_list_schema(&state.seo(), name, products)
}

fn search_item_list(state: &AppState, query: &str, products: &[Product]) -> Value {
    search_results_schema(&state.seo(), query, products)
}

pub(super) async fn category_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ListingParams>,
    uri: Uri,
) -> Response {
    let key = params.cache_key(uri.path());
    serve_cached(&state, key, || render_category(&state, &slug, &params)).await
}

async fn render_category(state: &AppState, slug: &str, params: &ListingParams) -> Rendered {
    let lookup = ListQuery {
        page_size: Some(CATEGORY_LOOKUP_SIZE),
        ..ListQuery::default()
    };
    let resolved = match state.api.categories(&lookup).await {
        Ok(page) => {
            let names: Vec<&str> = page.results.iter().map(|c| c.name()).collect();
            resolve_by_slug(slug, names).map(str::to_string)
        }
        Err(error) => {
            tracing::warn!(slug, error = %error, "category lookup failed; using slug");
            None
        }
    };
    let name = resolved
        .clone()
        .unwrap_or_else(|| display_name_from_slug(slug));
    let path = format!("/kategorien/{slug}");

    let base = ProductQuery {
        category: Some(name.clone()),
        page: Some(params.page()),
        page_size: Some(LISTING_PAGE_SIZE),
        ..ProductQuery::default()
    };
    let view = ListingView {
        heading: name.clone(),
        path: &path,
        metadata: category_metadata(&state.site, slug, resolved.as_deref()),
        breadcrumb: Some(section_breadcrumb(
            &state.site,
            Section::Categories,
            &name,
            slug,
        )),
        item_list: named_item_list,
        list_name: name.clone(),
    };
    render_listing(state, params, base, view).await
}

pub(super) async fn brand_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ListingParams>,
    uri: Uri,
) -> Response {
    let key = params.cache_key(uri.path());
    serve_cached(&state, key, || render_brand(&state, &slug, &params)).await
}

async fn render_brand(state: &AppState, slug: &str, params: &ListingParams) -> Rendered {
    let lookup = ListQuery {
        search: Some(slug.replace('-', " ").trim().to_string()),
        page_size: Some(BRAND_LOOKUP_SIZE),
        ..ListQuery::default()
    };
    let resolved = match state.api.brands(&lookup).await {
        Ok(page) => {
            resolve_by_slug(slug, page.results.iter().map(String::as_str)).map(str::to_string)
        }
        Err(error) => {
            tracing::warn!(slug, error = %error, "brand lookup failed; using slug");
            None
        }
    };
    let name = resolved
        .clone()
        .unwrap_or_else(|| display_name_from_slug(slug));
    let path = format!("/marken/{slug}");

    let base = ProductQuery {
        brand: Some(name.clone()),
        page: Some(params.page()),
        page_size: Some(LISTING_PAGE_SIZE),
        ..ProductQuery::default()
    };
    let view = ListingView {
        heading: format!("{name} Produkte"),
        path: &path,
        metadata: brand_metadata(&state.site, slug, resolved.as_deref()),
        breadcrumb: Some(section_breadcrumb(&state.site, Section::Brands, &name, slug)),
        item_list: named_item_list,
        list_name: format!("{name} Produkte"),
    };
    render_listing(state, params, base, view).await
}

pub(super) async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Response {
    let key = params.cache_key("/search");
    serve_cached(&state, key, || render_search(&state, &params)).await
}

async fn render_search(state: &AppState, params: &ListingParams) -> Rendered {
    let search = params.search();
    let base = ProductQuery {
        search: Some(search.clone()).filter(|s| !s.is_empty()),
        category: non_blank(params.category.as_ref()),
        brand: non_blank(params.brand.as_ref()),
        page: Some(params.page()),
        page_size: Some(SEARCH_PAGE_SIZE),
        ..ProductQuery::default()
    };
    let heading = if search.is_empty() {
        "Produktsuche".to_string()
    } else {
        format!("Suchergebnisse für \"{search}\"")
    };
    let view = ListingView {
        heading,
        path: "/search",
        metadata: search_metadata(&state.site, &search),
        breadcrumb: None,
        item_list: search_item_list,
        list_name: search,
    };
    render_listing(state, params, base, view).await
}

#[cfg(test)]
#[path = "listing_test.rs"]
mod tests;
