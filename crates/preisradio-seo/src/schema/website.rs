use preisradio_core::{Product, SiteConfig};
use serde_json::{json, Value};

use super::item_list::item_list_body;
use super::SCHEMA_CONTEXT;
use crate::context::SeoContext;
use crate::text::encode_uri_component;

/// Site-wide `WebSite` with a sitelinks search box.
#[must_use]
pub fn website_schema(site: &SiteConfig) -> Value {
    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "WebSite",
        "name": site.site_name,
        "url": site.base_url,
        "inLanguage": "de-DE",
        "potentialAction": {
            "@type": "SearchAction",
            "target": {
                "@type": "EntryPoint",
                "urlTemplate": format!("{}?q={{search_term_string}}", site.url("/search")),
            },
            "query-input": "required name=search_term_string",
        },
    })
}

/// `SearchResultsPage` wrapping the results as an `ItemList`.
#[must_use]
pub fn search_results_schema(ctx: &SeoContext<'_>, query: &str, products: &[Product]) -> Value {
    let query = query.trim();
    let (name, url) = if query.is_empty() {
        ("Produktsuche".to_string(), ctx.site.url("/search"))
    } else {
        (
            format!("Suchergebnisse für {query}"),
            format!("{}?q={}", ctx.site.url("/search"), encode_uri_component(query)),
        )
    };

    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "SearchResultsPage",
        "name": name,
        "url": url,
        "mainEntity": item_list_body(ctx, products),
    })
}
