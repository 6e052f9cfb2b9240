//! `sitemaps`: render every sitemap to static files.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use preisradio_client::SITEMAP_USER_AGENT;
use preisradio_core::{Product, ProductQuery, RetailerLookup, SiteConfig};
use preisradio_seo::sitemap::{
    brand_entries, category_entries, product_entries, render_index, render_urlset,
    static_entries,
};

use crate::Context;

/// Fetch all products and write `sitemap.xml` plus its four sub-sitemaps
/// into `out`.
///
/// # Errors
///
/// Returns an error if the sitemap client cannot be built or a file cannot
/// be written. A failing retailer only shrinks the product sitemaps.
pub(crate) async fn run_sitemaps(ctx: &Context, out: &Path) -> anyhow::Result<()> {
    let client = ctx.api.with_user_agent(SITEMAP_USER_AGENT)?;
    let query = ProductQuery {
        page_size: Some(ctx.config.sitemap_page_size),
        ..ProductQuery::default()
    };
    let products = client
        .products_per_retailer(&query, &ctx.retailers.retailer_ids())
        .await;
    tracing::info!(products = products.len(), "fetched sitemap products");

    for path in write_sitemaps(out, &ctx.site, &products, Utc::now())? {
        println!("wrote {}", path.display());
    }
    Ok(())
}

pub(crate) fn write_sitemaps(
    out: &Path,
    site: &SiteConfig,
    products: &[Product],
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("failed to create {}", out.display()))?;

    let files = [
        ("sitemap.xml", render_index(site, now)?),
        ("sitemap-static.xml", render_urlset(&static_entries(site, now))?),
        (
            "sitemap-products.xml",
            render_urlset(&product_entries(site, products, now))?,
        ),
        (
            "sitemap-brands.xml",
            render_urlset(&brand_entries(site, products, now))?,
        ),
        (
            "sitemap-categories.xml",
            render_urlset(&category_entries(site, products, now))?,
        ),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, body) in files {
        let path = out.join(name);
        std::fs::write(&path, body)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
