//! XML sitemaps and the sitemap index.

use std::collections::HashSet;
use std::io::Cursor;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use preisradio_core::catalog::scraped_at_millis;
use preisradio_core::{slugify, Product, SiteConfig};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::SeoError;
use crate::text::encode_uri_component;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Sub-sitemaps listed in `/sitemap.xml`.
pub const SITEMAP_FILES: [&str; 4] = [
    "sitemap-static.xml",
    "sitemap-products.xml",
    "sitemap-brands.xml",
    "sitemap-categories.xml",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Fixed pages of the storefront.
#[must_use]
pub fn static_entries(site: &SiteConfig, now: DateTime<Utc>) -> Vec<SitemapEntry> {
    use ChangeFrequency::{Daily, Monthly, Weekly};

    [
        ("/", Daily, 1.0),
        ("/kategorien", Daily, 0.9),
        ("/marken", Weekly, 0.9),
        ("/haendler", Weekly, 0.7),
        ("/kontakt", Monthly, 0.5),
        ("/impressum", Monthly, 0.3),
        ("/datenschutz", Monthly, 0.3),
    ]
    .into_iter()
    .map(|(path, change_frequency, priority)| SitemapEntry {
        loc: site.url(path),
        last_modified: now,
        change_frequency,
        priority,
    })
    .collect()
}

/// One entry per product page, dated by `scraped_at` when present.
#[must_use]
pub fn product_entries(
    site: &SiteConfig,
    products: &[Product],
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    products
        .iter()
        .map(|product| SitemapEntry {
            loc: site.product_url(&product.id),
            last_modified: last_modified(product, now),
            change_frequency: ChangeFrequency::Weekly,
            priority: 0.6,
        })
        .collect()
}

/// One entry per distinct brand slug; the first product seen names and dates it.
#[must_use]
pub fn brand_entries(
    site: &SiteConfig,
    products: &[Product],
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    grouped_entries(
        products,
        |p| p.brand_name().map(str::to_string),
        now,
        |slug| format!("{}/marken/{}", site.base_url, encode_uri_component(slug)),
        ChangeFrequency::Weekly,
    )
}

/// One entry per distinct category slug.
#[must_use]
pub fn category_entries(
    site: &SiteConfig,
    products: &[Product],
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    grouped_entries(
        products,
        |p| Some(p.category.trim().to_string()).filter(|c| !c.is_empty()),
        now,
        |slug| format!("{}/kategorien/{}", site.base_url, encode_uri_component(slug)),
        ChangeFrequency::Daily,
    )
}

fn grouped_entries(
    products: &[Product],
    key: impl Fn(&Product) -> Option<String>,
    now: DateTime<Utc>,
    loc: impl Fn(&str) -> String,
    change_frequency: ChangeFrequency,
) -> Vec<SitemapEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for product in products {
        let Some(name) = key(product) else { continue };
        let slug = slugify(&name);
        if !seen.insert(slug.clone()) {
            continue;
        }
        entries.push(SitemapEntry {
            loc: loc(&slug),
            last_modified: last_modified(product, now),
            change_frequency,
            priority: 0.8,
        });
    }
    entries
}

fn last_modified(product: &Product, now: DateTime<Utc>) -> DateTime<Utc> {
    match scraped_at_millis(product.scraped_at.as_deref()) {
        0 => now,
        millis => Utc.timestamp_millis_opt(millis).single().unwrap_or(now),
    }
}

/// Render a `<urlset>` document.
///
/// # Errors
///
/// Returns [`SeoError`] if the XML writer fails.
pub fn render_urlset(entries: &[SitemapEntry]) -> Result<String, SeoError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS)]),
    ))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", &entry.loc)?;
        write_text_element(&mut writer, "lastmod", &w3c_datetime(entry.last_modified))?;
        write_text_element(&mut writer, "changefreq", entry.change_frequency.as_str())?;
        write_text_element(&mut writer, "priority", &format!("{:.1}", entry.priority))?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

/// Render `/sitemap.xml`, pointing at every file in [`SITEMAP_FILES`].
///
/// # Errors
///
/// Returns [`SeoError`] if the XML writer fails.
pub fn render_index(site: &SiteConfig, now: DateTime<Utc>) -> Result<String, SeoError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("sitemapindex").with_attributes([("xmlns", SITEMAP_NS)]),
    ))?;

    let lastmod = w3c_datetime(now);
    for file in SITEMAP_FILES {
        writer.write_event(Event::Start(BytesStart::new("sitemap")))?;
        write_text_element(&mut writer, "loc", &site.url(file))?;
        write_text_element(&mut writer, "lastmod", &lastmod)?;
        writer.write_event(Event::End(BytesEnd::new("sitemap")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("sitemapindex")))?;
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    text: &str,
) -> Result<(), SeoError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn w3c_datetime(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
#[path = "sitemap_test.rs"]
mod tests;
