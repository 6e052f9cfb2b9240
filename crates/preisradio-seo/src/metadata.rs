//! Page metadata: title, description, canonical URL, OpenGraph and Twitter cards.
//!
//! Every builder degrades to a generic `"<Entity> | Preisradio"` pair when
//! its input could not be loaded, so metadata never blocks a render.

use std::collections::BTreeMap;

use preisradio_core::pricing::format_price;
use preisradio_core::slug::display_name_from_slug;
use preisradio_core::{PriceInsight, Product, SiteConfig};
use serde::Serialize;

use crate::context::SeoContext;
use crate::text::{clamp_description, encode_uri_component, js_number, truncate_with_ellipsis};

pub const TITLE_MAX_CHARS: usize = 55;
const TITLE_NAME_CHARS: usize = 42;
const TITLE_NAME_SHORT_CHARS: usize = 38;

const OG_IMAGE_WIDTH: u32 = 1200;
const OG_IMAGE_HEIGHT: u32 = 630;

const RETAILER_SUFFIX: &str = "Preisvergleich bei Saturn, MediaMarkt, Otto und Kaufland.";
const SITE_KEYWORD: &str = "heise preisvergleich preisradio";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OgImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub url: String,
    pub site_name: String,
    pub locale: String,
    /// `og:type`, e.g. `website` or `product`.
    pub kind: String,
    pub images: Vec<OgImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub canonical: Option<String>,
    /// hreflang → URL.
    pub alternates: BTreeMap<String, String>,
    pub open_graph: Option<OpenGraph>,
    pub twitter: Option<TwitterCard>,
}

impl PageMetadata {
    /// Bare title and description, nothing else.
    #[must_use]
    pub fn fallback(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            keywords: Vec::new(),
            canonical: None,
            alternates: BTreeMap::new(),
            open_graph: None,
            twitter: None,
        }
    }

    fn with_canonical(mut self, url: &str) -> Self {
        self.canonical = Some(url.to_string());
        self.alternates.insert("de-DE".to_string(), url.to_string());
        self.alternates.insert("x-default".to_string(), url.to_string());
        self
    }
}

/// `"{name} – {price}€"` within [`TITLE_MAX_CHARS`].
///
/// The name is first cut to 42 characters. If the composed title is still
/// too long, the name is cut to 38 characters, or shorter when the price
/// needs the room. The ellipsis marks a cut name only.
#[must_use]
pub fn product_title(product: &Product) -> String {
    let name = product.display_name();
    let suffix = format!(" – {}€", js_number(product.price));
    let composed = format!("{}{suffix}", truncate_with_ellipsis(&name, TITLE_NAME_CHARS));
    if composed.chars().count() <= TITLE_MAX_CHARS {
        return composed;
    }
    let room = TITLE_MAX_CHARS.saturating_sub(suffix.chars().count());
    if room == 0 {
        return truncate_with_ellipsis(&name, TITLE_MAX_CHARS);
    }
    format!(
        "{}{suffix}",
        truncate_with_ellipsis(&name, TITLE_NAME_SHORT_CHARS.min(room))
    )
}

/// Name, price and retailer, savings when discounted, and the retailer list,
/// capped at 160 characters.
#[must_use]
pub fn product_description(ctx: &SeoContext<'_>, product: &Product) -> String {
    let retailer = ctx.retailer(product.retailer.as_deref());
    let insight = PriceInsight::for_product(product);

    let mut clauses = vec![
        format!("{} im Preisvergleich.", product.display_name()),
        format!(
            "Jetzt für {} € bei {}.",
            format_price(product.price),
            retailer.name
        ),
    ];
    if insight.has_discount {
        clauses.push(format!(
            "Sie sparen {} € ({} %).",
            format_price(insight.discount_amount),
            insight.discount_percent
        ));
    }
    clauses.push(RETAILER_SUFFIX.to_string());

    clamp_description(&clauses.join(" "))
}

/// Metadata for a product page. `loaded` is the outcome of fetching the product.
#[must_use]
pub fn product_metadata<E>(ctx: &SeoContext<'_>, loaded: Result<&Product, E>) -> PageMetadata {
    let Ok(product) = loaded else {
        return PageMetadata::fallback(
            "Produkt | Preisradio",
            "Finden Sie die besten Preise auf Preisradio",
        );
    };

    let site = ctx.site;
    let title = product_title(product);
    let description = product_description(ctx, product);
    let url = site.product_url(&product.id);
    let image = product
        .image
        .as_deref()
        .filter(|i| !i.trim().is_empty())
        .map_or_else(|| site.url("/default-product.jpg"), str::to_string);
    let retailer = ctx.retailer(product.retailer.as_deref());

    let keywords = [
        product.brand_name().map(str::to_string),
        Some(product.category.trim().to_string()),
        Some(product.title.clone()),
        Some("Preisvergleich".to_string()),
        retailer.is_known().then_some(retailer.name),
    ]
    .into_iter()
    .flatten()
    .filter(|k| !k.is_empty())
    .collect();

    PageMetadata {
        keywords,
        open_graph: Some(OpenGraph {
            title: title.clone(),
            description: description.clone(),
            url: url.clone(),
            site_name: site.site_name.clone(),
            locale: site.locale.clone(),
            kind: "product".to_string(),
            images: vec![OgImage {
                url: image.clone(),
                width: OG_IMAGE_WIDTH,
                height: OG_IMAGE_HEIGHT,
                alt: product.display_name(),
            }],
        }),
        twitter: Some(TwitterCard {
            card: "summary_large_image".to_string(),
            title: title.clone(),
            description: description.clone(),
            images: vec![image],
        }),
        ..PageMetadata::fallback(&title, &description)
    }
    .with_canonical(&url)
}

/// Metadata for `/kategorien/{slug}`. Without a resolved name the slug is title-cased.
#[must_use]
pub fn category_metadata(site: &SiteConfig, slug: &str, name: Option<&str>) -> PageMetadata {
    let name = entity_name(slug, name);
    if name.is_empty() {
        return PageMetadata::fallback("Kategorie | Preisradio", "Kategorieprodukte auf Preisradio");
    }

    let url = site.category_url(slug);
    listing_metadata(
        site,
        &url,
        &name,
        ListingTexts {
            title: format!("{name} günstig kaufen – Reduzierte Angebote"),
            description: format!(
                "{name} Preisvergleich: Saturn, MediaMarkt & Otto. Finden Sie die besten Angebote für {name} und sparen Sie beim Online-Kauf."
            ),
            og_title: format!("{name} | Preisradio"),
        },
    )
}

/// Metadata for `/marken/{slug}`.
#[must_use]
pub fn brand_metadata(site: &SiteConfig, slug: &str, name: Option<&str>) -> PageMetadata {
    let name = entity_name(slug, name);
    if name.is_empty() {
        return PageMetadata::fallback("Marke | Preisradio", "Markenprodukte auf Preisradio");
    }

    let url = site.brand_url(slug);
    listing_metadata(
        site,
        &url,
        &name,
        ListingTexts {
            title: format!("{name} Produkte günstig kaufen | Preisradio"),
            description: format!(
                "{name} Preisvergleich: Saturn, MediaMarkt & Otto. Finden Sie die besten Angebote für {name} Elektronik und sparen Sie beim Online-Kauf."
            ),
            og_title: format!("{name} Produkte | Preisradio"),
        },
    )
}

/// Metadata for `/search`.
#[must_use]
pub fn search_metadata(site: &SiteConfig, query: &str) -> PageMetadata {
    let query = query.trim();
    let (title, url) = if query.is_empty() {
        ("Suche | Preisradio".to_string(), site.url("/search"))
    } else {
        (
            format!("Suchergebnisse für \"{query}\" | Preisradio"),
            format!("{}?q={}", site.url("/search"), encode_uri_component(query)),
        )
    };
    let description = if query.is_empty() {
        "Durchsuchen Sie Elektronik-Angebote von Saturn, MediaMarkt, Otto und Kaufland.".to_string()
    } else {
        clamp_description(&format!(
            "Preise für {query} vergleichen: Angebote von Saturn, MediaMarkt, Otto und Kaufland auf Preisradio."
        ))
    };
    PageMetadata::fallback(&title, &description).with_canonical(&url)
}

/// Metadata for the home page.
#[must_use]
pub fn home_metadata(site: &SiteConfig) -> PageMetadata {
    let title = "Preisradio – Preisvergleich für Elektronik";
    let description = "Vergleichen Sie Elektronik-Preise von Saturn, MediaMarkt, Otto und Kaufland. Finden Sie reduzierte Angebote und sparen Sie beim Online-Kauf.";
    let url = site.url("/");
    PageMetadata {
        keywords: vec!["Preisvergleich".to_string(), SITE_KEYWORD.to_string()],
        open_graph: Some(OpenGraph {
            title: title.to_string(),
            description: description.to_string(),
            url: url.clone(),
            site_name: site.site_name.clone(),
            locale: site.locale.clone(),
            kind: "website".to_string(),
            images: vec![OgImage {
                url: site.url("/og-image.png"),
                width: OG_IMAGE_WIDTH,
                height: OG_IMAGE_HEIGHT,
                alt: site.site_name.clone(),
            }],
        }),
        ..PageMetadata::fallback(title, description)
    }
    .with_canonical(&url)
}

struct ListingTexts {
    title: String,
    description: String,
    og_title: String,
}

fn listing_metadata(site: &SiteConfig, url: &str, name: &str, texts: ListingTexts) -> PageMetadata {
    let description = clamp_description(&texts.description);
    PageMetadata {
        keywords: vec![
            "Preisvergleich".to_string(),
            name.to_string(),
            SITE_KEYWORD.to_string(),
        ],
        open_graph: Some(OpenGraph {
            title: texts.og_title,
            description: format!("Alle {name} Produkte im Preisvergleich"),
            url: url.to_string(),
            site_name: site.site_name.clone(),
            locale: site.locale.clone(),
            kind: "website".to_string(),
            images: Vec::new(),
        }),
        ..PageMetadata::fallback(&texts.title, &description)
    }
    .with_canonical(url)
}

fn entity_name(slug: &str, name: Option<&str>) -> String {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map_or_else(|| display_name_from_slug(slug), str::to_string)
}

#[cfg(test)]
#[path = "metadata_test.rs"]
mod tests;
