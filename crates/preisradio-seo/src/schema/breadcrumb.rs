use preisradio_core::{slugify, Product, SiteConfig};
use serde_json::{json, Value};

use super::SCHEMA_CONTEXT;

/// Listing section a category or brand page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Categories,
    Brands,
}

impl Section {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Section::Categories => "Kategorien",
            Section::Brands => "Marken",
        }
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Section::Categories => "/kategorien",
            Section::Brands => "/marken",
        }
    }

    #[must_use]
    pub fn entry_url(self, site: &SiteConfig, slug: &str) -> String {
        match self {
            Section::Categories => site.category_url(slug),
            Section::Brands => site.brand_url(slug),
        }
    }
}

/// Startseite → category → product.
///
/// A product without a category links its middle crumb to the search page.
#[must_use]
pub fn product_breadcrumb(site: &SiteConfig, product: &Product) -> Value {
    let category = product.category.trim();
    let (category_name, category_url) = if category.is_empty() {
        ("Produkte".to_string(), site.url("/search"))
    } else {
        (category.to_string(), site.category_url(&slugify(category)))
    };

    breadcrumb_list(&[
        ("Startseite".to_string(), site.url("/")),
        (category_name, category_url),
        (product.title.clone(), site.product_url(&product.id)),
    ])
}

/// Startseite → Kategorien|Marken → `name`.
#[must_use]
pub fn section_breadcrumb(site: &SiteConfig, section: Section, name: &str, slug: &str) -> Value {
    breadcrumb_list(&[
        ("Startseite".to_string(), site.url("/")),
        (section.label().to_string(), site.url(section.path())),
        (name.to_string(), section.entry_url(site, slug)),
    ])
}

fn breadcrumb_list(crumbs: &[(String, String)]) -> Value {
    let items: Vec<Value> = crumbs
        .iter()
        .enumerate()
        .map(|(index, (name, url))| {
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "name": name,
                "item": url,
            })
        })
        .collect();

    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures::galaxy_s21;

    #[test]
    fn product_breadcrumb_has_three_ordered_items() {
        let site = SiteConfig::new("https://preisradio.de");
        let schema = product_breadcrumb(&site, &galaxy_s21());
        let items = schema["itemListElement"].as_array().unwrap();

        assert_eq!(items.len(), 3);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item["position"], i + 1);
            assert_eq!(item["@type"], "ListItem");
        }
        assert_eq!(items[0]["name"], "Startseite");
        assert_eq!(items[0]["item"], "https://preisradio.de");
        assert_eq!(items[1]["name"], "Smartphones");
        assert_eq!(items[1]["item"], "https://preisradio.de/kategorien/smartphones");
        assert_eq!(items[2]["name"], "Galaxy S21");
        assert_eq!(items[2]["item"], "https://preisradio.de/product/42");
    }

    #[test]
    fn product_without_category_links_search() {
        let site = SiteConfig::new("https://preisradio.de");
        let mut product = galaxy_s21();
        product.category = "  ".to_string();
        let schema = product_breadcrumb(&site, &product);
        assert_eq!(schema["itemListElement"][1]["name"], "Produkte");
        assert_eq!(
            schema["itemListElement"][1]["item"],
            "https://preisradio.de/search"
        );
    }

    #[test]
    fn category_slug_in_crumb_url() {
        let site = SiteConfig::new("https://preisradio.de");
        let mut product = galaxy_s21();
        product.category = "TV & Audio".to_string();
        let schema = product_breadcrumb(&site, &product);
        assert_eq!(
            schema["itemListElement"][1]["item"],
            "https://preisradio.de/kategorien/tv-audio"
        );
    }

    #[test]
    fn brand_section_breadcrumb() {
        let site = SiteConfig::new("https://preisradio.de");
        let schema = section_breadcrumb(&site, Section::Brands, "Samsung", "samsung");
        let items = schema["itemListElement"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1]["name"], "Marken");
        assert_eq!(items[1]["item"], "https://preisradio.de/marken");
        assert_eq!(items[2]["item"], "https://preisradio.de/marken/samsung");
    }
}
