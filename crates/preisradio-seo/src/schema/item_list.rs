use preisradio_core::Product;
use serde_json::{json, Value};

use super::SCHEMA_CONTEXT;
use crate::context::SeoContext;
use crate::text::js_number;

/// Entries emitted in an `ItemList`; the rest of the input is only counted.
pub const ITEM_LIST_LIMIT: usize = 20;

/// `ItemList` of the first [`ITEM_LIST_LIMIT`] products.
///
/// `numberOfItems` is the length of the whole input, so it may exceed the
/// number of `itemListElement` entries.
#[must_use]
pub fn item_list_schema(ctx: &SeoContext<'_>, name: &str, products: &[Product]) -> Value {
    let mut list = item_list_body(ctx, products);
    list["@context"] = json!(SCHEMA_CONTEXT);
    list["name"] = json!(name);
    list
}

/// `ItemList` without `@context`, for nesting inside another schema.
pub(crate) fn item_list_body(ctx: &SeoContext<'_>, products: &[Product]) -> Value {
    let elements: Vec<Value> = products
        .iter()
        .take(ITEM_LIST_LIMIT)
        .enumerate()
        .map(|(index, product)| {
            let currency = if product.currency.is_empty() {
                "EUR"
            } else {
                product.currency.as_str()
            };
            let mut item = json!({
                "@type": "Product",
                "name": product.display_name(),
                "url": ctx.site.product_url(&product.id),
                "offers": {
                    "@type": "Offer",
                    "price": js_number(product.price),
                    "priceCurrency": currency,
                },
            });
            if let Some(image) = product.image.as_deref().filter(|i| !i.is_empty()) {
                item["image"] = json!(image);
            }
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "item": item,
            })
        })
        .collect();

    json!({
        "@type": "ItemList",
        "numberOfItems": products.len(),
        "itemListElement": elements,
    })
}

#[cfg(test)]
mod tests {
    use preisradio_core::{RetailerDirectory, SiteConfig};

    use super::*;
    use crate::schema::fixtures::galaxy_s21;

    fn products(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| {
                let mut p = galaxy_s21();
                p.id = format!("p{i}");
                p
            })
            .collect()
    }

    #[test]
    fn caps_elements_but_counts_all() {
        let site = SiteConfig::new("https://preisradio.de");
        let retailers = RetailerDirectory::builtin();
        let ctx = SeoContext::new(&site, &retailers);

        let schema = item_list_schema(&ctx, "Smartphones", &products(25));
        assert_eq!(schema["numberOfItems"], 25);
        assert_eq!(schema["itemListElement"].as_array().unwrap().len(), 20);
        assert_eq!(schema["itemListElement"][19]["position"], 20);
        assert_eq!(schema["@context"], "https://schema.org");
        assert_eq!(schema["name"], "Smartphones");
    }

    #[test]
    fn list_items_point_at_product_pages() {
        let site = SiteConfig::new("https://preisradio.de");
        let retailers = RetailerDirectory::builtin();
        let ctx = SeoContext::new(&site, &retailers);

        let schema = item_list_schema(&ctx, "x", &products(2));
        let first = &schema["itemListElement"][0];
        assert_eq!(first["position"], 1);
        assert_eq!(first["item"]["url"], "https://preisradio.de/product/p0");
        assert_eq!(first["item"]["name"], "Samsung Galaxy S21");
        assert_eq!(first["item"]["offers"]["price"], "699");
        assert!(first["item"].get("image").is_none());
    }

    #[test]
    fn empty_input() {
        let site = SiteConfig::new("https://preisradio.de");
        let retailers = RetailerDirectory::builtin();
        let ctx = SeoContext::new(&site, &retailers);
        let schema = item_list_schema(&ctx, "leer", &[]);
        assert_eq!(schema["numberOfItems"], 0);
        assert!(schema["itemListElement"].as_array().unwrap().is_empty());
    }
}
