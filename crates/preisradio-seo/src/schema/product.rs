use preisradio_core::Product;
use serde_json::{json, Map, Value};

use super::SCHEMA_CONTEXT;
use crate::context::SeoContext;
use crate::rating::synthetic_rating;
use crate::text::js_number;

/// `schema.org/Product` for a single retailer offer.
///
/// Optional properties (`brand`, `sku`, `gtin`, `aggregateRating`) are left
/// out rather than emitted empty.
#[must_use]
pub fn product_schema(ctx: &SeoContext<'_>, product: &Product) -> Value {
    let mut schema = Map::new();
    schema.insert("@context".into(), json!(SCHEMA_CONTEXT));
    schema.insert("@type".into(), json!("Product"));
    schema.insert("name".into(), json!(product.title));
    schema.insert(
        "description".into(),
        json!(non_empty(product.description.as_deref()).unwrap_or(&product.title)),
    );
    schema.insert(
        "image".into(),
        json!(non_empty(product.image.as_deref())
            .map_or_else(|| ctx.site.url("/default-product.jpg"), str::to_string)),
    );
    schema.insert("offers".into(), offer_schema(ctx, product));

    if let Some(brand) = product.brand_name() {
        schema.insert("brand".into(), json!({"@type": "Brand", "name": brand}));
    }
    if let Some(sku) = non_empty(product.sku.as_deref()) {
        schema.insert("sku".into(), json!(sku));
    }
    if let Some(gtin) = product.non_empty_gtin() {
        schema.insert("gtin".into(), json!(gtin));
    }
    if ctx.site.synthetic_ratings {
        schema.insert(
            "aggregateRating".into(),
            synthetic_rating(product).to_schema(),
        );
    }

    Value::Object(schema)
}

/// The `Offer` block of [`product_schema`].
#[must_use]
pub fn offer_schema(ctx: &SeoContext<'_>, product: &Product) -> Value {
    let retailer = ctx.retailer(product.retailer.as_deref());

    let mut seller = Map::new();
    seller.insert("@type".into(), json!("Organization"));
    seller.insert("name".into(), json!(retailer.name));
    if let Some(website) = retailer.website {
        seller.insert("url".into(), json!(website));
    }

    let currency = non_empty(Some(product.currency.as_str())).unwrap_or("EUR");

    json!({
        "@type": "Offer",
        "url": product.url,
        "priceCurrency": currency,
        "price": js_number(product.price),
        "priceValidUntil": ctx.price_valid_until(),
        "availability": "https://schema.org/InStock",
        "seller": Value::Object(seller),
    })
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use preisradio_core::{RetailerDirectory, SiteConfig};

    use super::*;
    use crate::schema::fixtures::galaxy_s21;

    fn ctx<'a>(site: &'a SiteConfig, retailers: &'a RetailerDirectory) -> SeoContext<'a> {
        SeoContext::with_today(site, retailers, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    }

    #[test]
    fn galaxy_s21_offer() {
        let site = SiteConfig::new("https://preisradio.de");
        let retailers = RetailerDirectory::builtin();
        let schema = product_schema(&ctx(&site, &retailers), &galaxy_s21());

        assert_eq!(schema["@context"], "https://schema.org");
        assert_eq!(schema["@type"], "Product");
        assert_eq!(schema["offers"]["price"], "699");
        assert_eq!(schema["offers"]["priceCurrency"], "EUR");
        assert_eq!(schema["offers"]["priceValidUntil"], "2025-01-31");
        assert_eq!(schema["offers"]["seller"]["name"], "Saturn");
        assert_eq!(schema["offers"]["seller"]["url"], "https://www.saturn.de");
        assert_eq!(schema["brand"]["name"], "Samsung");
        assert_eq!(schema["description"], "Galaxy S21");
        assert_eq!(schema["image"], "https://preisradio.de/default-product.jpg");
        assert!(schema.get("sku").is_none());
        assert!(schema.get("gtin").is_none());
        assert_eq!(schema["aggregateRating"]["@type"], "AggregateRating");
    }

    #[test]
    fn unknown_retailer_seller_has_no_url() {
        let site = SiteConfig::new("https://preisradio.de");
        let retailers = RetailerDirectory::builtin();
        let mut product = galaxy_s21();
        product.retailer = Some("cyberport".to_string());

        let schema = product_schema(&ctx(&site, &retailers), &product);
        assert_eq!(schema["offers"]["seller"]["name"], "Händler");
        assert!(schema["offers"]["seller"].get("url").is_none());
    }

    #[test]
    fn optional_identifiers_are_emitted_when_present() {
        let site = SiteConfig::new("https://preisradio.de");
        let retailers = RetailerDirectory::builtin();
        let mut product = galaxy_s21();
        product.sku = Some("SM-G991B".to_string());
        product.gtin = Some("8806092021123".to_string());
        product.image = Some("https://img.example/s21.jpg".to_string());
        product.description = Some("128 GB, Phantom Gray".to_string());
        product.price = 649.5;

        let schema = product_schema(&ctx(&site, &retailers), &product);
        assert_eq!(schema["sku"], "SM-G991B");
        assert_eq!(schema["gtin"], "8806092021123");
        assert_eq!(schema["image"], "https://img.example/s21.jpg");
        assert_eq!(schema["description"], "128 GB, Phantom Gray");
        assert_eq!(schema["offers"]["price"], "649.5");
    }

    #[test]
    fn synthetic_rating_can_be_switched_off() {
        let mut site = SiteConfig::new("https://preisradio.de");
        site.synthetic_ratings = false;
        let retailers = RetailerDirectory::builtin();

        let schema = product_schema(&ctx(&site, &retailers), &galaxy_s21());
        assert!(schema.get("aggregateRating").is_none());
    }

    #[test]
    fn blank_currency_defaults_to_eur() {
        let site = SiteConfig::new("https://preisradio.de");
        let retailers = RetailerDirectory::builtin();
        let mut product = galaxy_s21();
        product.currency = String::new();
        let offer = offer_schema(&ctx(&site, &retailers), &product);
        assert_eq!(offer["priceCurrency"], "EUR");
    }
}
