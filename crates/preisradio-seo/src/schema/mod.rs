//! schema.org JSON-LD builders.

mod breadcrumb;
mod faq;
mod item_list;
mod organization;
mod product;
mod website;

pub use breadcrumb::{product_breadcrumb, section_breadcrumb, Section};
pub use faq::{product_faq_schema, site_faq_schema};
pub use item_list::{item_list_schema, ITEM_LIST_LIMIT};
pub use organization::organization_schema;
pub use product::{offer_schema, product_schema};
pub use website::{search_results_schema, website_schema};

pub(crate) const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Serialize a schema for a `<script type="application/ld+json">` element.
///
/// `<` is escaped so product text can never close the script element.
#[must_use]
pub fn to_script_json(schema: &serde_json::Value) -> String {
    schema.to_string().replace('<', "\\u003c")
}

#[cfg(test)]
pub(crate) mod fixtures {
    use preisradio_core::Product;

    /// The Galaxy S21 offer used across the schema tests.
    pub fn galaxy_s21() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "42",
            "title": "Galaxy S21",
            "brand": "Samsung",
            "price": 699,
            "old_price": 899,
            "currency": "EUR",
            "retailer": "saturn",
            "category": "Smartphones",
            "url": "https://www.saturn.de/de/product/42.html",
        }))
        .expect("fixture is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_json_escapes_angle_brackets() {
        let value = serde_json::json!({"name": "</script><b>"});
        let out = to_script_json(&value);
        assert!(!out.contains("</script>"));
        let back: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(back["name"], "</script><b>");
    }
}
