//! Hash-derived `aggregateRating` values.
//!
//! No review data exists upstream. These numbers are synthesized from the
//! product's SKU or id so they stay stable between renders, and are emitted
//! only while `SiteConfig::synthetic_ratings` is enabled.

use preisradio_core::Product;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticRating {
    /// One decimal place, `"3.5"` through `"4.9"`.
    pub rating_value: String,
    /// 15 through 500.
    pub review_count: u32,
}

impl SyntheticRating {
    #[must_use]
    pub fn to_schema(&self) -> Value {
        json!({
            "@type": "AggregateRating",
            "ratingValue": self.rating_value,
            "reviewCount": self.review_count.to_string(),
            "bestRating": "5",
            "worstRating": "1",
        })
    }
}

/// Rating for `product`, seeded from its SKU, else its id, else `"x"`.
#[must_use]
pub fn synthetic_rating(product: &Product) -> SyntheticRating {
    let key = [product.sku.as_deref(), Some(product.id.as_str())]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or("x");
    rating_for_seed(seed(key))
}

fn seed(key: &str) -> u64 {
    key.encode_utf16().map(u64::from).sum()
}

fn rating_for_seed(seed: u64) -> SyntheticRating {
    let tenths = 35 + seed % 15;
    let review_count = 15 + seed % 486;
    SyntheticRating {
        rating_value: format!("{}.{}", tenths / 10, tenths % 10),
        // at most 500
        review_count: u32::try_from(review_count).unwrap_or(500),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, sku: Option<&str>) -> Product {
        let mut p: Product =
            serde_json::from_value(json!({"id": id, "title": "t", "price": 1.0})).unwrap();
        p.sku = sku.map(str::to_string);
        p
    }

    #[test]
    fn seed_sums_utf16_units() {
        assert_eq!(seed("x"), 120);
        assert_eq!(seed("ab"), 97 + 98);
        assert_eq!(seed("ä"), 228);
    }

    #[test]
    fn rating_is_deterministic() {
        let p = product("42", Some("SKU-1"));
        assert_eq!(synthetic_rating(&p), synthetic_rating(&p));
    }

    #[test]
    fn sku_takes_precedence_over_id() {
        let with_sku = product("42", Some("abc"));
        let same_sku = product("999", Some("abc"));
        assert_eq!(synthetic_rating(&with_sku), synthetic_rating(&same_sku));
    }

    #[test]
    fn empty_sku_falls_back_to_id() {
        assert_eq!(
            synthetic_rating(&product("42", Some(""))),
            synthetic_rating(&product("42", None))
        );
    }

    #[test]
    fn known_seed_values() {
        // "42" = 52 + 50 = 102
        let r = synthetic_rating(&product("42", None));
        assert_eq!(r.rating_value, "4.7");
        assert_eq!(r.review_count, 117);

        // empty id and sku fall through to "x" = 120
        let r = synthetic_rating(&product("", None));
        assert_eq!(r.rating_value, "3.5");
        assert_eq!(r.review_count, 135);
    }

    #[test]
    fn ratings_stay_in_range() {
        for seed in 0..5000 {
            let r = rating_for_seed(seed);
            let value: f64 = r.rating_value.parse().unwrap();
            assert!((3.5..=4.9).contains(&value), "rating {value} for seed {seed}");
            assert!((15..=500).contains(&r.review_count));
        }
    }

    #[test]
    fn schema_block_shape() {
        let block = synthetic_rating(&product("42", None)).to_schema();
        assert_eq!(block["@type"], "AggregateRating");
        assert_eq!(block["reviewCount"], "117");
        assert_eq!(block["bestRating"], "5");
    }
}
