use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::pricing::parse_discount_label;
use crate::products::Product;
use crate::query::ProductQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    Newest,
}

impl SortKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::Newest => "newest",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "price_asc" => Ok(SortKey::PriceAsc),
            "price_desc" => Ok(SortKey::PriceDesc),
            "newest" => Ok(SortKey::Newest),
            other => Err(format!("unknown sort key '{other}'")),
        }
    }
}

/// Filter and sort options of a listing view.
///
/// Everything except `min_discount` can be sent to the upstream API through
/// [`CatalogFilter::push_down`]. The discount threshold has no upstream
/// counterpart and is applied to the fetched page only, so page counts
/// overstate the number of matches while it is active.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub retailer: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Minimum discount in percent, compared against the product's discount label.
    pub min_discount: Option<f64>,
    pub sort: Option<SortKey>,
}

impl CatalogFilter {
    /// Copy the pushable facets into `query`, overriding what it already holds.
    #[must_use]
    pub fn push_down(&self, mut query: ProductQuery) -> ProductQuery {
        if let Some(retailer) = self.retailer.as_deref().filter(|r| !r.trim().is_empty()) {
            query.retailer = Some(retailer.trim().to_lowercase());
        }
        if self.min_price.is_some() {
            query.min_price = self.min_price;
        }
        if self.max_price.is_some() {
            query.max_price = self.max_price;
        }
        if self.sort.is_some() {
            query.sort = self.sort;
        }
        query
    }

    /// Whether the residual client-side filter will drop rows from a page.
    #[must_use]
    pub fn has_residual(&self) -> bool {
        self.min_discount.is_some()
    }

    /// Keep only the products matching the discount threshold, then sort.
    ///
    /// Used after [`Self::push_down`], when the upstream API already applied
    /// the other facets.
    #[must_use]
    pub fn apply_residual(&self, products: Vec<Product>) -> Vec<Product> {
        let mut kept: Vec<Product> = products
            .into_iter()
            .filter(|p| self.matches_discount(p))
            .collect();
        if let Some(sort) = self.sort {
            sort_products(&mut kept, sort);
        }
        kept
    }

    /// Apply every facet locally to an already-fetched page.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut kept: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();
        if let Some(sort) = self.sort {
            sort_products(&mut kept, sort);
        }
        kept
    }

    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(wanted) = self.retailer.as_deref().filter(|r| !r.trim().is_empty()) {
            let actual = product.retailer.as_deref().unwrap_or_default();
            if !actual.trim().eq_ignore_ascii_case(wanted.trim()) {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        self.matches_discount(product)
    }

    fn matches_discount(&self, product: &Product) -> bool {
        match self.min_discount {
            None => true,
            Some(min) => parse_discount_label(product.discount.as_deref())
                .is_some_and(|value| value >= min),
        }
    }
}

/// Stable in-place sort. `Newest` treats a missing or unparseable
/// `scraped_at` as the Unix epoch.
pub fn sort_products(products: &mut [Product], key: SortKey) {
    match key {
        SortKey::PriceAsc => products.sort_by(|a, b| cmp_f64(a.price, b.price)),
        SortKey::PriceDesc => products.sort_by(|a, b| cmp_f64(b.price, a.price)),
        SortKey::Newest => products.sort_by_key(|p| {
            std::cmp::Reverse(scraped_at_millis(p.scraped_at.as_deref()))
        }),
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Milliseconds since the epoch for an RFC 3339 or naive ISO timestamp, else `0`.
#[must_use]
pub fn scraped_at_millis(raw: Option<&str>) -> i64 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0;
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.timestamp_millis();
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|ts| ts.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// Merge several lists by taking one element from each in turn:
/// `a[0], b[0], a[1], b[1], ...`. Shorter lists simply run out.
#[must_use]
pub fn interleave<T>(lists: Vec<Vec<T>>) -> Vec<T> {
    let total = lists.iter().map(Vec::len).sum();
    let mut iters: Vec<_> = lists.into_iter().map(Vec::into_iter).collect();
    let mut merged = Vec::with_capacity(total);
    while merged.len() < total {
        for it in &mut iters {
            if let Some(item) = it.next() {
                merged.push(item);
            }
        }
    }
    merged
}

/// Cheapest offer per retailer, ordered by price.
///
/// Returns an empty list when fewer than two retailers remain, since a
/// comparison needs at least two.
#[must_use]
pub fn cheapest_per_retailer(products: &[Product]) -> Vec<Product> {
    let mut best: HashMap<String, &Product> = HashMap::new();
    for product in products {
        let Some(retailer) = product.retailer.as_deref().map(str::to_lowercase) else {
            continue;
        };
        best.entry(retailer)
            .and_modify(|current| {
                if product.price < current.price {
                    *current = product;
                }
            })
            .or_insert(product);
    }
    if best.len() < 2 {
        return Vec::new();
    }
    let mut offers: Vec<Product> = best.into_values().cloned().collect();
    offers.sort_by(|a, b| cmp_f64(a.price, b.price).then_with(|| a.id.cmp(&b.id)));
    offers
}

/// Unique non-empty brands on a page, sorted.
#[must_use]
pub fn brand_facets(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .filter_map(Product::brand_name)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
