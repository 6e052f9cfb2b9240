use serde::{Deserialize, Serialize};

use crate::catalog::SortKey;

/// Parameters accepted by the upstream products list endpoint.
///
/// Nothing is validated locally; the upstream API is the authority.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub retailer: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: Option<SortKey>,
}

impl ProductQuery {
    /// Query-string pairs in a stable order. Unset and blank values are skipped.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut text = |key: &'static str, value: &Option<String>| {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, v.to_string()));
            }
        };
        text("search", &self.search);
        text("category", &self.category);
        text("brand", &self.brand);
        text("retailer", &self.retailer);

        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push(("page_size", size.to_string()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        pairs
    }

    /// Same query restricted to one retailer.
    #[must_use]
    pub fn for_retailer(&self, retailer: &str) -> Self {
        Self {
            retailer: Some(retailer.to_string()),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Parameters for the categories and brands list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListQuery {
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.trim().to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push(("page_size", size.to_string()));
        }
        pairs
    }
}
