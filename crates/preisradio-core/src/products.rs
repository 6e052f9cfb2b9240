use serde::{Deserialize, Deserializer, Serialize};

/// A product offer as returned by the upstream product API.
///
/// Each record is one retailer's listing; there is no cross-retailer identity.
/// Only `id`, `title` and `price` are required when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Upstream identifier. Some endpoints emit it as a number.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    /// Previous price. Only meaningful as a discount when greater than `price`.
    #[serde(default)]
    pub old_price: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Free-text discount label, e.g. `"-15%"`.
    #[serde(default)]
    pub discount: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    /// EAN/GTIN code.
    #[serde(default)]
    pub gtin: Option<String>,
    /// Deep link to the product on the retailer's site.
    #[serde(default)]
    pub url: String,
    /// Retailer id, e.g. `"saturn"`.
    #[serde(default)]
    pub retailer: Option<String>,
    /// ISO-8601 timestamp of the last scrape.
    #[serde(default)]
    pub scraped_at: Option<String>,
}

impl Product {
    /// Non-empty brand, if any.
    #[must_use]
    pub fn brand_name(&self) -> Option<&str> {
        self.brand.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }

    /// Brand and title combined, without repeating a brand the title already starts with.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.brand_name() {
            Some(brand)
                if !self
                    .title
                    .to_lowercase()
                    .starts_with(&brand.to_lowercase()) =>
            {
                format!("{brand} {}", self.title)
            }
            _ => self.title.clone(),
        }
    }

    #[must_use]
    pub fn non_empty_gtin(&self) -> Option<&str> {
        self.gtin.as_deref().filter(|g| !g.trim().is_empty())
    }
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Paginated list envelope used by every list endpoint of the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

/// Entry of the categories endpoint. Older deployments return bare strings,
/// newer ones include a product count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryEntry {
    Name(String),
    Counted { name: String, count: u64 },
}

impl CategoryEntry {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            CategoryEntry::Name(name) | CategoryEntry::Counted { name, .. } => name,
        }
    }

    #[must_use]
    pub fn count(&self) -> Option<u64> {
        match self {
            CategoryEntry::Name(_) => None,
            CategoryEntry::Counted { count, .. } => Some(*count),
        }
    }
}

/// Retailer record from `GET /api/retailers/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Contact form submission relayed to the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactMessage {
    /// All four fields carry non-blank text.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.subject, &self.message]
            .iter()
            .all(|f| !f.trim().is_empty())
    }
}

/// Merchant onboarding request from the retailer page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopRequest {
    #[serde(default)]
    pub shop_name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub email: String,
}

impl ShopRequest {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.shop_name, &self.website, &self.email]
            .iter()
            .all(|f| !f.trim().is_empty())
    }
}
