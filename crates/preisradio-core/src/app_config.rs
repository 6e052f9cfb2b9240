use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Public origin of the storefront, without a trailing slash.
    pub site_url: String,
    /// Origin of the upstream product API, without the `/api` suffix.
    pub api_url: String,
    /// `None` leaves the HTTP client's own default in place.
    pub api_timeout_secs: Option<u64>,
    pub user_agent: String,
    pub retailers_path: Option<PathBuf>,
    pub synthetic_ratings: bool,
    pub sitemap_page_size: u32,
    pub page_cache_ttl_secs: u64,
    /// Upper bound on rendered pages held in memory.
    pub page_cache_max_entries: usize,
    pub indexnow_key: Option<String>,
    pub indexnow_endpoint: String,
    pub indexnow_cron: String,
    pub revalidate_token: Option<String>,
    pub resend_api_key: Option<String>,
    pub resend_endpoint: String,
    pub contact_email: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("site_url", &self.site_url)
            .field("api_url", &self.api_url)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("retailers_path", &self.retailers_path)
            .field("synthetic_ratings", &self.synthetic_ratings)
            .field("sitemap_page_size", &self.sitemap_page_size)
            .field("page_cache_ttl_secs", &self.page_cache_ttl_secs)
            .field("page_cache_max_entries", &self.page_cache_max_entries)
            .field(
                "indexnow_key",
                &self.indexnow_key.as_ref().map(|_| "[redacted]"),
            )
            .field("indexnow_endpoint", &self.indexnow_endpoint)
            .field("indexnow_cron", &self.indexnow_cron)
            .field(
                "revalidate_token",
                &self.revalidate_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "resend_api_key",
                &self.resend_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("resend_endpoint", &self.resend_endpoint)
            .field("contact_email", &self.contact_email)
            .finish()
    }
}

/// Site-wide inputs for every structured-data and metadata generator.
///
/// Generators never read the environment themselves; they receive this
/// value explicitly so they stay pure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub base_url: String,
    pub site_name: String,
    pub locale: String,
    /// Emit the hash-derived `aggregateRating` block on product schemas.
    pub synthetic_ratings: bool,
}

impl SiteConfig {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            site_name: "Preisradio".to_string(),
            locale: "de_DE".to_string(),
            synthetic_ratings: true,
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            synthetic_ratings: config.synthetic_ratings,
            ..Self::new(&config.site_url)
        }
    }

    /// Absolute URL for a site-relative path such as `/kontakt`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.is_empty() || path == "/" {
            return self.base_url.clone();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    #[must_use]
    pub fn product_url(&self, id: &str) -> String {
        format!("{}/product/{id}", self.base_url)
    }

    #[must_use]
    pub fn category_url(&self, slug: &str) -> String {
        format!("{}/kategorien/{slug}", self.base_url)
    }

    #[must_use]
    pub fn brand_url(&self, slug: &str) -> String {
        format!("{}/marken/{slug}", self.base_url)
    }

    /// Host name of the site, used by IndexNow submissions.
    #[must_use]
    pub fn host(&self) -> &str {
        let without_scheme = self
            .base_url
            .split_once("://")
            .map_or(self.base_url.as_str(), |(_, rest)| rest);
        without_scheme.split('/').next().unwrap_or(without_scheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_config_trims_trailing_slash() {
        let site = SiteConfig::new("https://preisradio.de/");
        assert_eq!(site.base_url, "https://preisradio.de");
        assert_eq!(site.url("/kontakt"), "https://preisradio.de/kontakt");
        assert_eq!(site.url("/"), "https://preisradio.de");
    }

    #[test]
    fn site_config_builds_entity_urls() {
        let site = SiteConfig::new("https://preisradio.de");
        assert_eq!(site.product_url("42"), "https://preisradio.de/product/42");
        assert_eq!(
            site.category_url("smartphones"),
            "https://preisradio.de/kategorien/smartphones"
        );
        assert_eq!(site.brand_url("asus"), "https://preisradio.de/marken/asus");
    }

    #[test]
    fn host_strips_scheme_and_path() {
        assert_eq!(SiteConfig::new("https://preisradio.de").host(), "preisradio.de");
        assert_eq!(
            SiteConfig::new("http://localhost:3000/shop").host(),
            "localhost:3000"
        );
    }
}
