use preisradio_core::SiteConfig;
use serde_json::{json, Value};

use super::SCHEMA_CONTEXT;

const SOCIAL_PROFILES: [&str; 3] = [
    "https://www.facebook.com/preisradio",
    "https://www.twitter.com/preisradio",
    "https://www.instagram.com/preisradio",
];

#[must_use]
pub fn organization_schema(site: &SiteConfig) -> Value {
    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "Organization",
        "name": site.site_name,
        "url": site.base_url,
        "logo": site.url("/logo.png"),
        "description": "Preisvergleich für Elektronik bei Saturn, MediaMarkt, Otto und Kaufland",
        "sameAs": SOCIAL_PROFILES,
        "contactPoint": {
            "@type": "ContactPoint",
            "contactType": "Customer Service",
            "url": site.url("/kontakt"),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organization_fields() {
        let site = SiteConfig::new("https://preisradio.de/");
        let schema = organization_schema(&site);
        assert_eq!(schema["name"], "Preisradio");
        assert_eq!(schema["url"], "https://preisradio.de");
        assert_eq!(schema["logo"], "https://preisradio.de/logo.png");
        assert_eq!(schema["sameAs"].as_array().unwrap().len(), 3);
        assert_eq!(
            schema["contactPoint"]["url"],
            "https://preisradio.de/kontakt"
        );
    }
}
