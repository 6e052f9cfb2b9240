use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_variants() {
    assert_eq!(parse_environment("development"), Environment::Development);
    assert_eq!(parse_environment("test"), Environment::Test);
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn parse_bool_accepts_common_spellings() {
    assert_eq!(parse_bool("TRUE"), Some(true));
    assert_eq!(parse_bool("0"), Some(false));
    assert_eq!(parse_bool("off"), Some(false));
    assert_eq!(parse_bool("maybe"), None);
}

#[test]
fn build_app_config_defaults_from_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");

    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.site_url, "https://preisradio.de");
    assert_eq!(cfg.api_url, "https://api.preisradio.de");
    assert!(cfg.api_timeout_secs.is_none());
    assert_eq!(cfg.user_agent, "Preisradio/1.0");
    assert!(cfg.retailers_path.is_none());
    assert!(cfg.synthetic_ratings);
    assert_eq!(cfg.sitemap_page_size, 10_000);
    assert_eq!(cfg.page_cache_ttl_secs, 3600);
    assert_eq!(cfg.page_cache_max_entries, 2000);
    assert!(cfg.indexnow_key.is_none());
    assert_eq!(cfg.indexnow_endpoint, "https://api.indexnow.org/indexnow");
    assert_eq!(cfg.indexnow_cron, "0 0 4 * * *");
    assert!(cfg.revalidate_token.is_none());
    assert!(cfg.resend_api_key.is_none());
    assert_eq!(cfg.contact_email, "contact@preisradio.de");
}

#[test]
fn build_app_config_trims_trailing_slash_from_origins() {
    let mut map = HashMap::new();
    map.insert("PREISRADIO_SITE_URL", "https://staging.preisradio.de/");
    map.insert("PREISRADIO_API_URL", "http://localhost:8000/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.site_url, "https://staging.preisradio.de");
    assert_eq!(cfg.api_url, "http://localhost:8000");
}

#[test]
fn build_app_config_rejects_origin_without_scheme() {
    let mut map = HashMap::new();
    map.insert("PREISRADIO_SITE_URL", "preisradio.de");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PREISRADIO_SITE_URL"),
        "expected InvalidEnvVar(PREISRADIO_SITE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("PREISRADIO_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PREISRADIO_BIND_ADDR"),
        "expected InvalidEnvVar(PREISRADIO_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn api_timeout_override() {
    let mut map = HashMap::new();
    map.insert("PREISRADIO_API_TIMEOUT_SECS", "15");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_timeout_secs, Some(15));
}

#[test]
fn api_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("PREISRADIO_API_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PREISRADIO_API_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PREISRADIO_API_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn synthetic_ratings_can_be_disabled() {
    let mut map = HashMap::new();
    map.insert("PREISRADIO_SYNTHETIC_RATINGS", "false");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(!cfg.synthetic_ratings);
}

#[test]
fn synthetic_ratings_invalid() {
    let mut map = HashMap::new();
    map.insert("PREISRADIO_SYNTHETIC_RATINGS", "sometimes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PREISRADIO_SYNTHETIC_RATINGS"),
        "expected InvalidEnvVar(PREISRADIO_SYNTHETIC_RATINGS), got: {result:?}"
    );
}

#[test]
fn sitemap_page_size_invalid() {
    let mut map = HashMap::new();
    map.insert("PREISRADIO_SITEMAP_PAGE_SIZE", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PREISRADIO_SITEMAP_PAGE_SIZE"),
        "expected InvalidEnvVar(PREISRADIO_SITEMAP_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn blank_secrets_are_treated_as_absent() {
    let mut map = HashMap::new();
    map.insert("INDEXNOW_KEY", "   ");
    map.insert("RESEND_API_KEY", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.indexnow_key.is_none());
    assert!(cfg.resend_api_key.is_none());
}

#[test]
fn production_requires_revalidate_token() {
    let mut map = HashMap::new();
    map.insert("PREISRADIO_ENV", "production");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "REVALIDATE_TOKEN"),
        "expected MissingEnvVar(REVALIDATE_TOKEN), got: {result:?}"
    );

    map.insert("REVALIDATE_TOKEN", "s3cret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = HashMap::new();
    map.insert("INDEXNOW_KEY", "key-123");
    map.insert("REVALIDATE_TOKEN", "token-456");
    map.insert("RESEND_API_KEY", "re_789");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("key-123"));
    assert!(!rendered.contains("token-456"));
    assert!(!rendered.contains("re_789"));
    assert!(rendered.contains("[redacted]"));
}
