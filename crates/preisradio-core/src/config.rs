use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// development configuration.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_origin = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if !(raw.starts_with("http://") || raw.starts_with("https://")) {
            return Err(invalid(var, format!("\"{raw}\" must start with http:// or https://")));
        }
        Ok(raw.trim_end_matches('/').to_string())
    };

    let env = parse_environment(&or_default("PREISRADIO_ENV", "development"));
    let bind_addr = parse_addr("PREISRADIO_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PREISRADIO_LOG_LEVEL", "info");

    let site_url = parse_origin("PREISRADIO_SITE_URL", "https://preisradio.de")?;
    let api_url = parse_origin("PREISRADIO_API_URL", "https://api.preisradio.de")?;

    let api_timeout_secs = match optional("PREISRADIO_API_TIMEOUT_SECS") {
        Some(raw) => Some(
            raw.parse::<u64>()
                .map_err(|e| invalid("PREISRADIO_API_TIMEOUT_SECS", e.to_string()))?,
        ),
        None => None,
    };
    let user_agent = or_default("PREISRADIO_USER_AGENT", "Preisradio/1.0");
    let retailers_path = optional("PREISRADIO_RETAILERS_PATH").map(PathBuf::from);

    let synthetic_ratings = parse_bool(&or_default("PREISRADIO_SYNTHETIC_RATINGS", "true"))
        .ok_or_else(|| {
            invalid(
                "PREISRADIO_SYNTHETIC_RATINGS",
                "expected true/false".to_string(),
            )
        })?;

    let sitemap_page_size = parse_u32("PREISRADIO_SITEMAP_PAGE_SIZE", "10000")?;
    let page_cache_ttl_secs = parse_u64("PREISRADIO_PAGE_CACHE_TTL_SECS", "3600")?;
    let page_cache_max_entries = parse_u32("PREISRADIO_PAGE_CACHE_MAX_ENTRIES", "2000")? as usize;

    let indexnow_key = optional("INDEXNOW_KEY");
    let indexnow_endpoint = parse_origin("INDEXNOW_ENDPOINT", "https://api.indexnow.org/indexnow")?;
    let indexnow_cron = or_default("PREISRADIO_INDEXNOW_CRON", "0 0 4 * * *");

    let revalidate_token = optional("REVALIDATE_TOKEN");
    let resend_api_key = optional("RESEND_API_KEY");
    let resend_endpoint = parse_origin("RESEND_ENDPOINT", "https://api.resend.com/emails")?;
    let contact_email = or_default("PREISRADIO_CONTACT_EMAIL", "contact@preisradio.de");

    if env == Environment::Production && revalidate_token.is_none() {
        return Err(ConfigError::MissingEnvVar("REVALIDATE_TOKEN".to_string()));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        site_url,
        api_url,
        api_timeout_secs,
        user_agent,
        retailers_path,
        synthetic_ratings,
        sitemap_page_size,
        page_cache_ttl_secs,
        page_cache_max_entries,
        indexnow_key,
        indexnow_endpoint,
        indexnow_cron,
        revalidate_token,
        resend_api_key,
        resend_endpoint,
        contact_email,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
