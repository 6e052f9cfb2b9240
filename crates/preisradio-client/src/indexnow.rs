//! IndexNow push notifications for changed URLs.

use preisradio_core::{AppConfig, SiteConfig};
use serde_json::json;

use crate::error::ClientError;

/// Outcome of one IndexNow submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexNowOutcome {
    pub status: u16,
    pub accepted: bool,
    /// Upstream body, kept for diagnostics when the submission was refused.
    pub details: String,
}

/// Public URL of the key verification file.
#[must_use]
pub fn key_location(site: &SiteConfig, key: &str) -> String {
    site.url(&format!("/{key}.txt"))
}

/// Post `urls` to the configured IndexNow endpoint.
///
/// # Errors
///
/// [`ClientError::MissingIndexNowKey`] when no key is configured,
/// [`ClientError::Http`] when the endpoint is unreachable. A refusal by the
/// endpoint is an `Ok` outcome with `accepted == false`.
pub async fn submit_to_indexnow(
    http: &reqwest::Client,
    config: &AppConfig,
    site: &SiteConfig,
    urls: &[String],
) -> Result<IndexNowOutcome, ClientError> {
    let Some(key) = config.indexnow_key.as_deref() else {
        return Err(ClientError::MissingIndexNowKey);
    };

    let payload = json!({
        "host": site.host(),
        "key": key,
        "keyLocation": key_location(site, key),
        "urlList": urls,
    });

    let response = http
        .post(&config.indexnow_endpoint)
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    let details = if status.is_success() {
        String::new()
    } else {
        response.text().await.unwrap_or_default()
    };
    tracing::info!(status = %status, urls = urls.len(), "indexnow submission finished");

    Ok(IndexNowOutcome {
        status: status.as_u16(),
        accepted: status.is_success(),
        details,
    })
}
