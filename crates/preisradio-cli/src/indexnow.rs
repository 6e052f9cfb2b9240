//! `indexnow`: push URLs to search engines.

use preisradio_client::submit_to_indexnow;
use preisradio_core::SiteConfig;

use crate::Context;

/// URLs to submit: the given ones, plus the sitemap index when requested.
pub(crate) fn submission_urls(site: &SiteConfig, mut urls: Vec<String>, sitemap: bool) -> Vec<String> {
    if sitemap {
        let index = site.url("/sitemap.xml");
        if !urls.contains(&index) {
            urls.push(index);
        }
    }
    urls.retain(|u| !u.trim().is_empty());
    urls
}

/// # Errors
///
/// Returns an error if no key is configured, the endpoint is unreachable,
/// or the endpoint refuses the submission.
pub(crate) async fn run_indexnow(ctx: &Context, urls: Vec<String>, sitemap: bool) -> anyhow::Result<()> {
    let urls = submission_urls(&ctx.site, urls, sitemap);
    if urls.is_empty() {
        anyhow::bail!("no URLs to submit");
    }

    let http = reqwest::Client::builder()
        .user_agent(ctx.config.user_agent.clone())
        .build()?;
    let outcome = submit_to_indexnow(&http, &ctx.config, &ctx.site, &urls).await?;
    if !outcome.accepted {
        anyhow::bail!(
            "IndexNow refused the submission ({}): {}",
            outcome.status,
            outcome.details
        );
    }
    println!("submitted {} URLs to IndexNow ({})", urls.len(), outcome.status);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sitemap_flag_adds_index_once() {
        let site = SiteConfig::new("https://preisradio.de");
        assert_eq!(
            submission_urls(&site, Vec::new(), true),
            vec!["https://preisradio.de/sitemap.xml".to_string()]
        );
        assert_eq!(
            submission_urls(
                &site,
                vec!["https://preisradio.de/sitemap.xml".to_string(), " ".to_string()],
                true
            ),
            vec!["https://preisradio.de/sitemap.xml".to_string()]
        );
        assert!(submission_urls(&site, Vec::new(), false).is_empty());
    }
}
