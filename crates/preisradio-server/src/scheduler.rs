//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup. The only recurring job
//! pings IndexNow with the sitemap index, and it is registered only when an
//! IndexNow key is configured.

use preisradio_client::submit_to_indexnow;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::api::AppState;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process. Dropping it shuts down all scheduled jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised, the
/// cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(state: AppState) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    if state.config.indexnow_key.is_some() {
        register_sitemap_ping_job(&scheduler, state).await?;
    } else {
        tracing::info!("scheduler: INDEXNOW_KEY not set; sitemap ping disabled");
    }

    scheduler.start().await?;
    Ok(scheduler)
}

/// Submit `{site}/sitemap.xml` to IndexNow on `PREISRADIO_INDEXNOW_CRON`
/// (daily at 04:00 UTC by default).
async fn register_sitemap_ping_job(
    scheduler: &JobScheduler,
    state: AppState,
) -> Result<(), JobSchedulerError> {
    let cron = state.config.indexnow_cron.clone();

    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let state = state.clone();

        Box::pin(async move {
            tracing::info!("scheduler: submitting sitemap to IndexNow");
            run_sitemap_ping(&state).await;
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron = %cron, "scheduler: sitemap ping registered");
    Ok(())
}

async fn run_sitemap_ping(state: &AppState) {
    let urls = vec![state.site.url("/sitemap.xml")];
    match submit_to_indexnow(&state.http, &state.config, &state.site, &urls).await {
        Ok(outcome) if outcome.accepted => {
            tracing::info!(status = outcome.status, "scheduler: sitemap ping accepted");
        }
        Ok(outcome) => {
            tracing::warn!(
                status = outcome.status,
                details = %outcome.details,
                "scheduler: sitemap ping refused"
            );
        }
        Err(error) => tracing::error!(error = %error, "scheduler: sitemap ping failed"),
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::test_support::{test_config, test_state};

    #[tokio::test]
    async fn sitemap_ping_submits_index_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/indexnow"))
            .and(body_partial_json(serde_json::json!({
                "urlList": ["https://preisradio.de/sitemap.xml"],
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = test_config(&server.uri());
        config.indexnow_key = Some("k3y".to_string());
        run_sitemap_ping(&test_state(config)).await;
    }

    #[tokio::test]
    async fn invalid_cron_is_rejected() {
        let mut config = test_config("http://127.0.0.1:9");
        config.indexnow_key = Some("k3y".to_string());
        config.indexnow_cron = "not a cron".to_string();
        let scheduler = JobScheduler::new().await.expect("scheduler");
        assert!(register_sitemap_ping_job(&scheduler, test_state(config))
            .await
            .is_err());
    }
}
