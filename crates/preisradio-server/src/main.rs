mod api;
mod cache;
mod feeds;
mod middleware;
mod pages;
mod scheduler;

use std::net::SocketAddr;
use std::sync::Arc;

use preisradio_client::ApiClient;
use preisradio_core::{RetailerDirectory, RetailerLookup, SiteConfig};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limit_state, AppState};
use crate::cache::RenderCache;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(preisradio_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let retailers = RetailerDirectory::load_or_builtin(config.retailers_path.as_deref())?;
    tracing::info!(
        env = %config.env,
        retailers = retailers.retailer_ids().len(),
        "starting preisradio-server"
    );

    let state = AppState {
        api: ApiClient::from_config(&config)?,
        site: Arc::new(SiteConfig::from_app_config(&config)),
        retailers: Arc::new(retailers),
        http: reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?,
        cache: RenderCache::new(
            std::time::Duration::from_secs(config.page_cache_ttl_secs),
            config.page_cache_max_entries,
        ),
        config: Arc::clone(&config),
    };

    let _scheduler = scheduler::build_scheduler(state.clone()).await?;

    let app = build_app(state, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
