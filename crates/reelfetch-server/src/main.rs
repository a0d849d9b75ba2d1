//! reelfetch HTTP server binary

use std::net::SocketAddr;

use anyhow::Context;
use reelfetch_core::ReelScraper;
use reelfetch_server::{AppState, ServerConfig, config::DEFAULT_LOG_FILTER, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = ServerConfig::from_env();
    info!(
        port = config.port,
        fetch_mode = %config.scraper.fetch_mode,
        pool_size = config.scraper.browser.pool_size,
        login = config.scraper.credentials.is_some(),
        require_login = config.scraper.require_login,
        "starting reelfetch server"
    );

    let scraper = ReelScraper::with_config(config.scraper).context("failed to build scraper")?;
    let app = router(AppState::new(scraper));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on http://{addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
