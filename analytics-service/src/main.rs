use std::net::SocketAddr;

use anyhow::Result;
use analytics_service::{
    config::AppConfig,
    http::{self, AppState},
    metrics_server, observability, store,
};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let store = store::from_config(&cfg).await?;
    let state = AppState::from_config(store, &cfg)?;

    let addr: SocketAddr = cfg
        .http
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid http.bind_addr: {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, owner_header = %cfg.http.owner_header, "analytics API listening");

    axum::serve(listener, http::router(state).into_make_service()).await?;

    Ok(())
}
