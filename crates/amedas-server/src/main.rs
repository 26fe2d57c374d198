use std::net::SocketAddr;

use amedas_config::AppConfig;
use amedas_core::AirportCatalog;
use anyhow::{Context, Result};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    // Observability
    amedas_obs::init("amedas-wind");

    // Config
    let cfg = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "config unreadable, using defaults");
            AppConfig::default()
        }
    };
    let http_bind = cfg.http_bind();

    let airports_path = cfg.airports_path();
    let airports = match AirportCatalog::load(&airports_path) {
        Ok(catalog) => {
            tracing::info!(path = %airports_path, airports = catalog.len(), "airport catalog loaded");
            catalog
        }
        Err(e) => {
            tracing::warn!(path = %airports_path, error = %e, "airport catalog unavailable");
            AirportCatalog::default()
        }
    };

    let upstream = amedas_server::Upstream::from_config(&cfg)?;
    tracing::info!(provider = %cfg.provider_base_url(), "AMeDAS provider configured");

    let (app, state) = amedas_server::build_app(upstream, airports);

    let addr: SocketAddr = http_bind
        .parse()
        .with_context(|| format!("invalid HTTP bind address '{http_bind}'"))?;
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;

    // Mark ready just before serving
    amedas_server::set_ready(&state, true);

    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
