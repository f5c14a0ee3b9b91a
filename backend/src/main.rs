//! Plex Dedupe - web dashboard entry point
//!
//! Serves the duplicate report pages and the JSON API. Settings and the Plex
//! connection are resolved per request, so nothing here talks to Plex.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plex_dedupe::AppState;
use plex_dedupe::api;
use plex_dedupe::cli::CliOptions;
use plex_dedupe::config::Config;
use plex_dedupe::plex::PlexConnector;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?.with_cli(&CliOptions::from_args());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plex_dedupe=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting Plex Dedupe");
    tracing::info!(
        settings = %config.settings_path.display(),
        timeout_secs = config.plex_timeout.as_secs(),
        "Configuration loaded"
    );
    if !config.settings_path.exists() {
        tracing::warn!(
            settings = %config.settings_path.display(),
            "Settings document not found yet - pages will fail until it exists"
        );
    }

    let port = config.port;
    let host = config.host.clone().unwrap_or_else(|| "localhost".to_string());
    let state = AppState::new(config, PlexConnector);
    let app = api::router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);
    tracing::info!("Dashboard: http://{}:{}/", host, port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
