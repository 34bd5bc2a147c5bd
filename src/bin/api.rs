use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use carscout::{
    api,
    app_state::AppState,
    config::{Config, LogFormat},
    engine::ListingEngine,
    fetcher::HttpFetcher,
    middleware::RateLimit,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env());
    match config.log_format() {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }

    let shutdown = CancellationToken::new();
    let fetcher = HttpFetcher::new().context("Failed to build HTTP client")?;
    let engine = ListingEngine::with_cancellation(Arc::new(fetcher), shutdown.clone());

    let app = api::router(AppState::new(engine), RateLimit::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr()))?;
    info!("Listening on http://{}", config.bind_addr());

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown))
    .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on ctrl-c and cancels in-flight extractions.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested, cancelling in-flight extractions");
    shutdown.cancel();
}
