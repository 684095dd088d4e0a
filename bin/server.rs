// Cafe Ranker - Web Server
// REST API with Axum in front of the Google Places nearby search

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use cafe_ranker::{router, AppState, Config, GooglePlacesClient, RankingEngine, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Cafe Ranker server v{VERSION}");

    let config = Config::load()?;

    // Loaded once, read-only for the lifetime of the process
    let registry = config.priority_registry()?;
    info!(priority_venues = registry.len(), "Priority registry ready");

    let engine = RankingEngine::new(Arc::new(registry));
    let places = GooglePlacesClient::from_config(&config)?;

    let app = router(AppState::new(engine, places, config.top_n));

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {address}"))?;

    info!("Server running on http://{address}");
    info!("   Top:     /cafes/top5?lat=..&lon=..");
    info!("   Nearest: /cafes/nearest?lat=..&lon=..");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
