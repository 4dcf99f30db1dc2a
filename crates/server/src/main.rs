mod api;
mod metrics;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oalens_core::cache::{CacheLayer, SqliteStore};
use oalens_core::catalog::OpenAlexClient;
use oalens_core::resolver::DoiResolver;
use oalens_core::status::UnpaywallClient;
use oalens_core::{load_config, NoopRenderer, Pipeline};

use api::create_router;
use state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("OALENS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    info!("Cache path: {:?}", config.cache.path);
    info!("Contact email: {}", config.lookup.contact_email);

    // Persistent key-value store behind both cache namespaces
    let store = Arc::new(
        SqliteStore::new(&config.cache.path).context("Failed to open cache database")?,
    );
    let cache = CacheLayer::new(store);
    info!("Cache store initialized");

    let timeout = Duration::from_secs(config.lookup.timeout_secs);

    let catalog = Arc::new(
        OpenAlexClient::new(config.lookup.catalog_base_url.clone(), timeout)
            .context("Failed to create works catalog client")?,
    );
    let status = Arc::new(
        UnpaywallClient::new(config.lookup.status_base_url.clone(), timeout)
            .context("Failed to create OA status client")?,
    );

    let resolver = DoiResolver::new(catalog, cache.clone(), config.lookup.min_match_score);
    let pipeline = Pipeline::new(
        resolver,
        status,
        cache.clone(),
        config.pipeline_settings(),
        Arc::new(NoopRenderer),
    )
    .with_batch_size(config.lookup.batch_size);
    info!("Pipeline initialized");

    let state = Arc::new(AppState::new(config.clone(), Arc::new(pipeline), cache));
    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
