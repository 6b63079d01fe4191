//! HTTP server module
//!
//! Provides the Axum-based HTTP server for serving metrics and readiness.

pub mod handlers;

use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::collector::{JolokiaClient, RegistrySource};
use crate::config::Config;
use crate::transformer::{AttributeValueStore, TranslationEngine};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Where each pass reads its MBeans from
    pub source: Arc<RegistrySource>,
    /// Metric translation engine, owning the attribute value store
    pub engine: Arc<TranslationEngine>,
}

impl AppState {
    /// State reading MBeans from `source`
    pub fn new(config: Config, source: RegistrySource) -> Self {
        let store = Arc::new(AttributeValueStore::new());
        let engine = TranslationEngine::new(config.exporter.engine_settings(), store);

        Self {
            config: Arc::new(config),
            source: Arc::new(source),
            engine: Arc::new(engine),
        }
    }

    /// State reading MBeans from the configured Jolokia agent
    pub fn from_config(config: Config) -> Result<Self> {
        let mut client = JolokiaClient::new(&config.jolokia.url, config.jolokia.timeout_ms)?;
        if let (Some(ref username), Some(ref password)) =
            (&config.jolokia.username, &config.jolokia.password)
        {
            client = client.with_auth(username, password);
        }

        Ok(Self::new(config, RegistrySource::Jolokia(client)))
    }
}

/// Build the router
///
/// Metrics are served on `/` and the configured metrics path, readiness on
/// the configured ready path and process liveness on `/health`.
pub fn router(state: AppState) -> Router {
    let metrics_path = state.config.server.metrics_path.clone();
    let ready_path = state.config.server.ready_path.clone();

    Router::new()
        .route("/", get(handlers::metrics))
        .route("/health", get(handlers::health))
        .route(&metrics_path, get(handlers::metrics))
        .route(&ready_path, get(handlers::ready))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

/// Run the HTTP server
///
/// # Arguments
/// * `config` - Validated application configuration
///
/// # Errors
/// Returns an error if the server fails to start
pub async fn run(config: Config) -> Result<()> {
    let addr = config.listen_address()?;
    let state = AppState::from_config(config)?;

    info!(
        address = %addr,
        metrics_path = %state.config.server.metrics_path,
        ready_path = %state.config.server.ready_path,
        jolokia = %state.config.jolokia.url,
        "Server listening"
    );

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
