//! # HTTP Server
//!
//! Combines the sales routes, the static front-end mount, CORS and request tracing.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::config::HttpServerConfig;
use super::routes::{AppState, sales_routes};
use crate::session::SessionProvider;

/// Build the full router around a session provider.
pub fn build_router(config: &HttpServerConfig, sessions: Arc<dyn SessionProvider>) -> Router {
    let state = AppState::new(sessions, config.entry_page());

    // No authentication exists at this layer: any origin, method and header, with
    // credentials, is allowed.
    let cors = CorsLayer::very_permissive();

    sales_routes()
        .nest_service(&config.static_prefix, ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind, serve until Ctrl-C, then release the session provider.
///
/// # Errors
/// Returns an I/O error if the static directory cannot be created or the address cannot be
/// bound.
pub async fn serve(
    config: HttpServerConfig,
    sessions: Arc<dyn SessionProvider>,
) -> Result<(), std::io::Error> {
    prepare_static_dir(&config.static_dir).await?;

    let router = build_router(&config, sessions.clone());
    let listener = TcpListener::bind(&config.bind).await?;

    tracing::info!("Northwind sales API listening on {}", listener.local_addr()?);
    tracing::info!(
        "front-end served from {} at {}",
        config.static_dir.display(),
        config.static_prefix
    );

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    sessions.close();
    tracing::info!("connection pool closed");
    result
}

/// Create the front-end directory (and parents) if it does not exist yet.
pub(crate) async fn prepare_static_dir(dir: &Path) -> Result<(), std::io::Error> {
    if !tokio::fs::try_exists(dir).await? {
        tracing::info!("creating static directory {}", dir.display());
    }
    tokio::fs::create_dir_all(dir).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
