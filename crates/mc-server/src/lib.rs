//! mc-server: HTTP API for the media catalog.
//!
//! Axum routes over [`mc_catalog::Catalog`], JSON error mapping, request ids,
//! an OpenAPI document, and graceful shutdown via signal handling.

pub mod context;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod router;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use mc_catalog::{Catalog, SqliteCatalogStore};
use mc_core::config::Config;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;

/// Start the catalog server.
///
/// Opens the database named in `config`, binds the HTTP listener, and serves
/// until a shutdown signal arrives. In-flight storage calls are cancelled on
/// shutdown.
pub async fn start(config: Config) -> mc_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let db_path = &config.database.path;
    let existed = db_path.exists();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::info!("Created database directory {}", parent.display());
        }
    }
    let db_str = db_path.to_string_lossy();
    let pool = mc_db::pool::init_pool(&db_str, config.database.effective_pool_size())?;
    if existed {
        tracing::info!("Database opened (existing) at {db_str}");
    } else {
        tracing::info!("Database created (new) at {db_str}");
    }

    let catalog = Catalog::new(Arc::new(SqliteCatalogStore::new(pool)));
    let shutdown = CancellationToken::new();
    let ctx = AppContext::new(catalog, config.clone(), shutdown.clone());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| mc_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let app = router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| mc_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM, then cancel `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }

    shutdown.cancel();
}
