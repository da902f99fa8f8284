//! Shared state handed to every route handler via Axum state.

use std::sync::Arc;

use mc_catalog::Catalog;
use mc_core::config::Config;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Catalog,
    pub config: Arc<Config>,
    /// Fires when the server begins shutting down.
    pub shutdown: CancellationToken,
}

impl AppContext {
    pub fn new(catalog: Catalog, config: Config, shutdown: CancellationToken) -> Self {
        Self {
            catalog,
            config: Arc::new(config),
            shutdown,
        }
    }

    /// Token for one request's catalog calls; cancelled on server shutdown.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
