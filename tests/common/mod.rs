//! Shared test harness for integration tests.
//!
//! [`TestHarness`] wires an in-memory database into a full [`AppContext`].
//! [`TestHarness::with_server`] starts Axum on a random port for HTTP-level
//! testing.

use std::net::SocketAddr;
use std::sync::Arc;

use mc_catalog::{Catalog, SqliteCatalogStore};
use mc_core::config::Config;
use mc_core::{MediaItem, MediaKind, NewMedia};
use mc_db::pool::{init_memory_pool, DbPool};
use mc_server::context::AppContext;
use mc_server::router::build_router;
use tokio_util::sync::CancellationToken;

pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
}

impl TestHarness {
    pub fn new() -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let catalog = Catalog::new(Arc::new(SqliteCatalogStore::new(db.clone())));
        let ctx = AppContext::new(catalog, Config::default(), CancellationToken::new());
        Self { ctx, db }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Insert a movie straight through the catalog.
    pub async fn add_movie(&self, title: &str, year: i32) -> MediaItem {
        let draft = NewMedia {
            title: title.into(),
            release_year: year,
            kind: MediaKind::Movie,
            genre: None,
            rating: None,
            watched: false,
        };
        self.ctx
            .catalog
            .add_media(draft, &CancellationToken::new())
            .await
            .expect("failed to add movie")
    }
}
