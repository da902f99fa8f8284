//! [`CatalogStore`] backed by the mc-db SQLite pool.
//!
//! rusqlite is synchronous, so each call runs on the blocking pool while the
//! async side watches the cancellation token. A call reported as
//! [`Error::Cancelled`] never applied its change: either it was abandoned
//! before its statement started, or the statement was interrupted. A
//! statement that already finished keeps its result.

use std::sync::Arc;

use async_trait::async_trait;
use mc_core::{Error, MediaId, MediaItem, Result};
use mc_db::pool::{self, DbPool};
use mc_db::queries::media_items;
use parking_lot::Mutex;
use rusqlite::{Connection, InterruptHandle};
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::store::{ensure_active, CatalogStore};
use crate::MediaFilter;

/// SQLite-backed catalog storage.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    pool: DbPool,
}

impl SqliteCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run `op` on a pooled connection, giving up on it if `cancel` fires.
    async fn run<T, F>(&self, cancel: &CancellationToken, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        ensure_active(cancel)?;

        let call = Call::default();
        let phase = Arc::clone(&call.0);
        let token = cancel.clone();
        let pool = self.pool.clone();

        let mut task = tokio::task::spawn_blocking(move || {
            let conn = pool::get_conn(&pool)?;
            {
                let mut phase = phase.lock();
                if matches!(*phase, Phase::Abandoned) || token.is_cancelled() {
                    *phase = Phase::Abandoned;
                    return Err(Error::Cancelled);
                }
                *phase = Phase::Running(conn.get_interrupt_handle());
            }

            let out = op(&conn);
            *phase.lock() = Phase::Finished;
            match out {
                Err(_) if token.is_cancelled() => Err(Error::Cancelled),
                out => out,
            }
        });

        tokio::select! {
            joined = &mut task => return flatten(joined),
            _ = cancel.cancelled() => {}
        }

        if call.abandon() {
            tracing::debug!("Storage call cancelled before it started");
            return Err(Error::Cancelled);
        }
        // Interrupted or already done: the task's own result is the truth.
        flatten(task.await)
    }
}

fn flatten<T>(joined: std::result::Result<Result<T>, JoinError>) -> Result<T> {
    joined.map_err(|e| Error::Internal(format!("spawn_blocking join error: {e}")))?
}

enum Phase {
    /// Waiting for a connection.
    Pending,
    Running(InterruptHandle),
    /// The caller stopped waiting before the statement started.
    Abandoned,
    Finished,
}

/// Shared between [`SqliteCatalogStore::run`] and its blocking task. Dropping
/// it (including when the caller drops the future) abandons or interrupts
/// the call.
struct Call(Arc<Mutex<Phase>>);

impl Default for Call {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(Phase::Pending)))
    }
}

impl Call {
    /// Stop the call. Returns true when its statement never ran.
    fn abandon(&self) -> bool {
        let mut phase = self.0.lock();
        match &*phase {
            Phase::Pending | Phase::Abandoned => {
                *phase = Phase::Abandoned;
                true
            }
            Phase::Running(handle) => {
                handle.interrupt();
                false
            }
            Phase::Finished => false,
        }
    }
}

impl Drop for Call {
    fn drop(&mut self) {
        self.abandon();
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn create(&self, item: &MediaItem, cancel: &CancellationToken) -> Result<()> {
        let item = item.clone();
        self.run(cancel, move |conn| media_items::insert_media(conn, &item))
            .await
    }

    async fn update(&self, item: &MediaItem, cancel: &CancellationToken) -> Result<()> {
        let item = item.clone();
        self.run(cancel, move |conn| {
            if media_items::update_media(conn, &item)? {
                Ok(())
            } else {
                Err(Error::not_found("media", item.id()))
            }
        })
        .await
    }

    async fn delete(&self, id: MediaId, cancel: &CancellationToken) -> Result<bool> {
        self.run(cancel, move |conn| media_items::delete_media(conn, id))
            .await
    }

    async fn fetch_by_id(
        &self,
        id: MediaId,
        cancel: &CancellationToken,
    ) -> Result<Option<MediaItem>> {
        self.run(cancel, move |conn| media_items::get_media(conn, id))
            .await
    }

    async fn fetch_by_exact_title(
        &self,
        title: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<MediaItem>> {
        let title = title.to_string();
        self.run(cancel, move |conn| {
            media_items::find_by_exact_title(conn, &title)
        })
        .await
    }

    async fn query(
        &self,
        filter: &MediaFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<MediaItem>> {
        let filter = filter.clone();
        self.run(cancel, move |conn| media_items::query_media(conn, &filter))
            .await
    }
}
