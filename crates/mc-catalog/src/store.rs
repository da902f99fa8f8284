//! Storage interface consumed by the catalog engine.

use async_trait::async_trait;
use mc_core::{Error, MediaId, MediaItem, Result};
use tokio_util::sync::CancellationToken;

use crate::MediaFilter;

/// Durable storage for [`MediaItem`]s.
///
/// Every method takes a cancellation token. Implementations return
/// [`Error::Cancelled`] when the token fires before the call completes and
/// [`Error::Storage`] for their own failures. A write that returns
/// `Cancelled` must not have been applied.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Persist a new item.
    async fn create(&self, item: &MediaItem, cancel: &CancellationToken) -> Result<()>;

    /// Overwrite an existing item. [`Error::NotFound`] if it no longer exists.
    async fn update(&self, item: &MediaItem, cancel: &CancellationToken) -> Result<()>;

    /// Remove an item. Returns whether anything was removed.
    async fn delete(&self, id: MediaId, cancel: &CancellationToken) -> Result<bool>;

    async fn fetch_by_id(
        &self,
        id: MediaId,
        cancel: &CancellationToken,
    ) -> Result<Option<MediaItem>>;

    /// Items whose title equals `title` exactly. May be empty.
    async fn fetch_by_exact_title(
        &self,
        title: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<MediaItem>>;

    /// Items matching `filter`, in insertion order.
    async fn query(
        &self,
        filter: &MediaFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<MediaItem>>;
}

/// Fail with [`Error::Cancelled`] if the token has already fired.
pub fn ensure_active(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    Ok(())
}
