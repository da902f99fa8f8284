//! Catalog operations: add, list, get, rate, update and mark watched.

use std::sync::Arc;

use mc_core::{validate_title, Error, MediaId, MediaItem, MediaKind, NewMedia, Result};
use tokio_util::sync::CancellationToken;

use crate::query::{self, ListCriteria};
use crate::resolver::{resolve, MediaRef};
use crate::store::{ensure_active, CatalogStore};

/// New values for an item's title, release year, kind and genre.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpdate {
    pub title: String,
    pub release_year: i32,
    pub kind: MediaKind,
    pub genre: Option<String>,
}

/// Entry point for every catalog operation.
///
/// Holds no state besides the store, so it is cheap to clone and safe to
/// share across tasks.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn CatalogStore>,
}

impl Catalog {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a new item.
    ///
    /// A blank title is rejected before anything is constructed or stored.
    pub async fn add_media(&self, draft: NewMedia, cancel: &CancellationToken) -> Result<MediaItem> {
        validate_title(&draft.title)?;
        ensure_active(cancel)?;

        let item = MediaItem::new(draft)?;
        self.store.create(&item, cancel).await?;

        tracing::info!(id = %item.id(), title = item.title(), "Added media");
        Ok(item)
    }

    /// Filtered, sorted, paginated listing.
    pub async fn list_media(
        &self,
        criteria: &ListCriteria,
        cancel: &CancellationToken,
    ) -> Result<Vec<MediaItem>> {
        query::list(self.store.as_ref(), criteria, cancel).await
    }

    pub async fn get_media(&self, id: MediaId, cancel: &CancellationToken) -> Result<MediaItem> {
        ensure_active(cancel)?;
        self.store
            .fetch_by_id(id, cancel)
            .await?
            .ok_or_else(|| Error::not_found("media", id))
    }

    /// Set the rating of the item `target` resolves to.
    pub async fn rate_media(
        &self,
        target: &MediaRef,
        rating: f64,
        cancel: &CancellationToken,
    ) -> Result<MediaItem> {
        let item = self
            .mutate(target, cancel, |item| item.set_rating(rating))
            .await?;
        tracing::info!(id = %item.id(), rating, "Rated media");
        Ok(item)
    }

    /// Replace the basic fields of the item `target` resolves to.
    pub async fn update_media(
        &self,
        target: &MediaRef,
        changes: MediaUpdate,
        cancel: &CancellationToken,
    ) -> Result<MediaItem> {
        let item = self
            .mutate(target, cancel, move |item| {
                item.update_basic_fields(
                    changes.title,
                    changes.release_year,
                    changes.kind,
                    changes.genre,
                )
            })
            .await?;
        tracing::info!(id = %item.id(), title = item.title(), "Updated media");
        Ok(item)
    }

    pub async fn mark_watched(
        &self,
        target: &MediaRef,
        cancel: &CancellationToken,
    ) -> Result<MediaItem> {
        let item = self
            .mutate(target, cancel, |item| {
                item.mark_watched();
                Ok(())
            })
            .await?;
        tracing::info!(id = %item.id(), "Marked media watched");
        Ok(item)
    }

    /// Resolve, apply `change`, persist.
    async fn mutate<F>(
        &self,
        target: &MediaRef,
        cancel: &CancellationToken,
        change: F,
    ) -> Result<MediaItem>
    where
        F: FnOnce(&mut MediaItem) -> Result<()>,
    {
        if !target.is_specified() {
            return Err(Error::invalid("either an id or a title is required"));
        }
        ensure_active(cancel)?;

        let mut item = resolve(self.store.as_ref(), target, cancel).await?;
        change(&mut item)?;
        self.store.update(&item, cancel).await?;
        Ok(item)
    }
}
