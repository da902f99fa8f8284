//! In-memory [`CatalogStore`] that records which methods were called.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use mc_core::{Error, MediaId, MediaItem, MediaKind, MediaParts, NewMedia, Result};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::store::{ensure_active, CatalogStore};
use crate::MediaFilter;

#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<Vec<MediaItem>>,
    calls: Mutex<Vec<&'static str>>,
    vanish_on_update: Mutex<bool>,
}

impl MemoryStore {
    pub fn with_items(items: Vec<MediaItem>) -> Self {
        Self {
            items: Mutex::new(items),
            calls: Mutex::new(Vec::new()),
            vanish_on_update: Mutex::new(false),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn items(&self) -> Vec<MediaItem> {
        self.items.lock().clone()
    }

    /// Make the next `update` find its item already deleted, as if another
    /// caller removed it after the lookup.
    pub fn vanish_on_next_update(&self) {
        *self.vanish_on_update.lock() = true;
    }

    fn record(&self, call: &'static str, cancel: &CancellationToken) -> Result<()> {
        self.calls.lock().push(call);
        ensure_active(cancel)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn create(&self, item: &MediaItem, cancel: &CancellationToken) -> Result<()> {
        self.record("create", cancel)?;
        self.items.lock().push(item.clone());
        Ok(())
    }

    async fn update(&self, item: &MediaItem, cancel: &CancellationToken) -> Result<()> {
        self.record("update", cancel)?;
        let mut items = self.items.lock();
        if std::mem::take(&mut *self.vanish_on_update.lock()) {
            items.retain(|i| i.id() != item.id());
        }
        let slot = items
            .iter_mut()
            .find(|i| i.id() == item.id())
            .ok_or_else(|| Error::not_found("media", item.id()))?;
        *slot = item.clone();
        Ok(())
    }

    async fn delete(&self, id: MediaId, cancel: &CancellationToken) -> Result<bool> {
        self.record("delete", cancel)?;
        let mut items = self.items.lock();
        let before = items.len();
        items.retain(|i| i.id() != id);
        Ok(items.len() != before)
    }

    async fn fetch_by_id(
        &self,
        id: MediaId,
        cancel: &CancellationToken,
    ) -> Result<Option<MediaItem>> {
        self.record("fetch_by_id", cancel)?;
        Ok(self.items.lock().iter().find(|i| i.id() == id).cloned())
    }

    async fn fetch_by_exact_title(
        &self,
        title: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<MediaItem>> {
        self.record("fetch_by_exact_title", cancel)?;
        Ok(self
            .items
            .lock()
            .iter()
            .filter(|i| i.title() == title)
            .cloned()
            .collect())
    }

    async fn query(
        &self,
        filter: &MediaFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<MediaItem>> {
        self.record("query", cancel)?;
        Ok(self
            .items
            .lock()
            .iter()
            .filter(|i| filter.kind.map_or(true, |k| i.kind() == k))
            .filter(|i| filter.watched.map_or(true, |w| i.watched() == w))
            .filter(|i| filter.genre.map_or(true, |g| i.genre() == Some(g.as_str())))
            .filter(|i| {
                filter
                    .rating_min
                    .map_or(true, |min| i.rating().is_some_and(|r| r >= min))
            })
            .filter(|i| {
                filter
                    .rating_max
                    .map_or(true, |max| i.rating().is_some_and(|r| r <= max))
            })
            .cloned()
            .collect())
    }
}

/// A valid movie with the given title and release year.
pub fn movie(title: &str, year: i32) -> MediaItem {
    MediaItem::new(NewMedia {
        title: title.into(),
        release_year: year,
        kind: MediaKind::Movie,
        genre: None,
        rating: None,
        watched: false,
    })
    .unwrap()
}

/// A valid movie with a rating.
pub fn rated(title: &str, rating: f64) -> MediaItem {
    let mut item = movie(title, 2000);
    item.set_rating(rating).unwrap();
    item
}

/// A movie whose creation time is `minute` minutes past a fixed instant.
pub fn created_at_minute(title: &str, minute: i64) -> MediaItem {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minute);
    MediaItem::restore(MediaParts {
        id: MediaId::new(),
        title: title.into(),
        release_year: 2000,
        kind: MediaKind::Movie,
        genre: None,
        rating: None,
        watched: false,
        created_at: at,
        updated_at: at,
    })
    .unwrap()
}
