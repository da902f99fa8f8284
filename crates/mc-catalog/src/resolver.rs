//! Resolve a mutation target given by id or by title.

use mc_core::{Error, MediaId, MediaItem, Result};
use tokio_util::sync::CancellationToken;

use crate::store::CatalogStore;

/// How a caller identifies the item to act on. An id always wins over a title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaRef {
    pub id: Option<MediaId>,
    pub title: Option<String>,
}

impl MediaRef {
    pub fn by_id(id: MediaId) -> Self {
        Self {
            id: Some(id),
            title: None,
        }
    }

    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
        }
    }

    /// The title, unless it is absent or blank.
    fn usable_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Whether this reference names anything at all.
    pub fn is_specified(&self) -> bool {
        self.id.is_some() || self.usable_title().is_some()
    }
}

/// Turn `target` into exactly one stored item.
///
/// Title matching is exact. Zero matches is [`Error::NotFound`]; more than
/// one is [`Error::AmbiguousReference`], never an arbitrary pick.
pub async fn resolve(
    store: &dyn CatalogStore,
    target: &MediaRef,
    cancel: &CancellationToken,
) -> Result<MediaItem> {
    if let Some(id) = target.id {
        return store
            .fetch_by_id(id, cancel)
            .await?
            .ok_or_else(|| Error::not_found("media", id));
    }

    let Some(title) = target.usable_title() else {
        return Err(Error::invalid("either an id or a title is required"));
    };

    let mut matches = store.fetch_by_exact_title(title, cancel).await?;
    match matches.len() {
        0 => Err(Error::not_found("media", title)),
        1 => Ok(matches.remove(0)),
        n => {
            tracing::debug!(title, matches = n, "Title lookup is ambiguous");
            Err(Error::ambiguous(title, n))
        }
    }
}
