//! The listing pipeline.
//!
//! A listing runs five phases in a fixed order:
//!
//! 1. normalize the page number and page size;
//! 2. fetch with the filters the store can evaluate ([`MediaFilter`]);
//! 3. refine in memory by title search and release-year range;
//! 4. sort, stably, by the requested key;
//! 5. cut out the requested page.
//!
//! The whole refined set is sorted before paging, so a page is always a
//! slice of the complete ordering.

use std::cmp::Ordering;

use mc_core::{Genre, MediaItem, MediaKind, Result};
use tokio_util::sync::CancellationToken;

use crate::store::{ensure_active, CatalogStore};
use crate::MediaFilter;

/// Page size used when the caller asks for less than one item per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page a caller can get.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Caller-supplied listing parameters.
///
/// `page` and `page_size` are signed so out-of-range input can be coerced
/// instead of rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ListCriteria {
    pub search: Option<String>,
    pub kind: Option<MediaKind>,
    pub genre: Option<Genre>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    pub watched: Option<bool>,
    pub page: i64,
    pub page_size: i64,
    pub sort_by: Option<String>,
    pub ascending: bool,
}

impl Default for ListCriteria {
    fn default() -> Self {
        Self {
            search: None,
            kind: None,
            genre: None,
            year_from: None,
            year_to: None,
            rating_min: None,
            rating_max: None,
            watched: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            ascending: true,
        }
    }
}

impl ListCriteria {
    /// The part of the criteria pushed down to the store.
    pub fn store_filter(&self) -> MediaFilter {
        MediaFilter {
            kind: self.kind,
            watched: self.watched,
            genre: self.genre,
            rating_min: self.rating_min,
            rating_max: self.rating_max,
        }
    }
}

/// Sortable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Title,
    ReleaseYear,
    Rating,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortKey {
    /// Parse a key name. Case, surrounding whitespace and underscores are
    /// ignored, so `releaseYear`, `RELEASEYEAR` and `release_year` agree.
    pub fn from_name(name: &str) -> Option<Self> {
        let folded: String = name
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match folded.as_str() {
            "title" => Some(Self::Title),
            "releaseyear" => Some(Self::ReleaseYear),
            "rating" => Some(Self::Rating),
            "createdat" => Some(Self::CreatedAt),
            "updatedat" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    /// The key to sort by. Absent and unrecognized names both fall back to
    /// [`SortKey::CreatedAt`].
    pub fn resolve(name: Option<&str>) -> Self {
        match name {
            None => Self::default(),
            Some(n) => Self::from_name(n).unwrap_or_else(|| {
                tracing::debug!(sort_by = n, "Unrecognized sort key; using createdAt");
                Self::default()
            }),
        }
    }

    fn compare(self, a: &MediaItem, b: &MediaItem) -> Ordering {
        match self {
            Self::Title => a.title().cmp(b.title()),
            Self::ReleaseYear => a.release_year().cmp(&b.release_year()),
            // Unrated sorts as 0.
            Self::Rating => a
                .rating()
                .unwrap_or(0.0)
                .total_cmp(&b.rating().unwrap_or(0.0)),
            Self::CreatedAt => a.created_at().cmp(&b.created_at()),
            Self::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
        }
    }
}

/// Coerce page below 1 to 1, and page size into `1..=100` (below 1 means 10).
pub fn normalize_paging(page: i64, page_size: i64) -> (i64, i64) {
    let page = page.max(1);
    let page_size = if page_size < 1 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size.min(MAX_PAGE_SIZE)
    };
    (page, page_size)
}

/// Drop items failing the title search or the release-year range.
pub fn refine(items: Vec<MediaItem>, criteria: &ListCriteria) -> Vec<MediaItem> {
    let needle = criteria
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    items
        .into_iter()
        .filter(|item| match &needle {
            Some(n) => item.title().to_lowercase().contains(n.as_str()),
            None => true,
        })
        .filter(|item| criteria.year_from.map_or(true, |y| item.release_year() >= y))
        .filter(|item| criteria.year_to.map_or(true, |y| item.release_year() <= y))
        .collect()
}

/// Stable sort. Equal items keep their relative order in both directions.
pub fn sort_items(items: &mut [MediaItem], key: SortKey, ascending: bool) {
    if ascending {
        items.sort_by(|a, b| key.compare(a, b));
    } else {
        items.sort_by(|a, b| key.compare(b, a));
    }
}

/// The `page`-th slice of `page_size` items, counting from 1. Empty past the end.
pub fn paginate(items: Vec<MediaItem>, page: i64, page_size: i64) -> Vec<MediaItem> {
    let skip = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
    let take = usize::try_from(page_size).unwrap_or(0);
    items.into_iter().skip(skip).take(take).collect()
}

/// Run the full pipeline against `store`.
pub async fn list(
    store: &dyn CatalogStore,
    criteria: &ListCriteria,
    cancel: &CancellationToken,
) -> Result<Vec<MediaItem>> {
    let (page, page_size) = normalize_paging(criteria.page, criteria.page_size);

    ensure_active(cancel)?;
    let fetched = store.query(&criteria.store_filter(), cancel).await?;

    ensure_active(cancel)?;
    let fetched_count = fetched.len();
    let mut items = refine(fetched, criteria);

    let key = SortKey::resolve(criteria.sort_by.as_deref());
    sort_items(&mut items, key, criteria.ascending);

    let matched = items.len();
    let page_items = paginate(items, page, page_size);

    tracing::debug!(
        fetched = fetched_count,
        matched,
        returned = page_items.len(),
        page,
        page_size,
        sort = ?key,
        ascending = criteria.ascending,
        "Listed media"
    );

    Ok(page_items)
}
