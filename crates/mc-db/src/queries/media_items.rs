//! Media item CRUD and filtered listing.

use mc_core::{Error, Genre, MediaId, MediaItem, MediaKind, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::{format_timestamp, MediaRow};

/// Column list used in SELECT statements.
const COLS: &str = "id, title, release_year, kind, genre, rating, watched, created_at, updated_at";

/// Filters the database can evaluate directly. `None` fields do not filter.
///
/// An item without a rating never satisfies `rating_min` or `rating_max`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaFilter {
    pub kind: Option<MediaKind>,
    pub watched: Option<bool>,
    pub genre: Option<Genre>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
}

/// Insert a new item.
pub fn insert_media(conn: &Connection, item: &MediaItem) -> Result<()> {
    conn.execute(
        "INSERT INTO media_items (id, title, release_year, kind, genre, rating, watched,
            created_at, updated_at)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        rusqlite::params![
            item.id().to_string(),
            item.title(),
            item.release_year(),
            item.kind().as_str(),
            item.genre(),
            item.rating(),
            item.watched(),
            format_timestamp(&item.created_at()),
            format_timestamp(&item.updated_at()),
        ],
    )
    .map_err(Error::storage)?;
    Ok(())
}

/// Overwrite every mutable column of an existing item.
///
/// Returns `false` when no row has the item's id.
pub fn update_media(conn: &Connection, item: &MediaItem) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE media_items SET title=?1, release_year=?2, kind=?3, genre=?4,
                rating=?5, watched=?6, updated_at=?7
             WHERE id=?8",
            rusqlite::params![
                item.title(),
                item.release_year(),
                item.kind().as_str(),
                item.genre(),
                item.rating(),
                item.watched(),
                format_timestamp(&item.updated_at()),
                item.id().to_string(),
            ],
        )
        .map_err(Error::storage)?;
    Ok(n > 0)
}

/// Delete an item by ID.
pub fn delete_media(conn: &Connection, id: MediaId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM media_items WHERE id = ?1", [id.to_string()])
        .map_err(Error::storage)?;
    Ok(n > 0)
}

/// Get an item by ID.
pub fn get_media(conn: &Connection, id: MediaId) -> Result<Option<MediaItem>> {
    let q = format!("SELECT {COLS} FROM media_items WHERE id = ?1");
    let row = conn
        .query_row(&q, [id.to_string()], MediaRow::from_row)
        .optional()
        .map_err(Error::storage)?;
    row.map(MediaItem::try_from).transpose()
}

/// Every item whose title equals `title` exactly (case and whitespace included).
pub fn find_by_exact_title(conn: &Connection, title: &str) -> Result<Vec<MediaItem>> {
    let q = format!("SELECT {COLS} FROM media_items WHERE title = ?1 ORDER BY rowid");
    let mut stmt = conn.prepare(&q).map_err(Error::storage)?;
    let rows = stmt
        .query_map([title], MediaRow::from_row)
        .map_err(Error::storage)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::storage)?;
    rows.into_iter().map(MediaItem::try_from).collect()
}

/// Items matching `filter`, in insertion order.
pub fn query_media(conn: &Connection, filter: &MediaFilter) -> Result<Vec<MediaItem>> {
    let mut query = format!("SELECT {COLS} FROM media_items WHERE 1=1");
    let mut params: Vec<(&str, &dyn rusqlite::ToSql)> = Vec::new();

    let kind = filter.kind.map(|k| k.as_str());
    if let Some(ref kind) = kind {
        query.push_str(" AND kind = :kind");
        params.push((":kind", kind));
    }

    if let Some(ref watched) = filter.watched {
        query.push_str(" AND watched = :watched");
        params.push((":watched", watched));
    }

    let genre = filter.genre.map(|g| g.as_str());
    if let Some(ref genre) = genre {
        query.push_str(" AND genre = :genre");
        params.push((":genre", genre));
    }

    if let Some(ref min) = filter.rating_min {
        query.push_str(" AND rating IS NOT NULL AND rating >= :rating_min");
        params.push((":rating_min", min));
    }

    if let Some(ref max) = filter.rating_max {
        query.push_str(" AND rating IS NOT NULL AND rating <= :rating_max");
        params.push((":rating_max", max));
    }

    query.push_str(" ORDER BY rowid");

    let mut stmt = conn.prepare(&query).map_err(Error::storage)?;
    let rows = stmt
        .query_map(&*params, MediaRow::from_row)
        .map_err(Error::storage)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::storage)?;
    rows.into_iter().map(MediaItem::try_from).collect()
}

/// Total number of stored items.
pub fn count_media(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM media_items", [], |row| row.get(0))
        .map_err(Error::storage)
}
