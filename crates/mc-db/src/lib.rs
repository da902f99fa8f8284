//! mc-db: SQLite persistence for the media catalog.
//!
//! Connection pooling, embedded migrations, the row model, and the
//! `media_items` queries.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
