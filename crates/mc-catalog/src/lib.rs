//! mc-catalog: the catalog query-and-mutation engine.
//!
//! - [`store`]: the [`CatalogStore`] interface the engine persists through
//! - [`sqlite`]: a cancellable [`CatalogStore`] over the mc-db pool
//! - [`resolver`]: id-or-title lookup with explicit ambiguity handling
//! - [`query`]: the filter, sort and paginate listing pipeline
//! - [`catalog`]: the add, rate, update and watched operations

pub mod catalog;
pub mod query;
pub mod resolver;
pub mod sqlite;
pub mod store;

#[cfg(test)]
mod testing;

pub use catalog::{Catalog, MediaUpdate};
pub use mc_db::queries::media_items::MediaFilter;
pub use query::{ListCriteria, SortKey, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use resolver::MediaRef;
pub use sqlite::SqliteCatalogStore;
pub use store::CatalogStore;
