//! mc-core: shared types, IDs, errors, and configuration for the catalog.
//!
//! This crate is the foundational dependency for all other mc-* crates. It
//! owns the [`MediaItem`] entity, whose constructor and mutators are the only
//! places the catalog's field invariants are enforced.

pub mod config;
pub mod error;
pub mod ids;
pub mod media;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
pub use media::*;
