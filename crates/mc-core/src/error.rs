//! Unified error type for the media catalog.
//!
//! Catalog operations report failures as one of a small set of kinds that
//! callers can branch on. [`Error::http_status`] gives the transport layer a
//! status code without it having to know about every variant.

use std::fmt;

/// Every failure the catalog can report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller input was malformed or out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The identification resolved to no entity.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "media").
        entity: String,
        /// The identifier or title that was looked up.
        id: String,
    },

    /// A title lookup matched more than one entity.
    #[error("Ambiguous reference: {matches} media items are titled '{title}'; use the id instead")]
    AmbiguousReference {
        /// The title that was looked up.
        title: String,
        /// How many entities carry that exact title.
        matches: usize,
    },

    /// The storage collaborator failed.
    #[error("Storage error: {source}")]
    Storage {
        /// The underlying storage error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The operation was cancelled before it completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::InvalidArgument(_) => 400,
            Error::NotFound { .. } => 404,
            Error::AmbiguousReference { .. } => 409,
            Error::Storage { .. } => 500,
            // Non-standard "client closed request".
            Error::Cancelled => 499,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Short machine-readable name of the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "invalid_argument",
            Error::NotFound { .. } => "not_found",
            Error::AmbiguousReference { .. } => "ambiguous_reference",
            Error::Storage { .. } => "storage_error",
            Error::Cancelled => "cancelled",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Convenience constructor for [`Error::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::AmbiguousReference`].
    pub fn ambiguous(title: impl Into<String>, matches: usize) -> Self {
        Error::AmbiguousReference {
            title: title.into(),
            matches,
        }
    }

    /// Convenience constructor for [`Error::Storage`].
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Storage {
            source: source.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
