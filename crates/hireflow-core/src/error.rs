//! Crate-wide error taxonomy.
//!
//! Domain operations fail in exactly two recoverable ways: a referenced
//! template/workspace/candidate does not exist ([`Error::NotFound`]), or a
//! required text field is empty after trimming ([`Error::Validation`]).
//! Both are synchronous and non-retryable — the caller corrects its input
//! and repeats the whole call. [`Error::Store`] is the ambient I/O surface
//! of a file-backed store; the in-memory store never produces it.
//!
//! A failing operation leaves persisted state untouched: every lookup and
//! validation completes before the single persist call runs.

use crate::store::StoreError;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by the workspace engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced entity does not exist.
    #[error("{what} not found: {id}")]
    NotFound {
        /// What kind of entity was looked up (`"template"`, `"workspace"`,
        /// `"candidate"`).
        what: &'static str,
        /// The id that failed to resolve.
        id: String,
    },

    /// A required input was missing or empty after trimming.
    #[error("{0}")]
    Validation(String),

    /// The underlying store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A record could not be serialized for persistence.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl Error {
    /// Build a [`Error::NotFound`] for the given entity kind and id.
    pub fn not_found(what: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            id: id.into(),
        }
    }

    /// Build a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True when this is a [`Error::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when this is a [`Error::Validation`].
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
