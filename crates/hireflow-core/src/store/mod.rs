//! Key-value store adapter — the engine's sole I/O boundary.
//!
//! The engine persists whole JSON documents under string keys and never
//! touches the filesystem directly. Two implementations ship:
//!
//! - [`FsStore`]: one file per key under a root directory, durable across
//!   restarts.
//! - [`MemoryStore`]: a `BTreeMap`, for tests and throwaway sessions.
//!
//! There is no transactional guarantee across keys — each key is written
//! independently, so a crash between two related writes (instance + index)
//! can leave them inconsistent. That is an accepted limitation of the
//! design, not something an implementation should try to mask.

pub mod fs;
pub mod memory;

pub use fs::FsStore;
pub use memory::MemoryStore;

use std::io;

/// Errors surfaced by store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying I/O failure.
    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),

    /// The key contains characters the store cannot map to its medium.
    #[error("invalid store key {0:?}: only [A-Za-z0-9_.-] is allowed")]
    InvalidKey(String),
}

/// Durable string-keyed storage.
///
/// Reads of a key never written (or since removed) return `Ok(None)`.
/// `list_keys` enumerates every key currently present, in unspecified
/// order.
pub trait Store {
    /// Read the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Every key currently present in the store.
    fn list_keys(&self) -> Result<Vec<String>, StoreError>;
}
