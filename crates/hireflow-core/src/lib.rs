#![forbid(unsafe_code)]
//! hireflow-core: workspace engine and persistence layer for hiring
//! pipelines.
//!
//! A workspace instance is one simulated pipeline: an ordered stage list,
//! candidates each occupying exactly one stage, and a per-candidate
//! append-only event timeline. The engine keeps the instance's three
//! denormalized views (candidates by id, candidate ids by stage, events by
//! candidate) consistent on every write, persisting whole records through
//! a pluggable key-value [`Store`].
//!
//! # Conventions
//!
//! - **Errors**: typed [`Error`] values propagated with `?`; no panics in
//!   library code.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`); the
//!   crate emits, callers subscribe.

pub mod clock;
pub mod engine;
pub mod error;
pub mod index;
pub mod model;
pub mod store;
pub mod templates;

pub use clock::{Clock, new_id};
pub use engine::{CreateOptions, INSTANCE_KEY_PREFIX, WorkspaceEngine};
pub use error::{Error, Result};
pub use model::{
    Candidate, CandidateEvent, EventData, NewCandidate, Stage, StageId, WorkspaceIndexItem,
    WorkspaceInstance,
};
pub use store::{FsStore, MemoryStore, Store, StoreError};
pub use templates::{WorkspaceTemplate, find_template, templates};
