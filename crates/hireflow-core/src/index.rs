//! The workspace index — the summary list behind a "my workspaces" view.
//!
//! Persisted as one JSON array under [`INDEX_KEY`]; every mutation
//! rewrites the whole collection. The list transforms here are pure and
//! storage-free; the engine owns loading and saving. Ordering contract:
//! most-recently-upserted first, with in-place replacement keeping an
//! existing entry's position.

use crate::model::workspace::WorkspaceIndexItem;

/// The single store key holding the serialized index.
pub const INDEX_KEY: &str = "hps_instances_index";

/// Insert or replace `item`, deduplicating by id.
///
/// An existing entry with the same id is replaced in place (position
/// unchanged); otherwise the item is prepended.
pub fn upsert(items: &mut Vec<WorkspaceIndexItem>, item: WorkspaceIndexItem) {
    match items.iter_mut().find(|existing| existing.id == item.id) {
        Some(existing) => *existing = item,
        None => items.insert(0, item),
    }
}

/// Drop the entry with `id`, if present. Absent ids are not an error.
pub fn remove(items: &mut Vec<WorkspaceIndexItem>, id: &str) {
    items.retain(|item| item.id != id);
}
