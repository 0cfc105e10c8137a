//! Candidate timeline events.
//!
//! Each candidate carries an append-only log of [`CandidateEvent`]s.
//! Events are immutable once appended. The payload is a closed sum with
//! one struct per kind; persisted JSON carries the kind under `type` and
//! the payload under `payload`:
//!
//! ```json
//! {
//!   "id": "…",
//!   "created_at": "2026-08-06T09:41:07.312Z",
//!   "type": "stage_moved",
//!   "payload": { "from_stage_id": "new", "to_stage_id": "screening", "reason": "…" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::stage::StageId;

/// One entry in a candidate's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEvent {
    pub id: String,
    pub created_at: String,
    #[serde(flatten)]
    pub data: EventData,
}

/// Typed payload for a timeline event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum EventData {
    /// The candidate entered the workspace.
    Created(CreatedData),
    /// The candidate moved between stages. Always carries a reason.
    StageMoved(StageMovedData),
    /// A free-form note.
    Note(NoteData),
}

/// Payload for `created` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Payload for `stage_moved` events.
///
/// `reason` is the audit trail: it is mandatory and non-empty for every
/// recorded move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageMovedData {
    pub from_stage_id: StageId,
    pub to_stage_id: StageId,
    pub reason: String,
}

/// Payload for `note` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteData {
    pub content: String,
}

impl EventData {
    /// The persisted kind tag (`created`, `stage_moved`, `note`).
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::StageMoved(_) => "stage_moved",
            Self::Note(_) => "note",
        }
    }
}

impl CandidateEvent {
    /// Build a `created` event.
    #[must_use]
    pub fn created(id: String, created_at: String, message: Option<String>) -> Self {
        Self {
            id,
            created_at,
            data: EventData::Created(CreatedData { message }),
        }
    }

    /// Build a `stage_moved` event.
    #[must_use]
    pub fn stage_moved(
        id: String,
        created_at: String,
        from_stage_id: StageId,
        to_stage_id: StageId,
        reason: String,
    ) -> Self {
        Self {
            id,
            created_at,
            data: EventData::StageMoved(StageMovedData {
                from_stage_id,
                to_stage_id,
                reason,
            }),
        }
    }

    /// Build a `note` event.
    #[must_use]
    pub fn note(id: String, created_at: String, content: String) -> Self {
        Self {
            id,
            created_at,
            data: EventData::Note(NoteData { content }),
        }
    }
}

impl fmt::Display for CandidateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            EventData::Created(d) => match &d.message {
                Some(message) => write!(f, "created: {message}"),
                None => f.write_str("created"),
            },
            EventData::StageMoved(d) => write!(
                f,
                "moved {} -> {}: {}",
                d.from_stage_id, d.to_stage_id, d.reason
            ),
            EventData::Note(d) => write!(f, "note: {}", d.content),
        }
    }
}
