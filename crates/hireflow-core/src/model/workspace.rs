//! The workspace aggregate and its denormalized views.
//!
//! A [`WorkspaceInstance`] keeps three views of the same candidate set:
//! `candidates_by_id`, `candidate_ids_by_stage`, and
//! `events_by_candidate_id`. Every mutator here updates all views in one
//! in-memory transform, so the engine can persist the whole record with a
//! single store write and the views can never drift apart between writes.
//! [`WorkspaceInstance::check_consistency`] states the invariant the
//! property tests lean on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::candidate::Candidate;
use super::event::CandidateEvent;
use super::stage::{Stage, StageId};

/// Summary of a workspace, the row a "my workspaces" listing renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceIndexItem {
    pub id: String,
    pub name: String,
    pub created_at: String,
    #[serde(default)]
    pub source_template_id: Option<String>,
}

/// One hiring pipeline: stages, candidates, and per-candidate timelines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceInstance {
    pub id: String,
    pub name: String,
    pub created_at: String,
    /// `Some` for template-derived workspaces, `None` for user-authored
    /// ones. Governs listing and cleanup policy.
    #[serde(default)]
    pub source_template_id: Option<String>,
    /// Stage list in board order.
    pub stages: Vec<Stage>,
    #[serde(default)]
    pub candidates_by_id: BTreeMap<String, Candidate>,
    /// Candidate ids per stage, most-recent-first. All eight buckets are
    /// always materialized, empty ones included.
    #[serde(default = "empty_stage_buckets")]
    pub candidate_ids_by_stage: BTreeMap<StageId, Vec<String>>,
    /// Per-candidate event log, insertion order.
    #[serde(default)]
    pub events_by_candidate_id: BTreeMap<String, Vec<CandidateEvent>>,
}

impl WorkspaceInstance {
    /// Build an empty workspace with every stage bucket materialized.
    #[must_use]
    pub fn new(
        id: String,
        name: String,
        created_at: String,
        source_template_id: Option<String>,
        stages: Vec<Stage>,
    ) -> Self {
        Self {
            id,
            name,
            created_at,
            source_template_id,
            stages,
            candidates_by_id: BTreeMap::new(),
            candidate_ids_by_stage: empty_stage_buckets(),
            events_by_candidate_id: BTreeMap::new(),
        }
    }

    /// The index row for this workspace.
    #[must_use]
    pub fn index_item(&self) -> WorkspaceIndexItem {
        WorkspaceIndexItem {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at.clone(),
            source_template_id: self.source_template_id.clone(),
        }
    }

    /// Look up a candidate by id.
    #[must_use]
    pub fn candidate(&self, candidate_id: &str) -> Option<&Candidate> {
        self.candidates_by_id.get(candidate_id)
    }

    /// Candidates in one stage, bucket (most-recent-first) order.
    #[must_use]
    pub fn stage_candidates(&self, stage_id: StageId) -> Vec<&Candidate> {
        self.candidate_ids_by_stage
            .get(&stage_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.candidates_by_id.get(id))
            .collect()
    }

    /// Insert a candidate and its `created` event, updating all views.
    ///
    /// The id is prepended to its stage bucket — stage buckets hold the
    /// most recently added candidate first.
    pub fn insert_candidate(&mut self, candidate: Candidate, created: CandidateEvent) {
        let id = candidate.id.clone();
        let stage_id = candidate.stage_id;

        self.candidate_ids_by_stage
            .entry(stage_id)
            .or_default()
            .insert(0, id.clone());
        self.candidates_by_id.insert(id.clone(), candidate);
        self.events_by_candidate_id.insert(id, vec![created]);
    }

    /// Move a candidate to another stage bucket and update its `stage_id`.
    ///
    /// Does not touch the timeline; callers append the `stage_moved` event
    /// via [`WorkspaceInstance::append_event`]. Returns the stage the
    /// candidate came from, or `None` when the candidate is unknown (in
    /// which case nothing changes).
    pub fn reassign_stage(&mut self, candidate_id: &str, to_stage_id: StageId) -> Option<StageId> {
        let candidate = self.candidates_by_id.get_mut(candidate_id)?;
        let from_stage_id = candidate.stage_id;
        candidate.stage_id = to_stage_id;

        if let Some(bucket) = self.candidate_ids_by_stage.get_mut(&from_stage_id) {
            bucket.retain(|id| id != candidate_id);
        }
        self.candidate_ids_by_stage
            .entry(to_stage_id)
            .or_default()
            .insert(0, candidate_id.to_string());

        Some(from_stage_id)
    }

    /// Append an event to a candidate's timeline.
    pub fn append_event(&mut self, candidate_id: &str, event: CandidateEvent) {
        self.events_by_candidate_id
            .entry(candidate_id.to_string())
            .or_default()
            .push(event);
    }

    /// A candidate's timeline sorted newest-first by `created_at`.
    ///
    /// Equal stamps sort reverse-insertion (reverse, then stable sort
    /// descending): with creation timestamps ties only happen within one
    /// millisecond, where reverse-insertion is still reverse-chronological.
    /// Unknown candidates yield the empty vec.
    #[must_use]
    pub fn sorted_timeline(&self, candidate_id: &str) -> Vec<CandidateEvent> {
        let Some(events) = self.events_by_candidate_id.get(candidate_id) else {
            return Vec::new();
        };
        let mut sorted: Vec<CandidateEvent> = events.iter().rev().cloned().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted
    }

    /// Verify the three views agree; returns a description of the first
    /// violation found.
    ///
    /// Checked invariants:
    /// - every bucket id resolves to a candidate whose `stage_id` is that
    ///   bucket's stage;
    /// - every candidate appears in exactly one bucket;
    /// - every candidate's `stage_id` names a stage in `stages`;
    /// - every candidate has a timeline entry.
    pub fn check_consistency(&self) -> Result<(), String> {
        let mut bucket_counts: BTreeMap<&str, usize> = BTreeMap::new();

        for (stage_id, bucket) in &self.candidate_ids_by_stage {
            for candidate_id in bucket {
                let Some(candidate) = self.candidates_by_id.get(candidate_id) else {
                    return Err(format!(
                        "bucket {stage_id} references unknown candidate {candidate_id}"
                    ));
                };
                if candidate.stage_id != *stage_id {
                    return Err(format!(
                        "candidate {candidate_id} is in bucket {stage_id} but has stage_id {}",
                        candidate.stage_id
                    ));
                }
                *bucket_counts.entry(candidate_id.as_str()).or_default() += 1;
            }
        }

        for (candidate_id, candidate) in &self.candidates_by_id {
            match bucket_counts.get(candidate_id.as_str()) {
                Some(1) => {}
                Some(n) => {
                    return Err(format!(
                        "candidate {candidate_id} appears in {n} stage buckets"
                    ));
                }
                None => {
                    return Err(format!(
                        "candidate {candidate_id} is missing from every stage bucket"
                    ));
                }
            }
            if !self.stages.iter().any(|s| s.id == candidate.stage_id) {
                return Err(format!(
                    "candidate {candidate_id} references stage {} absent from the stage list",
                    candidate.stage_id
                ));
            }
            if !self.events_by_candidate_id.contains_key(candidate_id) {
                return Err(format!("candidate {candidate_id} has no timeline"));
            }
        }

        Ok(())
    }
}

/// All eight stage buckets, empty.
fn empty_stage_buckets() -> BTreeMap<StageId, Vec<String>> {
    StageId::ALL.iter().map(|id| (*id, Vec::new())).collect()
}
