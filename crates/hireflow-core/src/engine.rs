//! The workspace domain engine.
//!
//! Every mutation is a read-modify-write against the store: load the full
//! instance, apply one in-memory transform (which keeps all three
//! denormalized views in step), persist the full instance. No dirty state
//! survives past a single call, and a failing operation returns before its
//! persist call runs, leaving stored state untouched.
//!
//! Reads are deliberately lenient where mutations are strict: a malformed
//! or missing record degrades to "absent" instead of failing, so corrupt
//! persisted state never wedges the caller.
//!
//! # Key layout
//!
//! - [`index::INDEX_KEY`] — the serialized workspace index (one JSON array).
//! - `hps_instance_<id>` — one full serialized [`WorkspaceInstance`] per
//!   workspace; cleanup discovers instances by this prefix.

use tracing::{debug, info, warn};

use crate::clock::{Clock, new_id};
use crate::error::{Error, Result};
use crate::index;
use crate::model::candidate::NewCandidate;
use crate::model::event::CandidateEvent;
use crate::model::stage::StageId;
use crate::model::workspace::{WorkspaceIndexItem, WorkspaceInstance};
use crate::store::Store;
use crate::templates;

/// Prefix of every per-instance store key.
pub const INSTANCE_KEY_PREFIX: &str = "hps_instance_";

fn instance_key(id: &str) -> String {
    format!("{INSTANCE_KEY_PREFIX}{id}")
}

/// Options for [`WorkspaceEngine::create_from_template`].
///
/// `add_to_index` defaults to `false`: template-derived workspaces are
/// demo boards and stay out of the "my workspaces" listing unless
/// explicitly promoted.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateOptions {
    pub add_to_index: bool,
}

/// The domain engine: owns a [`Store`] and a [`Clock`] and exposes every
/// workspace operation.
///
/// Mutating operations take `&mut self` — the engine is a single-writer
/// component by contract. Two engines over the same durable root are
/// last-write-wins on whole instance records; that is accepted best-effort
/// behavior, not something the engine detects.
#[derive(Debug)]
pub struct WorkspaceEngine<S> {
    store: S,
    clock: Clock,
}

impl<S: Store> WorkspaceEngine<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Clock::new(),
        }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap the engine, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    // -----------------------------------------------------------------------
    // Workspace index
    // -----------------------------------------------------------------------

    /// The workspace index, most-recently-upserted first.
    ///
    /// A missing or malformed index record reads as the empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store itself fails.
    pub fn index(&self) -> Result<Vec<WorkspaceIndexItem>> {
        let Some(raw) = self.store.get(index::INDEX_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!(%err, "malformed workspace index treated as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Insert or replace an index entry (deduplicated by id, replacement
    /// in place, new entries prepended).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the rewrite fails.
    pub fn upsert_index_item(&mut self, item: WorkspaceIndexItem) -> Result<()> {
        let mut items = self.index()?;
        index::upsert(&mut items, item);
        self.save_index(&items)
    }

    /// Drop an index entry. Absent ids are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the rewrite fails.
    pub fn remove_index_item(&mut self, id: &str) -> Result<()> {
        let mut items = self.index()?;
        index::remove(&mut items, id);
        self.save_index(&items)
    }

    fn save_index(&mut self, items: &[WorkspaceIndexItem]) -> Result<()> {
        let raw = serde_json::to_string(items)?;
        self.store.set(index::INDEX_KEY, &raw)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Instance I/O
    // -----------------------------------------------------------------------

    /// Load a workspace instance.
    ///
    /// Missing keys and malformed records both read as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store itself fails.
    pub fn instance(&self, id: &str) -> Result<Option<WorkspaceInstance>> {
        let Some(raw) = self.store.get(&instance_key(id))? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(instance) => Ok(Some(instance)),
            Err(err) => {
                warn!(workspace = %id, %err, "malformed workspace record treated as absent");
                Ok(None)
            }
        }
    }

    fn require_instance(&self, id: &str) -> Result<WorkspaceInstance> {
        self.instance(id)?
            .ok_or_else(|| Error::not_found("workspace", id))
    }

    fn persist(&mut self, instance: &WorkspaceInstance) -> Result<()> {
        let raw = serde_json::to_string(instance)?;
        self.store.set(&instance_key(&instance.id), &raw)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Create a workspace from a template, returning the new instance id.
    ///
    /// Copies the template's stage list and instantiates every seed
    /// candidate with a fresh id/timestamp and a `created` event. The
    /// workspace is persisted immediately; it is indexed only when
    /// `opts.add_to_index` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown template id.
    pub fn create_from_template(&mut self, template_id: &str, opts: CreateOptions) -> Result<String> {
        let tpl = templates::find_template(template_id)?;

        let mut instance = WorkspaceInstance::new(
            new_id(),
            tpl.name.to_string(),
            self.clock.now_iso(),
            Some(tpl.id.to_string()),
            tpl.stages.clone(),
        );

        for seed in &tpl.seed_candidates {
            let candidate = seed.instantiate(new_id(), self.clock.now_iso());
            let created = CandidateEvent::created(
                new_id(),
                self.clock.now_iso(),
                Some(format!("Candidate created in \"{}\"", tpl.name)),
            );
            instance.insert_candidate(candidate, created);
        }

        self.persist(&instance)?;

        if opts.add_to_index {
            self.upsert_index_item(instance.index_item())?;
        }

        info!(
            workspace = %instance.id,
            template = template_id,
            indexed = opts.add_to_index,
            "created workspace from template"
        );
        Ok(instance.id)
    }

    /// Create an empty custom workspace, returning the new instance id.
    ///
    /// Stages come from the baseline stage set; the workspace is always
    /// indexed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the trimmed name is empty.
    pub fn create_custom(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("workspace name is required"));
        }

        let instance = WorkspaceInstance::new(
            new_id(),
            name.to_string(),
            self.clock.now_iso(),
            None,
            templates::default_stages(),
        );

        self.persist(&instance)?;
        self.upsert_index_item(instance.index_item())?;

        info!(workspace = %instance.id, name, "created custom workspace");
        Ok(instance.id)
    }

    // -----------------------------------------------------------------------
    // Candidate operations
    // -----------------------------------------------------------------------

    /// Add a candidate, returning the updated instance and the new
    /// candidate's id.
    ///
    /// Input is normalized (trimming, empty optionals dropped); the stage
    /// defaults to `new`; the id is prepended to its stage bucket and a
    /// `created` event opens the timeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown workspace.
    pub fn add_candidate(
        &mut self,
        instance_id: &str,
        input: NewCandidate,
    ) -> Result<(WorkspaceInstance, String)> {
        let mut instance = self.require_instance(instance_id)?;

        let candidate_id = new_id();
        let candidate = input.into_candidate(candidate_id.clone(), self.clock.now_iso());
        let stage_id = candidate.stage_id;
        let created = CandidateEvent::created(
            new_id(),
            self.clock.now_iso(),
            Some("Candidate created".to_string()),
        );
        instance.insert_candidate(candidate, created);

        self.persist(&instance)?;
        debug!(workspace = %instance_id, candidate = %candidate_id, stage = %stage_id, "added candidate");
        Ok((instance, candidate_id))
    }

    /// Move a candidate to another stage, returning the updated instance.
    ///
    /// A move without a reason is rejected unconditionally — the reason is
    /// the audit trail. Moving to the candidate's current stage is a
    /// no-op: the instance comes back as re-read, with no event appended
    /// and nothing persisted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown workspace or candidate,
    /// and [`Error::Validation`] when the trimmed reason is empty.
    pub fn move_candidate(
        &mut self,
        instance_id: &str,
        candidate_id: &str,
        to_stage_id: StageId,
        reason: &str,
    ) -> Result<WorkspaceInstance> {
        let mut instance = self.require_instance(instance_id)?;

        let candidate = instance
            .candidate(candidate_id)
            .ok_or_else(|| Error::not_found("candidate", candidate_id))?;

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(Error::validation("a reason is required to move a candidate"));
        }

        let from_stage_id = candidate.stage_id;
        if from_stage_id == to_stage_id {
            debug!(
                workspace = %instance_id,
                candidate = %candidate_id,
                stage = %to_stage_id,
                "same-stage move ignored"
            );
            return Ok(instance);
        }

        instance.reassign_stage(candidate_id, to_stage_id);
        let event = CandidateEvent::stage_moved(
            new_id(),
            self.clock.now_iso(),
            from_stage_id,
            to_stage_id,
            reason.to_string(),
        );
        instance.append_event(candidate_id, event);

        self.persist(&instance)?;
        debug!(
            workspace = %instance_id,
            candidate = %candidate_id,
            from = %from_stage_id,
            to = %to_stage_id,
            "moved candidate"
        );
        Ok(instance)
    }

    /// Append a note to a candidate's timeline, returning the updated
    /// instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown workspace or candidate,
    /// and [`Error::Validation`] when the trimmed content is empty.
    pub fn add_note(
        &mut self,
        instance_id: &str,
        candidate_id: &str,
        content: &str,
    ) -> Result<WorkspaceInstance> {
        let mut instance = self.require_instance(instance_id)?;

        if instance.candidate(candidate_id).is_none() {
            return Err(Error::not_found("candidate", candidate_id));
        }

        let content = content.trim();
        if content.is_empty() {
            return Err(Error::validation("note content cannot be empty"));
        }

        let event = CandidateEvent::note(new_id(), self.clock.now_iso(), content.to_string());
        instance.append_event(candidate_id, event);

        self.persist(&instance)?;
        debug!(workspace = %instance_id, candidate = %candidate_id, "added note");
        Ok(instance)
    }

    /// A candidate's timeline, newest-first.
    ///
    /// A lenient read: an unknown workspace or candidate yields the empty
    /// vec rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] only if the store itself fails.
    pub fn timeline(&self, instance_id: &str, candidate_id: &str) -> Result<Vec<CandidateEvent>> {
        let Some(instance) = self.instance(instance_id)? else {
            return Ok(Vec::new());
        };
        Ok(instance.sorted_timeline(candidate_id))
    }

    // -----------------------------------------------------------------------
    // Deletion and cleanup
    // -----------------------------------------------------------------------

    /// Delete one workspace: its instance record and its index entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if a removal fails.
    pub fn delete_instance(&mut self, id: &str) -> Result<()> {
        self.store.remove(&instance_key(id))?;
        self.remove_index_item(id)?;
        info!(workspace = %id, "deleted workspace");
        Ok(())
    }

    /// Delete every template-derived workspace, returning how many were
    /// removed.
    ///
    /// Scans all instance keys; records whose `source_template_id` is set
    /// are removed, custom workspaces and the index are untouched
    /// (template-derived workspaces are typically unindexed anyway).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the scan or a removal fails.
    pub fn cleanup_template_derived(&mut self) -> Result<usize> {
        let mut removed = 0;
        for key in self.store.list_keys()? {
            if !key.starts_with(INSTANCE_KEY_PREFIX) {
                continue;
            }
            let Some(raw) = self.store.get(&key)? else {
                continue;
            };
            let Ok(instance) = serde_json::from_str::<WorkspaceInstance>(&raw) else {
                continue;
            };
            if instance.source_template_id.is_some() {
                self.store.remove(&key)?;
                removed += 1;
            }
        }
        info!(removed, "removed template-derived workspaces");
        Ok(removed)
    }

    /// Delete the index and every workspace instance. Full reset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if a removal fails.
    pub fn cleanup_all(&mut self) -> Result<()> {
        self.store.remove(index::INDEX_KEY)?;
        for key in self.store.list_keys()? {
            if key.starts_with(INSTANCE_KEY_PREFIX) {
                self.store.remove(&key)?;
            }
        }
        info!("cleared all workspace data");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CreateOptions, INSTANCE_KEY_PREFIX, WorkspaceEngine, instance_key};
    use crate::model::candidate::NewCandidate;
    use crate::model::event::EventData;
    use crate::model::stage::StageId;
    use crate::store::{MemoryStore, Store};

    fn engine() -> WorkspaceEngine<MemoryStore> {
        WorkspaceEngine::new(MemoryStore::new())
    }

    fn draft(first: &str, last: &str) -> NewCandidate {
        NewCandidate {
            first_name: first.into(),
            last_name: last.into(),
            title: "Engineer".into(),
            ..NewCandidate::default()
        }
    }

    // -- creation ----------------------------------------------------------

    #[test]
    fn template_creation_seeds_candidates_and_timelines() {
        let mut engine = engine();
        let id = engine
            .create_from_template("tpl_frontend", CreateOptions::default())
            .expect("create should succeed");

        let instance = engine.instance(&id).expect("read").expect("should exist");
        assert_eq!(instance.name, "Frontend Hiring Pipeline");
        assert_eq!(instance.source_template_id.as_deref(), Some("tpl_frontend"));
        assert_eq!(instance.candidates_by_id.len(), 5);
        assert_eq!(instance.stages.len(), 8);
        assert!(instance.check_consistency().is_ok());

        for events in instance.events_by_candidate_id.values() {
            assert_eq!(events.len(), 1);
            match &events[0].data {
                EventData::Created(d) => assert_eq!(
                    d.message.as_deref(),
                    Some("Candidate created in \"Frontend Hiring Pipeline\"")
                ),
                other => panic!("expected created event, got {other:?}"),
            }
        }
    }

    #[test]
    fn template_creation_fails_not_found_for_unknown_template() {
        let mut engine = engine();
        let err = engine
            .create_from_template("tpl_backend", CreateOptions::default())
            .expect_err("should fail");
        assert!(err.is_not_found());
        assert!(engine.store().is_empty(), "nothing may be persisted");
    }

    #[test]
    fn template_creation_indexes_only_on_opt_in() {
        let mut engine = engine();
        let silent = engine
            .create_from_template("tpl_frontend", CreateOptions::default())
            .expect("create");
        let listed = engine
            .create_from_template("tpl_frontend", CreateOptions { add_to_index: true })
            .expect("create");

        let index = engine.index().expect("index");
        assert!(!index.iter().any(|i| i.id == silent));
        assert!(index.iter().any(|i| i.id == listed));
    }

    #[test]
    fn custom_creation_is_always_indexed() {
        let mut engine = engine();
        let id = engine.create_custom("  QA Pipeline  ").expect("create");

        let index = engine.index().expect("index");
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].id, id);
        assert_eq!(index[0].name, "QA Pipeline");
        assert_eq!(index[0].source_template_id, None);

        let instance = engine.instance(&id).expect("read").expect("should exist");
        assert_eq!(instance.name, "QA Pipeline");
        assert!(instance.candidates_by_id.is_empty());
        assert_eq!(instance.stages.len(), 8, "baseline stage set");
    }

    #[test]
    fn custom_creation_rejects_blank_names() {
        let mut engine = engine();
        let err = engine.create_custom("   ").expect_err("should fail");
        assert!(err.is_validation());
        assert!(engine.store().is_empty());
        assert!(engine.index().expect("index").is_empty());
    }

    // -- candidates --------------------------------------------------------

    #[test]
    fn add_candidate_prepends_and_opens_timeline() {
        let mut engine = engine();
        let ws = engine.create_custom("Hiring").expect("create");

        let (_, first) = engine.add_candidate(&ws, draft("Ana", "K")).expect("add");
        let (instance, second) = engine.add_candidate(&ws, draft("Marko", "P")).expect("add");

        assert_eq!(
            instance.candidate_ids_by_stage[&StageId::New],
            vec![second.clone(), first]
        );
        assert_eq!(instance.events_by_candidate_id[&second].len(), 1);
        assert!(instance.check_consistency().is_ok());

        // The returned instance matches what was persisted.
        let reread = engine.instance(&ws).expect("read").expect("exists");
        assert_eq!(reread, instance);
    }

    #[test]
    fn add_candidate_to_unknown_workspace_fails() {
        let mut engine = engine();
        let err = engine
            .add_candidate("missing", draft("Ana", "K"))
            .expect_err("should fail");
        assert!(err.is_not_found());
    }

    #[test]
    fn move_records_event_with_from_to_and_reason() {
        let mut engine = engine();
        let ws = engine.create_custom("Hiring").expect("create");
        let (_, c) = engine.add_candidate(&ws, draft("Ana", "K")).expect("add");

        let instance = engine
            .move_candidate(&ws, &c, StageId::Screening, "  Strong CV  ")
            .expect("move");

        assert_eq!(instance.candidates_by_id[&c].stage_id, StageId::Screening);
        assert!(instance.candidate_ids_by_stage[&StageId::New].is_empty());
        assert_eq!(instance.candidate_ids_by_stage[&StageId::Screening], vec![c.clone()]);

        let events = &instance.events_by_candidate_id[&c];
        assert_eq!(events.len(), 2);
        match &events[1].data {
            EventData::StageMoved(d) => {
                assert_eq!(d.from_stage_id, StageId::New);
                assert_eq!(d.to_stage_id, StageId::Screening);
                assert_eq!(d.reason, "Strong CV");
            }
            other => panic!("expected stage_moved, got {other:?}"),
        }
        assert!(instance.check_consistency().is_ok());
    }

    #[test]
    fn same_stage_move_is_a_no_op() {
        let mut engine = engine();
        let ws = engine.create_custom("Hiring").expect("create");
        let (after_add, c) = engine.add_candidate(&ws, draft("Ana", "K")).expect("add");

        let instance = engine
            .move_candidate(&ws, &c, StageId::New, "any reason")
            .expect("no-op move");

        assert_eq!(instance, after_add, "instance must come back unchanged");
        assert_eq!(instance.events_by_candidate_id[&c].len(), 1, "no event appended");
    }

    #[test]
    fn move_without_reason_fails_and_leaves_state_untouched() {
        let mut engine = engine();
        let ws = engine.create_custom("Hiring").expect("create");
        let (after_add, c) = engine.add_candidate(&ws, draft("Ana", "K")).expect("add");

        for reason in ["", "   ", "\t\n"] {
            let err = engine
                .move_candidate(&ws, &c, StageId::Screening, reason)
                .expect_err("should fail");
            assert!(err.is_validation(), "reason {reason:?}");
        }

        let reread = engine.instance(&ws).expect("read").expect("exists");
        assert_eq!(reread, after_add, "stored state must be unchanged");
    }

    #[test]
    fn move_of_unknown_candidate_fails_not_found() {
        let mut engine = engine();
        let ws = engine.create_custom("Hiring").expect("create");
        let err = engine
            .move_candidate(&ws, "ghost", StageId::Offer, "reason")
            .expect_err("should fail");
        assert!(err.is_not_found());
    }

    #[test]
    fn note_is_trimmed_and_appended() {
        let mut engine = engine();
        let ws = engine.create_custom("Hiring").expect("create");
        let (_, c) = engine.add_candidate(&ws, draft("Ana", "K")).expect("add");

        let instance = engine
            .add_note(&ws, &c, "  Solid systems answers  ")
            .expect("note");
        let events = &instance.events_by_candidate_id[&c];
        match &events[1].data {
            EventData::Note(d) => assert_eq!(d.content, "Solid systems answers"),
            other => panic!("expected note, got {other:?}"),
        }
    }

    #[test]
    fn blank_note_fails_validation() {
        let mut engine = engine();
        let ws = engine.create_custom("Hiring").expect("create");
        let (after_add, c) = engine.add_candidate(&ws, draft("Ana", "K")).expect("add");

        let err = engine.add_note(&ws, &c, "   ").expect_err("should fail");
        assert!(err.is_validation());

        let reread = engine.instance(&ws).expect("read").expect("exists");
        assert_eq!(reread, after_add);
    }

    // -- timeline ----------------------------------------------------------

    #[test]
    fn timeline_is_newest_first() {
        let mut engine = engine();
        let ws = engine.create_custom("Hiring").expect("create");
        let (_, c) = engine.add_candidate(&ws, draft("Ana", "K")).expect("add");
        engine
            .move_candidate(&ws, &c, StageId::Screening, "CV looks good")
            .expect("move");
        engine.add_note(&ws, &c, "call scheduled").expect("note");

        let timeline = engine.timeline(&ws, &c).expect("timeline");
        let kinds: Vec<&str> = timeline.iter().map(|e| e.data.kind()).collect();
        assert_eq!(kinds, vec!["note", "stage_moved", "created"]);
    }

    #[test]
    fn timeline_is_lenient_about_missing_ids() {
        let mut engine = engine();
        assert!(engine.timeline("missing", "nobody").expect("read").is_empty());

        let ws = engine.create_custom("Hiring").expect("create");
        assert!(engine.timeline(&ws, "nobody").expect("read").is_empty());
    }

    // -- lenient reads -----------------------------------------------------

    #[test]
    fn malformed_instance_record_reads_as_absent() {
        let mut engine = engine();
        let ws = engine.create_custom("Hiring").expect("create");

        engine
            .store
            .set(&instance_key(&ws), "{not json")
            .expect("corrupt");
        assert!(engine.instance(&ws).expect("read").is_none());
        assert!(engine.timeline(&ws, "anyone").expect("read").is_empty());
    }

    #[test]
    fn malformed_index_reads_as_empty() {
        let mut engine = engine();
        engine
            .store
            .set(crate::index::INDEX_KEY, "42")
            .expect("corrupt");
        assert!(engine.index().expect("read").is_empty());
    }

    // -- deletion and cleanup ----------------------------------------------

    #[test]
    fn delete_instance_removes_record_and_index_entry() {
        let mut engine = engine();
        let ws = engine.create_custom("Hiring").expect("create");

        engine.delete_instance(&ws).expect("delete");
        assert!(engine.instance(&ws).expect("read").is_none());
        assert!(engine.index().expect("index").is_empty());
    }

    #[test]
    fn cleanup_template_derived_spares_custom_workspaces() {
        let mut engine = engine();
        let custom = engine.create_custom("Keep me").expect("create");
        let demo = engine
            .create_from_template("tpl_frontend", CreateOptions::default())
            .expect("create");

        let removed = engine.cleanup_template_derived().expect("cleanup");
        assert_eq!(removed, 1);
        assert!(engine.instance(&demo).expect("read").is_none());
        assert!(engine.instance(&custom).expect("read").is_some());
        // Index untouched: the custom workspace is still listed.
        assert_eq!(engine.index().expect("index").len(), 1);
    }

    #[test]
    fn cleanup_all_clears_instances_and_index() {
        let mut engine = engine();
        engine.create_custom("One").expect("create");
        engine
            .create_from_template("tpl_product", CreateOptions { add_to_index: true })
            .expect("create");

        engine.cleanup_all().expect("cleanup");
        assert!(engine.index().expect("index").is_empty());
        assert!(
            !engine
                .store()
                .list_keys()
                .expect("list")
                .iter()
                .any(|k| k.starts_with(INSTANCE_KEY_PREFIX))
        );
    }
}
