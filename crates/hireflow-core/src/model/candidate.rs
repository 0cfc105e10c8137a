//! Candidates and the normalization applied on intake.
//!
//! Optional text fields are `Option<String>` and never hold an empty or
//! whitespace-only string: intake trims everything and maps trimmed-empty
//! to `None`. Display code relies on presence checks, so this
//! normalization is load-bearing, not cosmetic.

use serde::{Deserialize, Serialize};

use super::stage::StageId;

/// A person moving through one workspace's pipeline.
///
/// Owned exclusively by its workspace instance; `id` is globally unique
/// and immutable after creation. `stage_id` always names a stage present
/// in the owning workspace's stage list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Role applied for.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub stage_id: StageId,
    pub created_at: String,
}

impl Candidate {
    /// `"First Last"`, the form cards and detail pages render.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input for adding a candidate to a workspace.
///
/// `id` and `created_at` are generated at insert time; `stage_id` defaults
/// to [`StageId::New`] when unset. All text runs through
/// [`NewCandidate::into_candidate`] normalization.
#[derive(Debug, Clone, Default)]
pub struct NewCandidate {
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub tags: Vec<String>,
    pub stage_id: Option<StageId>,
}

impl NewCandidate {
    /// Normalize into a full [`Candidate`] with the given identity.
    ///
    /// Required fields are trimmed; optional fields are trimmed and mapped
    /// to `None` when empty; tags are trimmed with empty entries dropped.
    #[must_use]
    pub fn into_candidate(self, id: String, created_at: String) -> Candidate {
        Candidate {
            id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            title: self.title.trim().to_string(),
            company: clean_optional(self.company),
            location: clean_optional(self.location),
            email: clean_optional(self.email),
            linkedin_url: clean_optional(self.linkedin_url),
            github_url: clean_optional(self.github_url),
            portfolio_url: clean_optional(self.portfolio_url),
            tags: clean_tags(self.tags),
            stage_id: self.stage_id.unwrap_or(StageId::New),
            created_at,
        }
    }
}

/// Trim, then drop the value entirely if nothing is left.
fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim each tag and drop empties, keeping order.
fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Candidate, NewCandidate};
    use crate::model::stage::StageId;

    fn draft() -> NewCandidate {
        NewCandidate {
            first_name: "  Mina ".into(),
            last_name: " Jovanović".into(),
            title: "Frontend Developer  ".into(),
            ..NewCandidate::default()
        }
    }

    #[test]
    fn required_fields_are_trimmed() {
        let c = draft().into_candidate("c1".into(), "t1".into());
        assert_eq!(c.first_name, "Mina");
        assert_eq!(c.last_name, "Jovanović");
        assert_eq!(c.title, "Frontend Developer");
        assert_eq!(c.full_name(), "Mina Jovanović");
    }

    #[test]
    fn empty_optionals_become_absent() {
        let mut input = draft();
        input.company = Some("   ".into());
        input.email = Some(" mina@example.com ".into());
        input.location = None;

        let c = input.into_candidate("c1".into(), "t1".into());
        assert_eq!(c.company, None);
        assert_eq!(c.email.as_deref(), Some("mina@example.com"));
        assert_eq!(c.location, None);
    }

    #[test]
    fn tags_drop_empty_entries_and_keep_order() {
        let mut input = draft();
        input.tags = vec![" React ".into(), String::new(), "  ".into(), "UI polish".into()];

        let c = input.into_candidate("c1".into(), "t1".into());
        assert_eq!(c.tags, vec!["React", "UI polish"]);
    }

    #[test]
    fn stage_defaults_to_new() {
        let c = draft().into_candidate("c1".into(), "t1".into());
        assert_eq!(c.stage_id, StageId::New);

        let mut input = draft();
        input.stage_id = Some(StageId::Offer);
        let c = input.into_candidate("c2".into(), "t2".into());
        assert_eq!(c.stage_id, StageId::Offer);
    }

    #[test]
    fn absent_optionals_are_omitted_from_json() {
        let c = draft().into_candidate("c1".into(), "t1".into());
        let json = serde_json::to_string(&c).expect("serialize");
        assert!(!json.contains("company"));
        assert!(!json.contains("tags"));

        let back: Candidate = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, c);
    }
}
