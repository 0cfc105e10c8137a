//! Pipeline stages.
//!
//! The stage set is a closed catalog of eight ids, fixed at
//! template-definition time. A workspace's `stages` list carries the
//! display labels and the board order; candidates reference stages by id
//! only.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The eight stages a candidate can occupy.
///
/// Declaration order is pipeline order, which is why the enum derives
/// `Ord` — stage buckets keyed by `StageId` iterate in board order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    New,
    Screening,
    HrInterview,
    TechnicalInterview,
    FinalInterview,
    Offer,
    Hired,
    Rejected,
}

impl StageId {
    /// Every stage id, in pipeline order.
    pub const ALL: [Self; 8] = [
        Self::New,
        Self::Screening,
        Self::HrInterview,
        Self::TechnicalInterview,
        Self::FinalInterview,
        Self::Offer,
        Self::Hired,
        Self::Rejected,
    ];

    /// Canonical snake_case form, as persisted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Screening => "screening",
            Self::HrInterview => "hr_interview",
            Self::TechnicalInterview => "technical_interview",
            Self::FinalInterview => "final_interview",
            Self::Offer => "offer",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown stage id string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown stage id '{0}': expected one of new, screening, hr_interview, \
     technical_interview, final_interview, offer, hired, rejected"
)]
pub struct UnknownStageId(pub String);

impl FromStr for StageId {
    type Err = UnknownStageId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "new" => Ok(Self::New),
            "screening" => Ok(Self::Screening),
            "hr_interview" => Ok(Self::HrInterview),
            "technical_interview" => Ok(Self::TechnicalInterview),
            "final_interview" => Ok(Self::FinalInterview),
            "offer" => Ok(Self::Offer),
            "hired" => Ok(Self::Hired),
            "rejected" => Ok(Self::Rejected),
            _ => Err(UnknownStageId(s.to_string())),
        }
    }
}

/// One step of a pipeline: a stage id plus its board label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub label: String,
}

impl Stage {
    /// Build a stage from an id and label.
    pub fn new(id: StageId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Stage, StageId};
    use std::str::FromStr;

    #[test]
    fn display_parse_roundtrips() {
        for id in StageId::ALL {
            let rendered = id.to_string();
            let reparsed = StageId::from_str(&rendered).expect("should parse");
            assert_eq!(id, reparsed);
        }
    }

    #[test]
    fn json_form_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&StageId::HrInterview).expect("serialize"),
            "\"hr_interview\""
        );
        assert_eq!(
            serde_json::from_str::<StageId>("\"technical_interview\"").expect("deserialize"),
            StageId::TechnicalInterview
        );
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = StageId::from_str("phone_screen").expect_err("should reject");
        assert_eq!(err.0, "phone_screen");
        assert!(err.to_string().contains("expected one of"));
    }

    #[test]
    fn declaration_order_is_pipeline_order() {
        let mut sorted = StageId::ALL;
        sorted.sort();
        assert_eq!(sorted, StageId::ALL);
        assert_eq!(StageId::ALL.len(), 8);
    }

    #[test]
    fn stage_serializes_with_label() {
        let stage = Stage::new(StageId::Offer, "Offer Extended");
        let json = serde_json::to_string(&stage).expect("serialize");
        assert_eq!(json, "{\"id\":\"offer\",\"label\":\"Offer Extended\"}");
    }
}
