//! Compiled-in workspace templates.
//!
//! Templates are read-only blueprints used once, at instance-creation
//! time: the new workspace copies the template's stage list and
//! instantiates each seed candidate with a fresh id and timestamp. The
//! catalog is defined at first use and never mutated; nothing here is
//! persisted.

use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::model::candidate::Candidate;
use crate::model::stage::{Stage, StageId};

/// A seed candidate: every [`Candidate`] field except `id`/`created_at`,
/// which are generated at instantiation time.
#[derive(Debug, Clone)]
pub struct CandidateSeed {
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
    pub stage_id: StageId,
}

impl CandidateSeed {
    fn new(first_name: &str, last_name: &str, title: &str, company: &str, stage_id: StageId) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            title: title.to_string(),
            company: Some(company.to_string()),
            location: None,
            email: None,
            linkedin_url: None,
            github_url: None,
            portfolio_url: None,
            tags: Vec::new(),
            stage_id,
        }
    }

    fn location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    fn linkedin(mut self, url: &str) -> Self {
        self.linkedin_url = Some(url.to_string());
        self
    }

    fn github(mut self, url: &str) -> Self {
        self.github_url = Some(url.to_string());
        self
    }

    fn portfolio(mut self, url: &str) -> Self {
        self.portfolio_url = Some(url.to_string());
        self
    }

    fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| (*t).to_string()).collect();
        self
    }

    /// Materialize this seed as a full candidate with the given identity.
    #[must_use]
    pub fn instantiate(&self, id: String, created_at: String) -> Candidate {
        Candidate {
            id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            title: self.title.clone(),
            company: self.company.clone(),
            location: self.location.clone(),
            email: self.email.clone(),
            linkedin_url: self.linkedin_url.clone(),
            github_url: self.github_url.clone(),
            portfolio_url: self.portfolio_url.clone(),
            tags: self.tags.clone(),
            stage_id: self.stage_id,
            created_at,
        }
    }
}

/// A read-only blueprint for new workspaces.
#[derive(Debug, Clone)]
pub struct WorkspaceTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub stages: Vec<Stage>,
    pub seed_candidates: Vec<CandidateSeed>,
}

/// The shared 8-stage pipeline used by every shipped template.
#[must_use]
pub fn hr_stages() -> Vec<Stage> {
    vec![
        Stage::new(StageId::New, "New Applicants"),
        Stage::new(StageId::Screening, "Screening"),
        Stage::new(StageId::HrInterview, "HR Interview"),
        Stage::new(StageId::TechnicalInterview, "Technical Interview"),
        Stage::new(StageId::FinalInterview, "Final Interview"),
        Stage::new(StageId::Offer, "Offer Extended"),
        Stage::new(StageId::Hired, "Hired"),
        Stage::new(StageId::Rejected, "Rejected"),
    ]
}

/// Every shipped template, catalog order.
pub fn templates() -> &'static [WorkspaceTemplate] {
    static CATALOG: OnceLock<Vec<WorkspaceTemplate>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog).as_slice()
}

/// Look up a template by id.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when no template carries that id.
pub fn find_template(id: &str) -> Result<&'static WorkspaceTemplate> {
    templates()
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| Error::not_found("template", id))
}

/// The baseline stage set for custom workspaces — the first template's
/// stages, so custom boards don't redefine the pipeline.
#[must_use]
pub fn default_stages() -> Vec<Stage> {
    templates()
        .first()
        .map(|t| t.stages.clone())
        .unwrap_or_default()
}

fn build_catalog() -> Vec<WorkspaceTemplate> {
    vec![
        WorkspaceTemplate {
            id: "tpl_frontend",
            name: "Frontend Hiring Pipeline",
            stages: hr_stages(),
            seed_candidates: vec![
                CandidateSeed::new("Mina", "Jovanović", "Frontend Developer", "BluePeak", StageId::New)
                    .location("Belgrade, RS")
                    .linkedin("https://linkedin.com/in/mina-jovanovic")
                    .github("https://github.com/minaj")
                    .tags(&["React", "TypeScript", "UI polish"]),
                CandidateSeed::new(
                    "Luka",
                    "Stojanović",
                    "Frontend Developer",
                    "Nebula Labs",
                    StageId::Screening,
                )
                .location("Novi Sad, RS")
                .linkedin("https://linkedin.com/in/luka-stojanovic")
                .github("https://github.com/lukast")
                .tags(&["JS fundamentals", "Testing"]),
                CandidateSeed::new(
                    "Sara",
                    "Petrović",
                    "Frontend Developer",
                    "Orbit Commerce",
                    StageId::HrInterview,
                )
                .location("Niš, RS")
                .linkedin("https://linkedin.com/in/sara-petrovic")
                .portfolio("https://sarap.dev")
                .tags(&["Communication", "Design sense"]),
                CandidateSeed::new(
                    "Nikola",
                    "Ilić",
                    "Frontend Developer",
                    "Atlas Soft",
                    StageId::TechnicalInterview,
                )
                .location("Kragujevac, RS")
                .github("https://github.com/nikolai")
                .tags(&["Performance", "React hooks"]),
                CandidateSeed::new(
                    "Teodora",
                    "Marković",
                    "Frontend Developer",
                    "SignalWorks",
                    StageId::FinalInterview,
                )
                .location("Belgrade, RS")
                .linkedin("https://linkedin.com/in/teodora-markovic")
                .tags(&["Leadership", "Ownership"]),
            ],
        },
        WorkspaceTemplate {
            id: "tpl_product",
            name: "Product & Ops Pipeline",
            stages: hr_stages(),
            seed_candidates: vec![
                CandidateSeed::new("Ana", "Kovačević", "Product Manager", "Northwind", StageId::New)
                    .location("Belgrade, RS")
                    .linkedin("https://linkedin.com/in/ana-kovacevic")
                    .tags(&["Discovery", "Stakeholders"]),
                CandidateSeed::new(
                    "Marko",
                    "Pavlović",
                    "Product Manager",
                    "Pulse Systems",
                    StageId::Screening,
                )
                .location("Novi Sad, RS")
                .linkedin("https://linkedin.com/in/marko-pavlovic")
                .tags(&["Metrics", "Roadmaps"]),
                CandidateSeed::new(
                    "Ivana",
                    "Ristić",
                    "Operations Lead",
                    "Harbor Logistics",
                    StageId::HrInterview,
                )
                .location("Pančevo, RS")
                .tags(&["Process", "Execution"]),
                CandidateSeed::new(
                    "Stefan",
                    "Đorđević",
                    "Product Ops",
                    "Aurora Studio",
                    StageId::TechnicalInterview,
                )
                .location("Belgrade, RS")
                .tags(&["Systems thinking", "Automation"]),
            ],
        },
    ]
}
