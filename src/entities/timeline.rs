//! Timeline entity type - project phases and milestones for a deal

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::EntityId;

/// Phase status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum PhaseStatus {
    #[default]
    Planned,
    Active,
    Completed,
    Delayed,
}

impl PhaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseStatus::Planned => "planned",
            PhaseStatus::Active => "active",
            PhaseStatus::Completed => "completed",
            PhaseStatus::Delayed => "delayed",
        }
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PhaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planned" => Ok(PhaseStatus::Planned),
            "active" => Ok(PhaseStatus::Active),
            "completed" | "done" => Ok(PhaseStatus::Completed),
            "delayed" => Ok(PhaseStatus::Delayed),
            _ => Err(format!("Unknown phase status: {}", s)),
        }
    }
}

/// Milestone status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum MilestoneStatus {
    #[default]
    Pending,
    Reached,
    Missed,
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Pending => "pending",
            MilestoneStatus::Reached => "reached",
            MilestoneStatus::Missed => "missed",
        }
    }
}

impl std::fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MilestoneStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(MilestoneStatus::Pending),
            "reached" | "done" => Ok(MilestoneStatus::Reached),
            "missed" => Ok(MilestoneStatus::Missed),
            _ => Err(format!("Unknown milestone status: {}", s)),
        }
    }
}

/// A span of work on the timeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Phase {
    /// Phase name (e.g. "Entitlement", "Vertical construction")
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Display order; lower comes first
    #[serde(default)]
    pub order: i32,

    #[serde(default)]
    pub status: PhaseStatus,
}

/// A point-in-time event on the timeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone name (e.g. "Permit issued")
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub status: MilestoneStatus,
}

/// A deal's schedule: ordered phases plus point milestones
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    /// Unique identifier
    pub id: EntityId,

    /// Short title
    pub title: String,

    /// Deal this timeline belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phases: Vec<Phase>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub milestones: Vec<Milestone>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who created this timeline)
    pub author: String,

    /// Revision number
    #[serde(default = "default_revision")]
    pub revision: u32,
}

fn default_revision() -> u32 {
    1
}

impl Entity for Timeline {
    const PREFIX: &'static str = "TML";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn status(&self) -> &str {
        // Timelines have no lifecycle of their own
        "active"
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}

impl Timeline {
    /// Create a new timeline with the given parameters
    pub fn new(title: String, author: String) -> Self {
        Self {
            id: EntityId::new(crate::core::EntityPrefix::Tml),
            title,
            deal: None,
            phases: Vec::new(),
            milestones: Vec::new(),
            created: Utc::now(),
            author,
            revision: 1,
        }
    }

    pub fn with_deal(mut self, deal: EntityId) -> Self {
        self.deal = Some(deal);
        self
    }

    /// Append a phase; order 0 means auto-assign after the current last
    pub fn add_phase(&mut self, mut phase: Phase) {
        if phase.order == 0 {
            phase.order = self.phases.iter().map(|p| p.order).max().unwrap_or(0) + 1;
        }
        self.phases.push(phase);
    }

    pub fn add_milestone(&mut self, milestone: Milestone) {
        self.milestones.push(milestone);
    }
}
