//! Deal entity type

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::EntityId;

/// Pipeline stage of a deal
///
/// Stages advance one step at a time; any active stage can drop to `dead`,
/// and a dead deal can be revived back to `prospecting`. `closed` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum DealStage {
    #[default]
    Prospecting,
    ControlledNotApproved,
    ControlledApproved,
    Entitlements,
    Development,
    Closed,
    Dead,
}

impl DealStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::Prospecting => "prospecting",
            DealStage::ControlledNotApproved => "controlled_not_approved",
            DealStage::ControlledApproved => "controlled_approved",
            DealStage::Entitlements => "entitlements",
            DealStage::Development => "development",
            DealStage::Closed => "closed",
            DealStage::Dead => "dead",
        }
    }

    /// All stages in pipeline order; `dead` sorts last
    pub fn all() -> &'static [DealStage] {
        &[
            DealStage::Prospecting,
            DealStage::ControlledNotApproved,
            DealStage::ControlledApproved,
            DealStage::Entitlements,
            DealStage::Development,
            DealStage::Closed,
            DealStage::Dead,
        ]
    }

    /// Closed or dead - the deal has left the pipeline
    pub fn is_terminal(&self) -> bool {
        matches!(self, DealStage::Closed | DealStage::Dead)
    }

    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// The next stage along the happy path, if any
    pub fn next_stage(&self) -> Option<DealStage> {
        match self {
            DealStage::Prospecting => Some(DealStage::ControlledNotApproved),
            DealStage::ControlledNotApproved => Some(DealStage::ControlledApproved),
            DealStage::ControlledApproved => Some(DealStage::Entitlements),
            DealStage::Entitlements => Some(DealStage::Development),
            DealStage::Development => Some(DealStage::Closed),
            DealStage::Closed | DealStage::Dead => None,
        }
    }

    /// Whether `from -> to` is a legal stage transition
    pub fn is_valid_transition(from: DealStage, to: DealStage) -> bool {
        if from == to {
            return false;
        }
        if from.next_stage() == Some(to) {
            return true;
        }
        match (from, to) {
            // Any active stage may die
            (f, DealStage::Dead) => f.is_active(),
            // A dead deal can be revived to the top of the funnel
            (DealStage::Dead, DealStage::Prospecting) => true,
            _ => false,
        }
    }

    /// Stages reachable from this one
    pub fn allowed_transitions(&self) -> Vec<DealStage> {
        DealStage::all()
            .iter()
            .copied()
            .filter(|to| DealStage::is_valid_transition(*self, *to))
            .collect()
    }
}

impl std::fmt::Display for DealStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DealStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prospecting" => Ok(DealStage::Prospecting),
            "controlled_not_approved" | "controlled-not-approved" => {
                Ok(DealStage::ControlledNotApproved)
            }
            "controlled_approved" | "controlled-approved" => Ok(DealStage::ControlledApproved),
            "entitlements" => Ok(DealStage::Entitlements),
            "development" => Ok(DealStage::Development),
            "closed" => Ok(DealStage::Closed),
            "dead" => Ok(DealStage::Dead),
            _ => Err(format!("Unknown stage: {}", s)),
        }
    }
}

/// Links to other entities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealLinks {
    /// People involved in this deal
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<EntityId>,
}

/// A real-estate development deal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    /// Unique identifier
    pub id: EntityId,

    /// Short deal name (e.g. "Riverside Flats")
    pub title: String,

    /// Deal type (user-defined, e.g. "residential", "commercial")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_type: Option<String>,

    /// Current pipeline stage
    #[serde(default)]
    pub stage: DealStage,

    /// Market / submarket label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,

    /// Rough total value used for pipeline aggregation
    #[serde(default)]
    pub estimated_value: f64,

    /// Land / asset purchase price
    #[serde(default)]
    pub purchase_price: f64,

    /// Date the deal went under contract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_date: Option<NaiveDate>,

    /// Date the deal closed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_date: Option<NaiveDate>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Tags for filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Links to other entities
    #[serde(default)]
    pub links: DealLinks,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who created this deal)
    pub author: String,

    /// Revision number
    #[serde(default = "default_revision")]
    pub revision: u32,
}

fn default_revision() -> u32 {
    1
}

impl Entity for Deal {
    const PREFIX: &'static str = "DEAL";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn status(&self) -> &str {
        self.stage.as_str()
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}

impl Deal {
    /// Create a new deal with the given parameters
    pub fn new(title: String, author: String) -> Self {
        Self {
            id: EntityId::new(crate::core::EntityPrefix::Deal),
            title,
            deal_type: None,
            stage: DealStage::default(),
            market: None,
            estimated_value: 0.0,
            purchase_price: 0.0,
            contract_date: None,
            close_date: None,
            description: None,
            tags: Vec::new(),
            links: DealLinks::default(),
            created: Utc::now(),
            author,
            revision: 1,
        }
    }

    pub fn with_deal_type(mut self, deal_type: &str) -> Self {
        self.deal_type = Some(deal_type.to_string());
        self
    }

    pub fn with_stage(mut self, stage: DealStage) -> Self {
        self.stage = stage;
        self
    }

    pub fn with_estimated_value(mut self, value: f64) -> Self {
        self.estimated_value = value;
        self
    }

    /// Deal type for grouping; absent types bucket under "unknown"
    pub fn deal_type_or_unknown(&self) -> &str {
        self.deal_type.as_deref().unwrap_or("unknown")
    }

    /// Contract-to-close span in days, when both dates are present
    pub fn cycle_days(&self) -> Option<i64> {
        match (self.contract_date, self.close_date) {
            (Some(contract), Some(close)) => Some((close - contract).num_days()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deal_roundtrip() {
        let deal = Deal::new("Riverside Flats".to_string(), "test".to_string())
            .with_deal_type("residential")
            .with_estimated_value(1_200_000.0);

        let yaml = serde_yml::to_string(&deal).unwrap();
        let parsed: Deal = serde_yml::from_str(&yaml).unwrap();

        assert_eq!(deal.id, parsed.id);
        assert_eq!(deal.title, parsed.title);
        assert_eq!(parsed.deal_type.as_deref(), Some("residential"));
        assert_eq!(parsed.estimated_value, 1_200_000.0);
    }

    #[test]
    fn test_stage_serialization() {
        assert_eq!(
            serde_yml::to_string(&DealStage::Prospecting).unwrap().trim(),
            "prospecting"
        );
        assert_eq!(
            serde_yml::to_string(&DealStage::ControlledNotApproved)
                .unwrap()
                .trim(),
            "controlled_not_approved"
        );
        assert_eq!(
            serde_yml::to_string(&DealStage::ControlledApproved)
                .unwrap()
                .trim(),
            "controlled_approved"
        );
        assert_eq!(
            serde_yml::to_string(&DealStage::Entitlements).unwrap().trim(),
            "entitlements"
        );
        assert_eq!(
            serde_yml::to_string(&DealStage::Development).unwrap().trim(),
            "development"
        );
        assert_eq!(
            serde_yml::to_string(&DealStage::Closed).unwrap().trim(),
            "closed"
        );
        assert_eq!(
            serde_yml::to_string(&DealStage::Dead).unwrap().trim(),
            "dead"
        );
    }

    #[test]
    fn test_stage_deserialization() {
        assert_eq!(
            serde_yml::from_str::<DealStage>("controlled_not_approved").unwrap(),
            DealStage::ControlledNotApproved
        );
        assert_eq!(
            serde_yml::from_str::<DealStage>("dead").unwrap(),
            DealStage::Dead
        );
    }

    #[test]
    fn test_stage_default_is_prospecting() {
        assert_eq!(DealStage::default(), DealStage::Prospecting);
        let deal = Deal::new("X".to_string(), "test".to_string());
        assert_eq!(deal.stage, DealStage::Prospecting);
    }

    #[test]
    fn test_stage_terminal_classification() {
        assert!(DealStage::Closed.is_terminal());
        assert!(DealStage::Dead.is_terminal());
        assert!(DealStage::Prospecting.is_active());
        assert!(DealStage::Development.is_active());
    }

    #[test]
    fn test_forward_transitions_one_step() {
        assert!(DealStage::is_valid_transition(
            DealStage::Prospecting,
            DealStage::ControlledNotApproved
        ));
        assert!(DealStage::is_valid_transition(
            DealStage::Development,
            DealStage::Closed
        ));
        // No skipping stages
        assert!(!DealStage::is_valid_transition(
            DealStage::Prospecting,
            DealStage::Development
        ));
        assert!(!DealStage::is_valid_transition(
            DealStage::Prospecting,
            DealStage::Closed
        ));
    }

    #[test]
    fn test_any_active_stage_can_die() {
        for stage in DealStage::all() {
            if stage.is_active() {
                assert!(DealStage::is_valid_transition(*stage, DealStage::Dead));
            }
        }
    }

    #[test]
    fn test_closed_is_final() {
        assert!(DealStage::Closed.allowed_transitions().is_empty());
        assert!(!DealStage::is_valid_transition(
            DealStage::Closed,
            DealStage::Dead
        ));
    }

    #[test]
    fn test_dead_can_be_revived() {
        assert_eq!(
            DealStage::Dead.allowed_transitions(),
            vec![DealStage::Prospecting]
        );
    }

    #[test]
    fn test_no_self_transition() {
        assert!(!DealStage::is_valid_transition(
            DealStage::Entitlements,
            DealStage::Entitlements
        ));
    }

    #[test]
    fn test_deal_type_fallback() {
        let deal = Deal::new("X".to_string(), "test".to_string());
        assert_eq!(deal.deal_type_or_unknown(), "unknown");
        let typed = deal.with_deal_type("commercial");
        assert_eq!(typed.deal_type_or_unknown(), "commercial");
    }

    #[test]
    fn test_cycle_days() {
        let mut deal = Deal::new("X".to_string(), "test".to_string());
        assert_eq!(deal.cycle_days(), None);

        deal.contract_date = NaiveDate::from_ymd_opt(2024, 1, 10);
        assert_eq!(deal.cycle_days(), None);

        deal.close_date = NaiveDate::from_ymd_opt(2024, 3, 10);
        assert_eq!(deal.cycle_days(), Some(60));
    }

    #[test]
    fn test_minimal_file_deserializes_with_defaults() {
        // Old files may predate most optional fields
        let yaml = r#"
id: DEAL-01KDGJC92W6EBFGZ5SJW6MFGW6
title: "Bare Deal"
created: "2024-01-01T00:00:00Z"
author: "test"
"#;
        let deal: Deal = serde_yml::from_str(yaml).unwrap();
        assert_eq!(deal.stage, DealStage::Prospecting);
        assert_eq!(deal.estimated_value, 0.0);
        assert!(deal.deal_type.is_none());
        assert!(deal.links.contacts.is_empty());
        assert_eq!(deal.revision, 1);
    }
}
