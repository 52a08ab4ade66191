//! Proforma entity type - the unit-economics worksheet attached to a deal

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::EntityId;

/// Financial worksheet for a deal
///
/// All dollar amounts default to zero so a worksheet can be sketched in
/// stages; percentage fields stay unset until someone deliberately overrides
/// the configured assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proforma {
    /// Unique identifier
    pub id: EntityId,

    /// Short label (e.g. "Riverside Flats - base case")
    pub title: String,

    /// Id of the deal this worksheet belongs to
    pub deal: EntityId,

    /// Units to be built/sold
    #[serde(default)]
    pub number_of_units: u32,

    /// Expected sales price per unit
    #[serde(default)]
    pub sales_price_per_unit: f64,

    /// Direct (hard) cost per unit
    #[serde(default)]
    pub direct_cost_per_unit: f64,

    /// Land / asset purchase price
    #[serde(default)]
    pub purchase_price: f64,

    /// Site work, infrastructure, horizontal development
    #[serde(default)]
    pub development_costs: f64,

    /// Design, legal, entitlement, and other soft costs
    #[serde(default)]
    pub soft_costs: f64,

    /// Interest and lender fees
    #[serde(default)]
    pub financing_costs: f64,

    /// Contingency percentage; unset means use the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contingency_percentage: Option<f64>,

    /// Sales commission percentage; unset means use the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_commission_percentage: Option<f64>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who created this proforma)
    pub author: String,

    /// Revision number
    #[serde(default = "default_revision")]
    pub revision: u32,
}

fn default_revision() -> u32 {
    1
}

impl Entity for Proforma {
    const PREFIX: &'static str = "PRO";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn status(&self) -> &str {
        // Worksheets have no lifecycle of their own
        "active"
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}

impl Proforma {
    /// Create a new proforma for the given deal
    pub fn new(title: String, deal: EntityId, author: String) -> Self {
        Self {
            id: EntityId::new(crate::core::EntityPrefix::Pro),
            title,
            deal,
            number_of_units: 0,
            sales_price_per_unit: 0.0,
            direct_cost_per_unit: 0.0,
            purchase_price: 0.0,
            development_costs: 0.0,
            soft_costs: 0.0,
            financing_costs: 0.0,
            contingency_percentage: None,
            sales_commission_percentage: None,
            notes: None,
            created: Utc::now(),
            author,
            revision: 1,
        }
    }

    pub fn with_units(mut self, units: u32, sales_price: f64, direct_cost: f64) -> Self {
        self.number_of_units = units;
        self.sales_price_per_unit = sales_price;
        self.direct_cost_per_unit = direct_cost;
        self
    }

    pub fn with_purchase_price(mut self, price: f64) -> Self {
        self.purchase_price = price;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityPrefix;

    #[test]
    fn test_proforma_roundtrip() {
        let deal_id = EntityId::new(EntityPrefix::Deal);
        let pro = Proforma::new(
            "Base case".to_string(),
            deal_id.clone(),
            "test".to_string(),
        )
        .with_units(10, 100_000.0, 50_000.0)
        .with_purchase_price(200_000.0);

        let yaml = serde_yml::to_string(&pro).unwrap();
        let parsed: Proforma = serde_yml::from_str(&yaml).unwrap();

        assert_eq!(parsed.id, pro.id);
        assert_eq!(parsed.deal, deal_id);
        assert_eq!(parsed.number_of_units, 10);
        assert_eq!(parsed.sales_price_per_unit, 100_000.0);
        assert_eq!(parsed.purchase_price, 200_000.0);
    }

    #[test]
    fn test_unset_percentages_are_omitted() {
        let pro = Proforma::new(
            "Base case".to_string(),
            EntityId::new(EntityPrefix::Deal),
            "test".to_string(),
        );
        let yaml = serde_yml::to_string(&pro).unwrap();
        assert!(!yaml.contains("contingency_percentage"));
        assert!(!yaml.contains("sales_commission_percentage"));
    }

    #[test]
    fn test_minimal_file_deserializes_with_zero_money() {
        let yaml = r#"
id: PRO-01KDGJC92W6EBFGZ5SJW6MFGW6
title: "Sketch"
deal: DEAL-01KDGJC92W6EBFGZ5SJW6MFGW6
created: "2024-01-01T00:00:00Z"
author: "test"
"#;
        let pro: Proforma = serde_yml::from_str(yaml).unwrap();
        assert_eq!(pro.number_of_units, 0);
        assert_eq!(pro.development_costs, 0.0);
        assert!(pro.contingency_percentage.is_none());
        assert_eq!(pro.revision, 1);
    }
}
