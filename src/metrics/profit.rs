//! Proforma profit math and deal-type profitability grouping

use std::collections::HashMap;

use crate::core::identity::EntityId;
use crate::entities::deal::Deal;
use crate::entities::proforma::Proforma;

/// Percentage assumptions applied where a proforma leaves its own unset
///
/// The single place these defaults are defined; config may override them per
/// project.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitAssumptions {
    /// Contingency on purchase + development + soft + direct costs
    pub contingency_pct: f64,
    /// Sales commission on gross revenue
    pub sales_commission_pct: f64,
}

impl Default for ProfitAssumptions {
    fn default() -> Self {
        Self {
            contingency_pct: 5.0,
            sales_commission_pct: 3.0,
        }
    }
}

/// Line-item result of running a proforma
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitBreakdown {
    /// direct cost per unit x units
    pub total_direct_costs: f64,
    /// Contingency dollars on purchase + development + soft + direct
    pub contingency: f64,
    /// Everything spent, contingency and financing included
    pub total_costs: f64,
    /// sales price per unit x units
    pub gross_revenue: f64,
    /// Commission dollars on gross revenue
    pub sales_commission: f64,
    /// Revenue after commission
    pub net_revenue: f64,
    /// Net revenue minus total costs
    pub profit: f64,
    /// Profit as a percentage of total costs, when costs are nonzero
    pub margin_pct: Option<f64>,
}

/// Run a proforma's unit economics
///
/// Contingency covers purchase, development, soft, and direct costs but not
/// financing; commission comes off gross revenue only. Percentages on the
/// proforma override `assumptions`.
pub fn proforma_profit(proforma: &Proforma, assumptions: &ProfitAssumptions) -> ProfitBreakdown {
    let contingency_pct = proforma
        .contingency_percentage
        .unwrap_or(assumptions.contingency_pct);
    let commission_pct = proforma
        .sales_commission_percentage
        .unwrap_or(assumptions.sales_commission_pct);

    let units = proforma.number_of_units as f64;
    let total_direct_costs = proforma.direct_cost_per_unit * units;

    let contingency_base = proforma.purchase_price
        + proforma.development_costs
        + proforma.soft_costs
        + total_direct_costs;
    let contingency = contingency_base * contingency_pct / 100.0;

    let total_costs = proforma.purchase_price
        + proforma.development_costs
        + proforma.soft_costs
        + proforma.financing_costs
        + total_direct_costs
        + contingency;

    let gross_revenue = proforma.sales_price_per_unit * units;
    let sales_commission = gross_revenue * commission_pct / 100.0;
    let net_revenue = gross_revenue - sales_commission;
    let profit = net_revenue - total_costs;

    let margin_pct = if total_costs != 0.0 {
        Some(profit / total_costs * 100.0)
    } else {
        None
    };

    ProfitBreakdown {
        total_direct_costs,
        contingency,
        total_costs,
        gross_revenue,
        sales_commission,
        net_revenue,
        profit,
        margin_pct,
    }
}

/// Proformas keyed by the deal they belong to
pub type ProformaIndex<'a> = HashMap<&'a EntityId, &'a Proforma>;

/// Index proformas by deal id; the first worksheet per deal wins
pub fn index_by_deal(proformas: &[Proforma]) -> ProformaIndex<'_> {
    let mut index = ProformaIndex::new();
    for proforma in proformas {
        index.entry(&proforma.deal).or_insert(proforma);
    }
    index
}

/// Profitability of one deal-type group
#[derive(Debug, Clone, PartialEq)]
pub struct DealTypeProfit {
    /// Deal type label; deals without one bucket under "unknown"
    pub deal_type: String,
    /// Deals in this group that had a proforma
    pub deal_count: usize,
    pub total_profit: f64,
    pub avg_profit: f64,
}

/// Group projected profit by deal type, best average first
///
/// Deals without an indexed proforma are skipped; ties on average profit
/// fall back to name order so output is deterministic.
pub fn profit_by_deal_type(
    deals: &[Deal],
    proformas: &ProformaIndex<'_>,
    assumptions: &ProfitAssumptions,
) -> Vec<DealTypeProfit> {
    let mut totals: HashMap<&str, (usize, f64)> = HashMap::new();
    for deal in deals {
        let Some(proforma) = proformas.get(&deal.id) else {
            continue;
        };
        let breakdown = proforma_profit(proforma, assumptions);
        let entry = totals.entry(deal.deal_type_or_unknown()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += breakdown.profit;
    }

    let mut groups: Vec<DealTypeProfit> = totals
        .into_iter()
        .map(|(deal_type, (deal_count, total_profit))| DealTypeProfit {
            deal_type: deal_type.to_string(),
            deal_count,
            total_profit,
            avg_profit: total_profit / deal_count as f64,
        })
        .collect();

    groups.sort_by(|a, b| {
        b.avg_profit
            .total_cmp(&a.avg_profit)
            .then_with(|| a.deal_type.cmp(&b.deal_type))
    });
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityPrefix;
    use crate::entities::proforma::Proforma;

    fn scenario_proforma(deal: EntityId) -> Proforma {
        // 10 units at $100k out / $50k in, $200k land, nothing else
        Proforma::new("base".to_string(), deal, "test".to_string())
            .with_units(10, 100_000.0, 50_000.0)
            .with_purchase_price(200_000.0)
    }

    #[test]
    fn test_breakdown_reference_scenario() {
        let deal = EntityId::new(EntityPrefix::Deal);
        let breakdown = proforma_profit(&scenario_proforma(deal), &ProfitAssumptions::default());

        assert_eq!(breakdown.total_direct_costs, 500_000.0);
        assert_eq!(breakdown.gross_revenue, 1_000_000.0);
        assert_eq!(breakdown.sales_commission, 30_000.0);
        // 5% of (200,000 + 500,000)
        assert_eq!(breakdown.contingency, 35_000.0);
        assert_eq!(breakdown.total_costs, 735_000.0);
        assert_eq!(breakdown.profit, 235_000.0);
    }

    #[test]
    fn test_financing_costs_skip_contingency() {
        let deal = EntityId::new(EntityPrefix::Deal);
        let mut pro = scenario_proforma(deal);
        pro.financing_costs = 40_000.0;
        let breakdown = proforma_profit(&pro, &ProfitAssumptions::default());

        // Contingency unchanged; costs and profit move by exactly the financing
        assert_eq!(breakdown.contingency, 35_000.0);
        assert_eq!(breakdown.total_costs, 775_000.0);
        assert_eq!(breakdown.profit, 195_000.0);
    }

    #[test]
    fn test_percentage_overrides_beat_assumptions() {
        let deal = EntityId::new(EntityPrefix::Deal);
        let mut pro = scenario_proforma(deal);
        pro.contingency_percentage = Some(10.0);
        pro.sales_commission_percentage = Some(0.0);
        let breakdown = proforma_profit(&pro, &ProfitAssumptions::default());

        assert_eq!(breakdown.contingency, 70_000.0);
        assert_eq!(breakdown.sales_commission, 0.0);
        assert_eq!(breakdown.profit, 1_000_000.0 - 770_000.0);
    }

    #[test]
    fn test_empty_proforma_is_all_zero() {
        let deal = EntityId::new(EntityPrefix::Deal);
        let pro = Proforma::new("blank".to_string(), deal, "test".to_string());
        let breakdown = proforma_profit(&pro, &ProfitAssumptions::default());

        assert_eq!(breakdown.total_costs, 0.0);
        assert_eq!(breakdown.profit, 0.0);
        assert_eq!(breakdown.margin_pct, None);
    }

    #[test]
    fn test_margin_pct() {
        let deal = EntityId::new(EntityPrefix::Deal);
        let breakdown = proforma_profit(&scenario_proforma(deal), &ProfitAssumptions::default());
        let margin = breakdown.margin_pct.unwrap();
        // 235,000 / 735,000
        assert!((margin - 31.972_789_115_646_26).abs() < 1e-9);
    }

    #[test]
    fn test_index_first_proforma_wins() {
        let deal = EntityId::new(EntityPrefix::Deal);
        let first = Proforma::new("first".to_string(), deal.clone(), "test".to_string());
        let second = Proforma::new("second".to_string(), deal.clone(), "test".to_string());
        let proformas = vec![first, second];

        let index = index_by_deal(&proformas);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&deal).unwrap().title, "first");
    }

    #[test]
    fn test_grouping_by_deal_type_sorted_desc() {
        let mut res_deal = Deal::new("Res".to_string(), "test".to_string());
        res_deal.deal_type = Some("residential".to_string());
        let mut com_deal = Deal::new("Com".to_string(), "test".to_string());
        com_deal.deal_type = Some("commercial".to_string());

        // Residential: the $235k reference case. Commercial: half the units.
        let res_pro = scenario_proforma(res_deal.id.clone());
        let com_pro = Proforma::new("c".to_string(), com_deal.id.clone(), "test".to_string())
            .with_units(5, 100_000.0, 50_000.0)
            .with_purchase_price(200_000.0);

        let deals = vec![com_deal, res_deal];
        let proformas = vec![res_pro, com_pro];
        let index = index_by_deal(&proformas);
        let groups = profit_by_deal_type(&deals, &index, &ProfitAssumptions::default());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].deal_type, "residential");
        assert_eq!(groups[0].avg_profit, 235_000.0);
        assert_eq!(groups[1].deal_type, "commercial");
        assert!(groups[1].avg_profit < groups[0].avg_profit);
    }

    #[test]
    fn test_grouping_averages_within_type() {
        let mut a = Deal::new("A".to_string(), "test".to_string());
        a.deal_type = Some("residential".to_string());
        let mut b = Deal::new("B".to_string(), "test".to_string());
        b.deal_type = Some("residential".to_string());

        let pro_a = scenario_proforma(a.id.clone());
        // Identical but with zero purchase price: profit = 235k + 210k
        let mut pro_b = scenario_proforma(b.id.clone());
        pro_b.purchase_price = 0.0;

        let deals = vec![a, b];
        let proformas = vec![pro_a, pro_b];
        let index = index_by_deal(&proformas);
        let groups = profit_by_deal_type(&deals, &index, &ProfitAssumptions::default());

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].deal_count, 2);
        let expected_b = 1_000_000.0 - 30_000.0 - (500_000.0 + 25_000.0);
        assert_eq!(groups[0].total_profit, 235_000.0 + expected_b);
        assert_eq!(groups[0].avg_profit, (235_000.0 + expected_b) / 2.0);
    }

    #[test]
    fn test_untyped_deals_bucket_as_unknown() {
        let deal = Deal::new("Mystery".to_string(), "test".to_string());
        let pro = scenario_proforma(deal.id.clone());
        let deals = vec![deal];
        let proformas = vec![pro];
        let index = index_by_deal(&proformas);
        let groups = profit_by_deal_type(&deals, &index, &ProfitAssumptions::default());

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].deal_type, "unknown");
    }

    #[test]
    fn test_deals_without_proforma_are_skipped() {
        let deal = Deal::new("No worksheet".to_string(), "test".to_string());
        let deals = vec![deal];
        let index = ProformaIndex::new();
        let groups = profit_by_deal_type(&deals, &index, &ProfitAssumptions::default());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_empty_inputs_give_empty_grouping() {
        let index = ProformaIndex::new();
        let groups = profit_by_deal_type(&[], &index, &ProfitAssumptions::default());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_tied_averages_sort_by_name() {
        let mut a = Deal::new("A".to_string(), "test".to_string());
        a.deal_type = Some("mixed_use".to_string());
        let mut b = Deal::new("B".to_string(), "test".to_string());
        b.deal_type = Some("industrial".to_string());

        let pro_a = scenario_proforma(a.id.clone());
        let pro_b = scenario_proforma(b.id.clone());

        let deals = vec![a, b];
        let proformas = vec![pro_a, pro_b];
        let index = index_by_deal(&proformas);
        let groups = profit_by_deal_type(&deals, &index, &ProfitAssumptions::default());

        assert_eq!(groups[0].deal_type, "industrial");
        assert_eq!(groups[1].deal_type, "mixed_use");
    }
}
