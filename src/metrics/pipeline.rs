//! Pipeline aggregation: deal value by stage and by calendar quarter

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::entities::deal::{Deal, DealStage};

/// Deal count and value bucketed into one calendar quarter
#[derive(Debug, Clone, PartialEq)]
pub struct QuarterSummary {
    pub year: i32,
    /// 1 through 4
    pub quarter: u32,
    pub deal_count: usize,
    pub total_value: f64,
}

impl QuarterSummary {
    /// Display label like `2024 Q3`
    pub fn label(&self) -> String {
        format!("{} Q{}", self.year, self.quarter)
    }
}

/// Deal count and value for one pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub struct StageSummary {
    pub stage: DealStage,
    pub deal_count: usize,
    pub total_value: f64,
}

/// The calendar quarter a date falls in
pub fn quarter_of(date: NaiveDate) -> (i32, u32) {
    (date.year(), (date.month() - 1) / 3 + 1)
}

/// The date a deal buckets under: close, else contract, else creation
fn representative_date(deal: &Deal) -> NaiveDate {
    deal.close_date
        .or(deal.contract_date)
        .unwrap_or_else(|| deal.created.date_naive())
}

/// Sum estimated value per quarter, chronological
pub fn value_by_quarter(deals: &[Deal]) -> Vec<QuarterSummary> {
    let mut buckets: HashMap<(i32, u32), (usize, f64)> = HashMap::new();
    for deal in deals {
        let key = quarter_of(representative_date(deal));
        let entry = buckets.entry(key).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += deal.estimated_value;
    }

    let mut quarters: Vec<QuarterSummary> = buckets
        .into_iter()
        .map(|((year, quarter), (deal_count, total_value))| QuarterSummary {
            year,
            quarter,
            deal_count,
            total_value,
        })
        .collect();
    quarters.sort_by_key(|q| (q.year, q.quarter));
    quarters
}

/// Deal count and value per stage, in pipeline order, zero rows included
pub fn deals_by_stage(deals: &[Deal]) -> Vec<StageSummary> {
    DealStage::all()
        .iter()
        .map(|stage| {
            let in_stage = deals.iter().filter(|d| d.stage == *stage);
            let (deal_count, total_value) = in_stage
                .fold((0usize, 0.0f64), |(n, v), d| (n + 1, v + d.estimated_value));
            StageSummary {
                stage: *stage,
                deal_count,
                total_value,
            }
        })
        .collect()
}
