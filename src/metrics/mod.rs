//! Derived business metrics over deals, proformas, and tasks
//!
//! Everything here is pure computation: entities in, numbers out. Commands
//! own all I/O and rendering.

pub mod currency;
pub mod health;
pub mod pipeline;
pub mod profit;
pub mod sigma;
pub mod timeline;

pub use currency::{format_currency, format_currency_compact, format_days, format_percent};
pub use health::{assess_process_health, ProcessHealth};
pub use pipeline::{deals_by_stage, quarter_of, value_by_quarter, QuarterSummary, StageSummary};
pub use profit::{
    index_by_deal, profit_by_deal_type, proforma_profit, DealTypeProfit, ProfitAssumptions,
    ProfitBreakdown, ProformaIndex,
};
pub use sigma::sigma_level;
pub use timeline::{layout, MilestonePoint, PhaseSpan, TimelineLayout};
