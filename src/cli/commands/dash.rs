//! `plat dash` command - pipeline dashboard

use console::style;
use miette::Result;

use crate::cli::entity_cmd::load_entities;
use crate::cli::viz::{
    render_quarter_chart, render_stage_funnel, render_value_trend, DEFAULT_CHART_WIDTH,
};
use crate::cli::GlobalOpts;
use crate::core::identity::EntityPrefix;
use crate::core::project::Project;
use crate::core::Config;
use crate::entities::deal::Deal;
use crate::entities::proforma::Proforma;
use crate::entities::task::Task;
use crate::metrics::{
    assess_process_health, deals_by_stage, format_currency, format_currency_compact, format_days,
    format_percent, index_by_deal, profit_by_deal_type, value_by_quarter,
};

#[derive(clap::Args, Debug)]
pub struct DashArgs {
    /// Chart width in characters
    #[arg(long, short = 'w', default_value_t = DEFAULT_CHART_WIDTH)]
    pub width: usize,

    /// Skip the braille value trend chart
    #[arg(long)]
    pub no_trend: bool,

    /// Show only the most recent N quarters
    #[arg(long, short = 'q')]
    pub quarters: Option<usize>,
}

pub fn run(args: DashArgs, _global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;

    let deals: Vec<Deal> = load_entities(&project, EntityPrefix::Deal)
        .into_iter()
        .map(|(d, _)| d)
        .collect();
    let tasks: Vec<Task> = load_entities(&project, EntityPrefix::Task)
        .into_iter()
        .map(|(t, _)| t)
        .collect();
    let proformas: Vec<Proforma> = load_entities(&project, EntityPrefix::Pro)
        .into_iter()
        .map(|(p, _)| p)
        .collect();

    if deals.is_empty() {
        println!("No deals yet.");
        println!();
        println!(
            "Start the pipeline with: {}",
            style("plat deal new --title \"...\"").yellow()
        );
        return Ok(());
    }

    let total_value: f64 = deals.iter().map(|d| d.estimated_value).sum();
    let active = deals.iter().filter(|d| d.stage.is_active()).count();

    println!();
    println!(
        "  {}  {} deals | {} active | {} pipeline value",
        style("PIPELINE").bold(),
        deals.len(),
        active,
        style(format_currency_compact(total_value)).green()
    );
    println!();

    // Stage funnel
    let stages = deals_by_stage(&deals);
    println!("{}", style("Deals by stage").bold());
    print!("{}", render_stage_funnel(&stages, args.width.min(40)));
    println!();

    // Quarterly value, oldest first; --quarters keeps the tail
    let mut quarters = value_by_quarter(&deals);
    if let Some(n) = args.quarters {
        let skip = quarters.len().saturating_sub(n);
        quarters.drain(..skip);
    }
    if !quarters.is_empty() {
        println!("{}", style("Value by quarter").bold());
        print!("{}", render_quarter_chart(&quarters, args.width.min(40)));
        println!();
    }

    if !args.no_trend && quarters.len() >= 2 {
        println!("{}", style("Value trend").bold());
        print!("{}", render_value_trend(&quarters, 60, 12));
        println!();
    }

    // Profitability by deal type, when proformas exist
    let index = index_by_deal(&proformas);
    let assumptions = Config::load().profit_assumptions();
    let by_type = profit_by_deal_type(&deals, &index, &assumptions);
    if !by_type.is_empty() {
        println!("{}", style("Profit by deal type").bold());
        for group in &by_type {
            println!(
                "  {:<16} {:>3} deal{}  avg {:>12}  total {:>12}",
                group.deal_type,
                group.deal_count,
                if group.deal_count == 1 { " " } else { "s" },
                format_currency(group.avg_profit),
                format_currency(group.total_profit)
            );
        }
        println!();
    }

    // Compact health strip
    let today = chrono::Local::now().date_naive();
    let health = assess_process_health(&deals, &tasks, today);
    let conversion = health
        .conversion_rate
        .map(format_percent)
        .unwrap_or_else(|| "-".to_string());
    let cycle = health
        .avg_cycle_days
        .map(format_days)
        .unwrap_or_else(|| "-".to_string());
    let overdue = if health.overdue_tasks > 0 {
        style(format!("{} overdue", health.overdue_tasks))
            .red()
            .to_string()
    } else {
        "0 overdue".to_string()
    };
    println!(
        "  {}  conversion {} | cycle {} | tasks {}",
        style("HEALTH").bold(),
        conversion,
        cycle,
        overdue
    );
    println!(
        "  Full report: {}",
        style("plat health").yellow()
    );
    println!();

    Ok(())
}
