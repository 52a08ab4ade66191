//! `plat health` command - pipeline process health report

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::entity_cmd::load_entities;
use crate::cli::output::effective_format;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::core::project::Project;
use crate::entities::deal::Deal;
use crate::entities::task::Task;
use crate::metrics::{assess_process_health, format_days, format_percent, ProcessHealth};

#[derive(clap::Args, Debug)]
pub struct HealthArgs {}

pub fn run(_args: HealthArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;

    let deals: Vec<Deal> = load_entities(&project, EntityPrefix::Deal)
        .into_iter()
        .map(|(d, _)| d)
        .collect();
    let tasks: Vec<Task> = load_entities(&project, EntityPrefix::Task)
        .into_iter()
        .map(|(t, _)| t)
        .collect();

    let today = chrono::Local::now().date_naive();
    let health = assess_process_health(&deals, &tasks, today);

    match effective_format(global.format) {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&health).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&health).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => print_health(&health),
    }

    Ok(())
}

/// Color a right-padded sigma level by how comfortable it is
///
/// 4.0 and up reads healthy, 2.5 to 4.0 needs watching, below that is a
/// process problem. Padding happens before styling so the escape codes
/// don't break column alignment.
fn sigma_cell(sigma: Option<f64>) -> String {
    match sigma {
        Some(s) => {
            let padded = format!("{:>12}", format!("{:.1}σ", s));
            if s >= 4.0 {
                style(padded).green().to_string()
            } else if s >= 2.5 {
                style(padded).yellow().to_string()
            } else {
                style(padded).red().to_string()
            }
        }
        None => format!("{:>12}", "-"),
    }
}

fn opt_metric(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

fn print_health(health: &ProcessHealth) {
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Pipeline process health").bold());
    println!("{}", style("─".repeat(60)).dim());

    println!(
        "{}: {} active | {} closed | {} dead",
        style("Deals").bold(),
        health.active_deals,
        style(health.closed_deals).green(),
        style(health.dead_deals).red()
    );
    println!(
        "  Conversion rate     {:>12}   (closed / closed+dead)",
        opt_metric(health.conversion_rate.map(format_percent))
    );
    println!(
        "  Avg cycle           {:>12}   (contract to close)",
        opt_metric(health.avg_cycle_days.map(format_days))
    );
    println!("  Deal sigma          {}", sigma_cell(health.deal_sigma));
    println!();

    let overdue = if health.overdue_tasks > 0 {
        style(health.overdue_tasks).red().to_string()
    } else {
        health.overdue_tasks.to_string()
    };
    println!(
        "{}: {} completed | {} overdue",
        style("Tasks").bold(),
        health.completed_tasks,
        overdue
    );
    println!(
        "  On-time rate        {:>12}",
        opt_metric(health.task_on_time_rate.map(format_percent))
    );
    println!("  Task sigma          {}", sigma_cell(health.task_sigma));

    println!("{}", style("─".repeat(60)).dim());

    if health.conversion_rate.is_none() && health.completed_tasks == 0 {
        println!("Not enough history yet; rates appear once deals and tasks close.");
    }
}
