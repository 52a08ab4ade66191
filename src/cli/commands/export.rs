//! `plat export` command - CSV dumps for spreadsheets

use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli::entity_cmd::load_entities;
use crate::cli::GlobalOpts;
use crate::core::identity::EntityPrefix;
use crate::core::project::Project;
use crate::core::Config;
use crate::entities::contact::Contact;
use crate::entities::deal::Deal;
use crate::entities::proforma::Proforma;
use crate::entities::task::Task;
use crate::metrics::proforma_profit;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportKind {
    Deals,
    Tasks,
    Contacts,
    Proformas,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// What to export
    #[arg(value_enum)]
    pub what: ExportKind,

    /// Output file (stdout when omitted)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExportArgs, _global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;

    let out: Box<dyn Write> = match args.output {
        Some(ref path) => Box::new(File::create(path).into_diagnostic()?),
        None => Box::new(io::stdout()),
    };
    let mut writer = csv::Writer::from_writer(out);

    let count = match args.what {
        ExportKind::Deals => export_deals(&project, &mut writer)?,
        ExportKind::Tasks => export_tasks(&project, &mut writer)?,
        ExportKind::Contacts => export_contacts(&project, &mut writer)?,
        ExportKind::Proformas => export_proformas(&project, &mut writer)?,
    };
    writer.flush().into_diagnostic()?;

    // Stays quiet on stdout so pipes get clean CSV
    if let Some(ref path) = args.output {
        let noun = match args.what {
            ExportKind::Deals => "deals",
            ExportKind::Tasks => "tasks",
            ExportKind::Contacts => "contacts",
            ExportKind::Proformas => "proformas",
        };
        eprintln!(
            "{} Exported {} {} to {}",
            style("✓").green(),
            count,
            noun,
            style(path.display()).dim()
        );
    }

    Ok(())
}

fn opt_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn export_deals(project: &Project, writer: &mut csv::Writer<Box<dyn Write>>) -> Result<usize> {
    writer
        .write_record([
            "id",
            "title",
            "stage",
            "deal_type",
            "market",
            "estimated_value",
            "purchase_price",
            "contract_date",
            "close_date",
            "tags",
            "author",
            "created",
        ])
        .into_diagnostic()?;

    let deals = load_entities::<Deal>(project, EntityPrefix::Deal);
    for (deal, _) in &deals {
        writer
            .write_record([
                deal.id.to_string(),
                deal.title.clone(),
                deal.stage.to_string(),
                deal.deal_type.clone().unwrap_or_default(),
                deal.market.clone().unwrap_or_default(),
                format!("{:.2}", deal.estimated_value),
                format!("{:.2}", deal.purchase_price),
                opt_date(deal.contract_date),
                opt_date(deal.close_date),
                deal.tags.join(";"),
                deal.author.clone(),
                deal.created.to_rfc3339(),
            ])
            .into_diagnostic()?;
    }
    Ok(deals.len())
}

fn export_tasks(project: &Project, writer: &mut csv::Writer<Box<dyn Write>>) -> Result<usize> {
    writer
        .write_record([
            "id",
            "title",
            "status",
            "priority",
            "deal",
            "due_date",
            "completed_date",
            "tags",
            "author",
            "created",
        ])
        .into_diagnostic()?;

    let tasks = load_entities::<Task>(project, EntityPrefix::Task);
    for (task, _) in &tasks {
        writer
            .write_record([
                task.id.to_string(),
                task.title.clone(),
                task.status.to_string(),
                task.priority.to_string(),
                task.deal
                    .as_ref()
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                opt_date(task.due_date),
                opt_date(task.completed_date),
                task.tags.join(";"),
                task.author.clone(),
                task.created.to_rfc3339(),
            ])
            .into_diagnostic()?;
    }
    Ok(tasks.len())
}

fn export_contacts(project: &Project, writer: &mut csv::Writer<Box<dyn Write>>) -> Result<usize> {
    writer
        .write_record([
            "id", "name", "role", "company", "email", "phone", "deals", "tags", "author",
            "created",
        ])
        .into_diagnostic()?;

    let contacts = load_entities::<Contact>(project, EntityPrefix::Con);
    for (contact, _) in &contacts {
        let deals: Vec<String> = contact.links.deals.iter().map(|d| d.to_string()).collect();
        writer
            .write_record([
                contact.id.to_string(),
                contact.title.clone(),
                contact.role.to_string(),
                contact.company.clone().unwrap_or_default(),
                contact.email.clone().unwrap_or_default(),
                contact.phone.clone().unwrap_or_default(),
                deals.join(";"),
                contact.tags.join(";"),
                contact.author.clone(),
                contact.created.to_rfc3339(),
            ])
            .into_diagnostic()?;
    }
    Ok(contacts.len())
}

/// Proforma export includes the computed profit columns, so the spreadsheet
/// matches what `plat pro show` reports.
fn export_proformas(project: &Project, writer: &mut csv::Writer<Box<dyn Write>>) -> Result<usize> {
    writer
        .write_record([
            "id",
            "title",
            "deal",
            "number_of_units",
            "sales_price_per_unit",
            "direct_cost_per_unit",
            "purchase_price",
            "development_costs",
            "soft_costs",
            "financing_costs",
            "gross_revenue",
            "total_costs",
            "profit",
            "margin_pct",
            "author",
            "created",
        ])
        .into_diagnostic()?;

    let assumptions = Config::load().profit_assumptions();
    let proformas = load_entities::<Proforma>(project, EntityPrefix::Pro);
    for (proforma, _) in &proformas {
        let breakdown = proforma_profit(proforma, &assumptions);
        writer
            .write_record([
                proforma.id.to_string(),
                proforma.title.clone(),
                proforma.deal.to_string(),
                proforma.number_of_units.to_string(),
                format!("{:.2}", proforma.sales_price_per_unit),
                format!("{:.2}", proforma.direct_cost_per_unit),
                format!("{:.2}", proforma.purchase_price),
                format!("{:.2}", proforma.development_costs),
                format!("{:.2}", proforma.soft_costs),
                format!("{:.2}", proforma.financing_costs),
                format!("{:.2}", breakdown.gross_revenue),
                format!("{:.2}", breakdown.total_costs),
                format!("{:.2}", breakdown.profit),
                breakdown
                    .margin_pct
                    .map(|m| format!("{:.2}", m))
                    .unwrap_or_default(),
                proforma.author.clone(),
                proforma.created.to_rfc3339(),
            ])
            .into_diagnostic()?;
    }
    Ok(proformas.len())
}
