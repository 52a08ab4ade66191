//! `plat pro` command - proforma worksheets

use clap::{Subcommand, ValueEnum};
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::entity_cmd::{
    find_entity, load_entities, open_in_editor, output_new_entity, print_list_footer,
    print_no_results, record_short_ids, EntityConfig,
};
use crate::cli::helpers::format_short_id;
use crate::cli::output::effective_format;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::core::Config;
use crate::entities::deal::Deal;
use crate::entities::proforma::Proforma;
use crate::metrics::{format_currency, format_percent, proforma_profit, ProfitBreakdown};
use crate::schema::template::{TemplateContext, TemplateGenerator};

#[derive(Subcommand, Debug)]
pub enum ProCommands {
    /// List proformas with computed profit
    List(ListArgs),

    /// Create a new proforma for a deal
    New(NewArgs),

    /// Show a proforma with its full cost breakdown
    Show(ShowArgs),

    /// Edit a proforma in your editor
    Edit(EditArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Title,
    Deal,
    Units,
    Revenue,
    Costs,
    Profit,
    Margin,
    Author,
    Created,
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListColumn::Id => write!(f, "id"),
            ListColumn::Title => write!(f, "title"),
            ListColumn::Deal => write!(f, "deal"),
            ListColumn::Units => write!(f, "units"),
            ListColumn::Revenue => write!(f, "revenue"),
            ListColumn::Costs => write!(f, "costs"),
            ListColumn::Profit => write!(f, "profit"),
            ListColumn::Margin => write!(f, "margin"),
            ListColumn::Author => write!(f, "author"),
            ListColumn::Created => write!(f, "created"),
        }
    }
}

const PRO_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("title", "TITLE", 28),
    ColumnDef::new("deal", "DEAL", 10),
    ColumnDef::new("units", "UNITS", 6),
    ColumnDef::new("revenue", "REVENUE", 14),
    ColumnDef::new("costs", "COSTS", 14),
    ColumnDef::new("profit", "PROFIT", 14),
    ColumnDef::new("margin", "MARGIN", 8),
    ColumnDef::new("author", "AUTHOR", 14),
    ColumnDef::new("created", "CREATED", 12),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by deal (ID, short ID, or fuzzy title)
    #[arg(long, short = 'd')]
    pub deal: Option<String>,

    /// Filter by author (substring match)
    #[arg(long, short = 'a')]
    pub author: Option<String>,

    /// Search in title and notes (case-insensitive substring)
    #[arg(long)]
    pub search: Option<String>,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Title,
        ListColumn::Deal,
        ListColumn::Units,
        ListColumn::Profit,
        ListColumn::Margin
    ])]
    pub columns: Vec<ListColumn>,

    /// Sort by field
    #[arg(long, default_value = "created")]
    pub sort: ListColumn,

    /// Reverse sort order
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Limit output to N items
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show count only, not the items
    #[arg(long)]
    pub count: bool,

    /// Show full ID column (hidden by default since SHORT is always shown)
    #[arg(long)]
    pub show_id: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Proforma title (if not provided, uses placeholder)
    #[arg(long)]
    pub title: Option<String>,

    /// Deal this worksheet belongs to (ID, short ID, or fuzzy title)
    #[arg(long, short = 'd')]
    pub deal: Option<String>,

    /// Number of units (lots, homes, pads)
    #[arg(long, short = 'u')]
    pub units: Option<u32>,

    /// Sales price per unit in dollars
    #[arg(long)]
    pub sales_price: Option<f64>,

    /// Direct cost per unit in dollars
    #[arg(long)]
    pub direct_cost: Option<f64>,

    /// Land purchase price in dollars
    #[arg(long)]
    pub purchase_price: Option<f64>,

    /// Use interactive wizard to fill in fields
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Open in editor after creation
    #[arg(long, short = 'e')]
    pub edit: bool,

    /// Don't open in editor after creation
    #[arg(long)]
    pub no_edit: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Proforma ID, short ID (PRO@N), or fuzzy title match
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Proforma ID, short ID (PRO@N), or fuzzy title match
    pub id: String,
}

const ENTITY_CONFIG: EntityConfig = EntityConfig {
    prefix: EntityPrefix::Pro,
    name: "proforma",
    name_plural: "proformas",
};

const DEAL_CONFIG: EntityConfig = EntityConfig {
    prefix: EntityPrefix::Deal,
    name: "deal",
    name_plural: "deals",
};

pub fn run(cmd: ProCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProCommands::List(args) => run_list(args, global),
        ProCommands::New(args) => run_new(args, global),
        ProCommands::Show(args) => run_show(args, global),
        ProCommands::Edit(args) => run_edit(args),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let assumptions = Config::load().profit_assumptions();

    let deal_filter = match args.deal {
        Some(ref query) => {
            let (deal, _) = find_entity::<Deal>(&project, &DEAL_CONFIG, query)?;
            Some(deal.id)
        }
        None => None,
    };

    let mut proformas: Vec<(Proforma, PathBuf, ProfitBreakdown)> =
        load_entities::<Proforma>(&project, EntityPrefix::Pro)
            .into_iter()
            .filter(|(proforma, _)| {
                if let Some(ref deal_id) = deal_filter {
                    if proforma.deal != *deal_id {
                        return false;
                    }
                }
                if let Some(ref author) = args.author {
                    if !proforma
                        .author
                        .to_lowercase()
                        .contains(&author.to_lowercase())
                    {
                        return false;
                    }
                }
                if let Some(ref search) = args.search {
                    let needle = search.to_lowercase();
                    let in_title = proforma.title.to_lowercase().contains(&needle);
                    let in_notes = proforma
                        .notes
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle));
                    if !in_title && !in_notes {
                        return false;
                    }
                }
                true
            })
            .map(|(proforma, path)| {
                let breakdown = proforma_profit(&proforma, &assumptions);
                (proforma, path, breakdown)
            })
            .collect();

    match args.sort {
        ListColumn::Id => proformas.sort_by(|a, b| a.0.id.cmp(&b.0.id)),
        ListColumn::Title => proformas.sort_by(|a, b| a.0.title.cmp(&b.0.title)),
        ListColumn::Deal => proformas.sort_by(|a, b| a.0.deal.cmp(&b.0.deal)),
        ListColumn::Units => {
            proformas.sort_by(|a, b| a.0.number_of_units.cmp(&b.0.number_of_units))
        }
        ListColumn::Revenue => {
            proformas.sort_by(|a, b| a.2.gross_revenue.total_cmp(&b.2.gross_revenue))
        }
        ListColumn::Costs => proformas.sort_by(|a, b| a.2.total_costs.total_cmp(&b.2.total_costs)),
        ListColumn::Profit => proformas.sort_by(|a, b| a.2.profit.total_cmp(&b.2.profit)),
        ListColumn::Margin => proformas.sort_by(|a, b| {
            a.2.margin_pct
                .unwrap_or(f64::NEG_INFINITY)
                .total_cmp(&b.2.margin_pct.unwrap_or(f64::NEG_INFINITY))
        }),
        ListColumn::Author => proformas.sort_by(|a, b| a.0.author.cmp(&b.0.author)),
        ListColumn::Created => proformas.sort_by(|a, b| a.0.created.cmp(&b.0.created)),
    }

    if args.reverse {
        proformas.reverse();
    }

    if let Some(limit) = args.limit {
        proformas.truncate(limit);
    }

    if args.count {
        println!("{}", proformas.len());
        return Ok(());
    }

    if proformas.is_empty() {
        print_no_results(ENTITY_CONFIG.name_plural);
        println!();
        println!(
            "Create one with: {}",
            style("plat pro new --deal DEAL@1").yellow()
        );
        return Ok(());
    }

    let short_ids = record_short_ids(&project, proformas.iter().map(|(p, _, _)| &p.id));

    let format = effective_format(global.format);
    match format {
        OutputFormat::Json => {
            let entities: Vec<&Proforma> = proformas.iter().map(|(p, _, _)| p).collect();
            let json = serde_json::to_string_pretty(&entities).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let entities: Vec<&Proforma> = proformas.iter().map(|(p, _, _)| p).collect();
            let yaml = serde_yml::to_string(&entities).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Path => {
            for (_, path, _) in &proformas {
                println!("{}", path.display());
            }
        }
        _ => {
            let column_names: Vec<String> = args.columns.iter().map(|c| c.to_string()).collect();
            let mut visible: Vec<&str> = column_names.iter().map(String::as_str).collect();
            if args.show_id && !visible.contains(&"id") {
                visible.insert(0, "id");
            }

            let rows: Vec<TableRow> = proformas
                .iter()
                .map(|(proforma, _, breakdown)| pro_to_row(proforma, breakdown, &short_ids))
                .collect();

            let formatter = TableFormatter::new(PRO_COLUMNS);
            formatter.output(&rows, format, &visible);

            if format == OutputFormat::Table {
                print_list_footer(proformas.len(), &ENTITY_CONFIG);
            }
        }
    }

    Ok(())
}

fn pro_to_row(
    proforma: &Proforma,
    breakdown: &ProfitBreakdown,
    short_ids: &ShortIdIndex,
) -> TableRow {
    let deal_label = short_ids
        .alias_of(&proforma.deal.to_string())
        .map(String::from)
        .unwrap_or_else(|| format_short_id(&proforma.deal));
    let margin = breakdown
        .margin_pct
        .map(format_percent)
        .unwrap_or_else(|| "-".to_string());

    TableRow::new(proforma.id.to_string(), short_ids)
        .cell("id", CellValue::Id(proforma.id.to_string()))
        .cell("title", CellValue::Text(proforma.title.clone()))
        .cell("deal", CellValue::Text(deal_label))
        .cell("units", CellValue::Count(proforma.number_of_units as usize))
        .cell("revenue", CellValue::Money(breakdown.gross_revenue))
        .cell("costs", CellValue::Money(breakdown.total_costs))
        .cell("profit", CellValue::Money(breakdown.profit))
        .cell("margin", CellValue::Text(margin))
        .cell("author", CellValue::Text(proforma.author.clone()))
        .cell("created", CellValue::Date(proforma.created))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load();
    let theme = ColorfulTheme::default();

    let (title, deal_query, units, sales_price, direct_cost) = if args.interactive {
        let title: String = Input::with_theme(&theme)
            .with_prompt("Title")
            .interact_text()
            .into_diagnostic()?;

        let deal_query: String = Input::with_theme(&theme)
            .with_prompt("Deal (ID, short ID, or title)")
            .interact_text()
            .into_diagnostic()?;

        let units_input: String = Input::with_theme(&theme)
            .with_prompt("Number of units")
            .default("0".to_string())
            .interact_text()
            .into_diagnostic()?;
        let units: u32 = units_input
            .trim()
            .parse()
            .map_err(|_| miette::miette!("Invalid unit count: '{}'", units_input))?;

        let sales_input: String = Input::with_theme(&theme)
            .with_prompt("Sales price per unit ($)")
            .default("0".to_string())
            .interact_text()
            .into_diagnostic()?;
        let sales_price: f64 = sales_input
            .trim()
            .parse()
            .map_err(|_| miette::miette!("Invalid dollar amount: '{}'", sales_input))?;

        let direct_input: String = Input::with_theme(&theme)
            .with_prompt("Direct cost per unit ($)")
            .default("0".to_string())
            .interact_text()
            .into_diagnostic()?;
        let direct_cost: f64 = direct_input
            .trim()
            .parse()
            .map_err(|_| miette::miette!("Invalid dollar amount: '{}'", direct_input))?;

        (title, Some(deal_query), units, sales_price, direct_cost)
    } else {
        (
            args.title.unwrap_or_else(|| "Base Case".to_string()),
            args.deal.clone(),
            args.units.unwrap_or(0),
            args.sales_price.unwrap_or(0.0),
            args.direct_cost.unwrap_or(0.0),
        )
    };

    let deal_query = deal_query.ok_or_else(|| {
        miette::miette!("A proforma must reference a deal. Pass --deal or use -i.")
    })?;
    let (deal, _) = find_entity::<Deal>(&project, &DEAL_CONFIG, &deal_query)?;

    let id = EntityId::new(EntityPrefix::Pro);

    let generator = TemplateGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let mut ctx = TemplateContext::new(id.clone(), config.author())
        .with_title(&title)
        .with_deal_ref(deal.id.clone())
        .with_number_of_units(units)
        .with_sales_price_per_unit(sales_price)
        .with_direct_cost_per_unit(direct_cost);
    if let Some(price) = args.purchase_price {
        ctx = ctx.with_purchase_price(price);
    }

    let yaml_content = generator
        .generate_proforma(&ctx)
        .map_err(|e| miette::miette!("{}", e))?;

    let output_dir = project.entity_dir(EntityPrefix::Pro);
    if !output_dir.exists() {
        fs::create_dir_all(&output_dir).into_diagnostic()?;
    }
    let file_path = output_dir.join(format!("{}{}", id, crate::core::project::ENTITY_EXT));
    fs::write(&file_path, &yaml_content).into_diagnostic()?;

    let short_ids = record_short_ids(&project, [&id]);
    let short_id = short_ids.alias_of(&id.to_string()).map(String::from);

    output_new_entity(
        &id,
        &file_path,
        short_id,
        ENTITY_CONFIG.name,
        &title,
        global,
    );
    if !matches!(
        global.format,
        OutputFormat::Id | OutputFormat::ShortId | OutputFormat::Path
    ) {
        println!(
            "   {} deal {}",
            style("→").dim(),
            style(&deal.title).yellow()
        );
    }

    if args.edit || (!args.no_edit && !args.interactive) {
        println!();
        println!("Opening in {}...", style(config.editor()).yellow());
        config.run_editor(&file_path).into_diagnostic()?;
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (proforma, path) = find_entity::<Proforma>(&project, &ENTITY_CONFIG, &args.id)?;

    match effective_format(global.format) {
        OutputFormat::Yaml => {
            let content = fs::read_to_string(&path).into_diagnostic()?;
            print!("{}", content);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&proforma).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => println!("{}", proforma.id),
        OutputFormat::ShortId => {
            let short_ids = ShortIdIndex::load(&project);
            println!(
                "{}",
                short_ids
                    .alias_of(&proforma.id.to_string())
                    .map(String::from)
                    .unwrap_or_else(|| format_short_id(&proforma.id))
            );
        }
        OutputFormat::Path => println!("{}", path.display()),
        _ => print_proforma(&proforma, &project),
    }

    Ok(())
}

fn print_proforma(proforma: &Proforma, project: &Project) {
    let config = Config::load();
    let assumptions = config.profit_assumptions();
    let breakdown = proforma_profit(proforma, &assumptions);
    let short_ids = ShortIdIndex::load(project);

    let deal_title = load_entities::<Deal>(project, EntityPrefix::Deal)
        .into_iter()
        .find(|(d, _)| d.id == proforma.deal)
        .map(|(d, _)| d.title);
    let deal_label = short_ids
        .alias_of(&proforma.deal.to_string())
        .map(String::from)
        .unwrap_or_else(|| format_short_id(&proforma.deal));

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("ID").bold(),
        style(&proforma.id.to_string()).cyan()
    );
    println!(
        "{}: {}",
        style("Title").bold(),
        style(&proforma.title).yellow()
    );
    match deal_title {
        Some(title) => println!("{}: {} ({})", style("Deal").bold(), title, deal_label),
        None => println!("{}: {}", style("Deal").bold(), deal_label),
    }
    println!("{}: {}", style("Units").bold(), proforma.number_of_units);
    println!("{}", style("─".repeat(60)).dim());

    let contingency_pct = proforma
        .contingency_percentage
        .unwrap_or(assumptions.contingency_pct);
    let commission_pct = proforma
        .sales_commission_percentage
        .unwrap_or(assumptions.sales_commission_pct);

    println!("{}", style("Revenue").bold());
    println!(
        "  Gross revenue          {:>14}   ({} x {}/unit)",
        format_currency(breakdown.gross_revenue),
        proforma.number_of_units,
        format_currency(proforma.sales_price_per_unit)
    );
    println!(
        "  Sales commission       {:>14}   ({} of gross)",
        style(format_currency(breakdown.sales_commission)).red(),
        format_percent(commission_pct)
    );
    println!(
        "  Net revenue            {:>14}",
        format_currency(breakdown.net_revenue)
    );
    println!();
    println!("{}", style("Costs").bold());
    println!(
        "  Purchase price         {:>14}",
        format_currency(proforma.purchase_price)
    );
    println!(
        "  Development costs      {:>14}",
        format_currency(proforma.development_costs)
    );
    println!(
        "  Soft costs             {:>14}",
        format_currency(proforma.soft_costs)
    );
    println!(
        "  Direct costs           {:>14}   ({} x {}/unit)",
        format_currency(breakdown.total_direct_costs),
        proforma.number_of_units,
        format_currency(proforma.direct_cost_per_unit)
    );
    println!(
        "  Contingency            {:>14}   ({})",
        format_currency(breakdown.contingency),
        format_percent(contingency_pct)
    );
    println!(
        "  Financing costs        {:>14}",
        format_currency(proforma.financing_costs)
    );
    println!(
        "  Total costs            {:>14}",
        format_currency(breakdown.total_costs)
    );
    println!("{}", style("─".repeat(60)).dim());

    let profit_styled = if breakdown.profit >= 0.0 {
        style(format_currency(breakdown.profit)).green()
    } else {
        style(format_currency(breakdown.profit)).red()
    };
    let margin = breakdown
        .margin_pct
        .map(format_percent)
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{}: {}   {}: {}",
        style("Profit").bold(),
        profit_styled,
        style("Margin").bold(),
        margin
    );
    if proforma.number_of_units > 0 {
        println!(
            "{}: {}",
            style("Profit per unit").bold(),
            format_currency(breakdown.profit / proforma.number_of_units as f64)
        );
    }
    if let Some(ref notes) = proforma.notes {
        let trimmed = notes.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            println!("{}", style("─".repeat(60)).dim());
            println!("{}", trimmed);
        }
    }

    println!(
        "{}: {} | {}: {} | {}: {}",
        style("Author").dim(),
        proforma.author,
        style("Created").dim(),
        proforma.created.format("%Y-%m-%d %H:%M"),
        style("Revision").dim(),
        proforma.revision
    );
}

fn run_edit(args: EditArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (proforma, path) = find_entity::<Proforma>(&project, &ENTITY_CONFIG, &args.id)?;
    open_in_editor(&path, &proforma.id)
}
