//! `plat deal` command - deal management

use clap::{Subcommand, ValueEnum};
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use std::fs;

use crate::cli::entity_cmd::{
    find_entity, load_entities, open_in_editor, output_new_entity, print_list_footer,
    print_no_results, record_short_ids, write_entity, EntityConfig,
};
use crate::cli::filters::StageFilter;
use crate::cli::helpers::{format_opt_date, format_short_id};
use crate::cli::output::effective_format;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::project::Project;
use crate::core::shortid::{parse_entity_reference, ShortIdIndex};
use crate::core::Config;
use crate::entities::contact::Contact;
use crate::entities::deal::{Deal, DealStage};
use crate::entities::proforma::Proforma;
use crate::entities::task::Task;
use crate::metrics::{format_currency, format_percent, index_by_deal, proforma_profit};
use crate::schema::template::{TemplateContext, TemplateGenerator};

#[derive(Subcommand, Debug)]
pub enum DealCommands {
    /// List deals with filtering
    List(ListArgs),

    /// Create a new deal
    New(NewArgs),

    /// Show a deal's details
    Show(ShowArgs),

    /// Edit a deal in your editor
    Edit(EditArgs),

    /// Move a deal to another pipeline stage
    Stage(StageArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Title,
    Stage,
    Type,
    Value,
    Market,
    Contacts,
    Author,
    Created,
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListColumn::Id => write!(f, "id"),
            ListColumn::Title => write!(f, "title"),
            ListColumn::Stage => write!(f, "stage"),
            ListColumn::Type => write!(f, "type"),
            ListColumn::Value => write!(f, "value"),
            ListColumn::Market => write!(f, "market"),
            ListColumn::Contacts => write!(f, "contacts"),
            ListColumn::Author => write!(f, "author"),
            ListColumn::Created => write!(f, "created"),
        }
    }
}

/// Column definitions for deal list output
const DEAL_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 17),
    ColumnDef::new("title", "TITLE", 30),
    ColumnDef::new("stage", "STAGE", 24),
    ColumnDef::new("type", "TYPE", 12),
    ColumnDef::new("value", "VALUE", 14),
    ColumnDef::new("market", "MARKET", 18),
    ColumnDef::new("contacts", "CONTACTS", 8),
    ColumnDef::new("author", "AUTHOR", 14),
    ColumnDef::new("created", "CREATED", 12),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by stage
    #[arg(long, short = 's', default_value = "active")]
    pub stage: StageFilter,

    /// Filter by deal type (exact match)
    #[arg(long, short = 't')]
    pub deal_type: Option<String>,

    /// Filter by market (exact match)
    #[arg(long, short = 'm')]
    pub market: Option<String>,

    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Filter by author (substring match)
    #[arg(long, short = 'a')]
    pub author: Option<String>,

    /// Search in title and description (case-insensitive substring)
    #[arg(long)]
    pub search: Option<String>,

    /// Only deals at or above this estimated value
    #[arg(long, value_name = "DOLLARS")]
    pub min_value: Option<f64>,

    /// Show deals created in the last N days
    #[arg(long, value_name = "DAYS")]
    pub recent: Option<u32>,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Title,
        ListColumn::Stage,
        ListColumn::Type,
        ListColumn::Value,
        ListColumn::Market
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
    /// Deal title (if not provided, uses placeholder)
    #[arg(long)]
    pub title: Option<String>,

    /// Deal type (e.g. residential, commercial)
    #[arg(long, short = 't')]
    pub deal_type: Option<String>,

    /// Market / submarket label
    #[arg(long, short = 'm')]
    pub market: Option<String>,

    /// Estimated total value in dollars
    #[arg(long, short = 'v')]
    pub value: Option<f64>,

    /// Land purchase price in dollars
    #[arg(long)]
    pub purchase_price: Option<f64>,

    /// Link a contact (ID or short ID; can repeat)
    #[arg(long, short = 'C')]
    pub contact: Vec<String>,

    /// Tags (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

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
    /// Deal ID, short ID (DEAL@N), or fuzzy title match
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Deal ID, short ID (DEAL@N), or fuzzy title match
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct StageArgs {
    /// Deal ID, short ID (DEAL@N), or fuzzy title match
    pub id: String,

    /// Target stage (prompts when omitted)
    pub stage: Option<String>,

    /// Allow a transition outside the normal pipeline order
    #[arg(long)]
    pub force: bool,
}

/// Entity configuration for deals
const ENTITY_CONFIG: EntityConfig = EntityConfig {
    prefix: EntityPrefix::Deal,
    name: "deal",
    name_plural: "deals",
};

/// Run a deal subcommand
pub fn run(cmd: DealCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DealCommands::List(args) => run_list(args, global),
        DealCommands::New(args) => run_new(args, global),
        DealCommands::Show(args) => run_show(args, global),
        DealCommands::Edit(args) => run_edit(args),
        DealCommands::Stage(args) => run_stage(args),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;

    let mut deals: Vec<(Deal, std::path::PathBuf)> =
        load_entities::<Deal>(&project, EntityPrefix::Deal)
            .into_iter()
            .filter(|(deal, _)| {
                if !args.stage.matches(&deal.stage) {
                    return false;
                }
                if let Some(ref deal_type) = args.deal_type {
                    if !deal
                        .deal_type
                        .as_deref()
                        .is_some_and(|t| t.eq_ignore_ascii_case(deal_type))
                    {
                        return false;
                    }
                }
                if let Some(ref market) = args.market {
                    if !deal
                        .market
                        .as_deref()
                        .is_some_and(|m| m.eq_ignore_ascii_case(market))
                    {
                        return false;
                    }
                }
                if let Some(ref tag) = args.tag {
                    if !deal.tags.iter().any(|t| t == tag) {
                        return false;
                    }
                }
                if let Some(ref author) = args.author {
                    if !deal.author.to_lowercase().contains(&author.to_lowercase()) {
                        return false;
                    }
                }
                if let Some(ref search) = args.search {
                    let needle = search.to_lowercase();
                    let in_title = deal.title.to_lowercase().contains(&needle);
                    let in_description = deal
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle));
                    if !in_title && !in_description {
                        return false;
                    }
                }
                if let Some(min_value) = args.min_value {
                    if deal.estimated_value < min_value {
                        return false;
                    }
                }
                args.recent.map_or(true, |days| {
                    let cutoff = chrono::Utc::now() - chrono::Duration::days(days as i64);
                    deal.created >= cutoff
                })
            })
            .collect();

    match args.sort {
        ListColumn::Id => deals.sort_by(|a, b| a.0.id.cmp(&b.0.id)),
        ListColumn::Title => deals.sort_by(|a, b| a.0.title.cmp(&b.0.title)),
        ListColumn::Stage => deals.sort_by(|a, b| a.0.stage.as_str().cmp(b.0.stage.as_str())),
        ListColumn::Type => deals.sort_by(|a, b| a.0.deal_type.cmp(&b.0.deal_type)),
        ListColumn::Value => {
            deals.sort_by(|a, b| a.0.estimated_value.total_cmp(&b.0.estimated_value))
        }
        ListColumn::Market => deals.sort_by(|a, b| a.0.market.cmp(&b.0.market)),
        ListColumn::Contacts => {
            deals.sort_by(|a, b| a.0.links.contacts.len().cmp(&b.0.links.contacts.len()))
        }
        ListColumn::Author => deals.sort_by(|a, b| a.0.author.cmp(&b.0.author)),
        ListColumn::Created => deals.sort_by(|a, b| a.0.created.cmp(&b.0.created)),
    }

    if args.reverse {
        deals.reverse();
    }

    if let Some(limit) = args.limit {
        deals.truncate(limit);
    }

    if args.count {
        println!("{}", deals.len());
        return Ok(());
    }

    if deals.is_empty() {
        print_no_results(ENTITY_CONFIG.name_plural);
        println!();
        println!("Create one with: {}", style("plat deal new").yellow());
        return Ok(());
    }

    let short_ids = record_short_ids(&project, deals.iter().map(|(d, _)| &d.id));

    let format = effective_format(global.format);
    match format {
        OutputFormat::Json => {
            let entities: Vec<&Deal> = deals.iter().map(|(d, _)| d).collect();
            let json = serde_json::to_string_pretty(&entities).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let entities: Vec<&Deal> = deals.iter().map(|(d, _)| d).collect();
            let yaml = serde_yml::to_string(&entities).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Path => {
            for (_, path) in &deals {
                println!("{}", path.display());
            }
        }
        _ => {
            let column_names: Vec<String> = args.columns.iter().map(|c| c.to_string()).collect();
            let mut visible: Vec<&str> = column_names.iter().map(String::as_str).collect();
            if args.show_id && !visible.contains(&"id") {
                visible.insert(0, "id");
            }

            let rows: Vec<TableRow> = deals
                .iter()
                .map(|(deal, _)| deal_to_row(deal, &short_ids))
                .collect();

            let formatter = TableFormatter::new(DEAL_COLUMNS);
            formatter.output(&rows, format, &visible);

            if format == OutputFormat::Table {
                print_list_footer(deals.len(), &ENTITY_CONFIG);
            }
        }
    }

    Ok(())
}

/// Convert a deal to a table row
fn deal_to_row(deal: &Deal, short_ids: &ShortIdIndex) -> TableRow {
    TableRow::new(deal.id.to_string(), short_ids)
        .cell("id", CellValue::Id(deal.id.to_string()))
        .cell("title", CellValue::Text(deal.title.clone()))
        .cell("stage", CellValue::Text(deal.stage.to_string()))
        .cell(
            "type",
            CellValue::Text(deal.deal_type_or_unknown().to_string()),
        )
        .cell("value", CellValue::Money(deal.estimated_value))
        .cell(
            "market",
            CellValue::Text(deal.market.clone().unwrap_or_else(|| "-".to_string())),
        )
        .cell("contacts", CellValue::Count(deal.links.contacts.len()))
        .cell("author", CellValue::Text(deal.author.clone()))
        .cell("created", CellValue::Date(deal.created))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load();
    let theme = ColorfulTheme::default();

    let (title, deal_type, market, value) = if args.interactive {
        let title: String = Input::with_theme(&theme)
            .with_prompt("Title")
            .interact_text()
            .into_diagnostic()?;

        let deal_type: String = Input::with_theme(&theme)
            .with_prompt("Deal type (optional)")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;

        let market: String = Input::with_theme(&theme)
            .with_prompt("Market (optional)")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;

        let value_input: String = Input::with_theme(&theme)
            .with_prompt("Estimated value ($)")
            .default("0".to_string())
            .interact_text()
            .into_diagnostic()?;
        let value: f64 = value_input
            .trim()
            .parse()
            .map_err(|_| miette::miette!("Invalid dollar amount: '{}'", value_input))?;

        (
            title,
            (!deal_type.is_empty()).then_some(deal_type),
            (!market.is_empty()).then_some(market),
            value,
        )
    } else {
        (
            args.title.unwrap_or_else(|| "New Deal".to_string()),
            args.deal_type.clone(),
            args.market.clone(),
            args.value.unwrap_or(0.0),
        )
    };

    let id = EntityId::new(EntityPrefix::Deal);

    let generator = TemplateGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let mut ctx = TemplateContext::new(id.clone(), config.author())
        .with_title(&title)
        .with_stage(DealStage::Prospecting.to_string())
        .with_estimated_value(value)
        .with_tags(args.tags.clone());
    if let Some(ref deal_type) = deal_type {
        ctx = ctx.with_deal_type(deal_type);
    }
    if let Some(ref market) = market {
        ctx = ctx.with_market(market);
    }
    if let Some(price) = args.purchase_price {
        ctx = ctx.with_purchase_price(price);
    }

    let yaml_content = generator
        .generate_deal(&ctx)
        .map_err(|e| miette::miette!("{}", e))?;

    let output_dir = project.entity_dir(EntityPrefix::Deal);
    if !output_dir.exists() {
        fs::create_dir_all(&output_dir).into_diagnostic()?;
    }
    let file_path = output_dir.join(format!("{}{}", id, crate::core::project::ENTITY_EXT));
    fs::write(&file_path, &yaml_content).into_diagnostic()?;

    let short_ids = record_short_ids(&project, [&id]);
    let short_id = short_ids.alias_of(&id.to_string()).map(String::from);

    // Resolve and attach --contact links
    let linked = link_contacts(&file_path, &yaml_content, &args.contact, &project)?;

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
        for contact_id in &linked {
            println!(
                "   {} contact {}",
                style("→").dim(),
                style(format_short_id(contact_id)).cyan()
            );
        }
    }

    if args.edit || (!args.no_edit && !args.interactive) {
        println!();
        println!("Opening in {}...", style(config.editor()).yellow());
        config.run_editor(&file_path).into_diagnostic()?;
    }

    Ok(())
}

/// Rewrite the empty contacts list in a fresh deal file with linked IDs
///
/// Works on the scaffold text so the guidance comments survive. Invalid
/// references warn and are skipped.
fn link_contacts(
    file_path: &std::path::Path,
    content: &str,
    references: &[String],
    project: &Project,
) -> Result<Vec<EntityId>> {
    let mut linked = Vec::new();
    for reference in references {
        let resolved = parse_entity_reference(reference, project, EntityPrefix::Con);
        match EntityId::parse(&resolved) {
            Ok(contact_id) if contact_id.prefix() == EntityPrefix::Con => linked.push(contact_id),
            _ => {
                eprintln!(
                    "{} Not a contact reference: {}",
                    style("!").yellow(),
                    reference
                );
            }
        }
    }

    if linked.is_empty() {
        return Ok(linked);
    }

    let entries: Vec<String> = linked.iter().map(|id| format!("    - {}", id)).collect();
    let block = format!("links:\n  contacts:\n{}", entries.join("\n"));
    let patched = content.replace("links:\n  contacts: []", &block);
    fs::write(file_path, patched).into_diagnostic()?;
    Ok(linked)
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (deal, path) = find_entity::<Deal>(&project, &ENTITY_CONFIG, &args.id)?;

    match effective_format(global.format) {
        OutputFormat::Yaml => {
            let content = fs::read_to_string(&path).into_diagnostic()?;
            print!("{}", content);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&deal).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => println!("{}", deal.id),
        OutputFormat::ShortId => {
            let short_ids = ShortIdIndex::load(&project);
            println!(
                "{}",
                short_ids
                    .alias_of(&deal.id.to_string())
                    .map(String::from)
                    .unwrap_or_else(|| format_short_id(&deal.id))
            );
        }
        OutputFormat::Path => println!("{}", path.display()),
        _ => print_deal(&deal, &project),
    }

    Ok(())
}

fn print_deal(deal: &Deal, project: &Project) {
    let short_ids = ShortIdIndex::load(project);

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("ID").bold(),
        style(&deal.id.to_string()).cyan()
    );
    println!("{}: {}", style("Title").bold(), style(&deal.title).yellow());
    println!("{}: {}", style("Stage").bold(), deal.stage);
    println!("{}: {}", style("Type").bold(), deal.deal_type_or_unknown());
    if let Some(ref market) = deal.market {
        println!("{}: {}", style("Market").bold(), market);
    }
    println!(
        "{}: {}",
        style("Estimated value").bold(),
        format_currency(deal.estimated_value)
    );
    if deal.purchase_price > 0.0 {
        println!(
            "{}: {}",
            style("Purchase price").bold(),
            format_currency(deal.purchase_price)
        );
    }
    println!(
        "{}: {}   {}: {}",
        style("Contract date").bold(),
        format_opt_date(deal.contract_date),
        style("Close date").bold(),
        format_opt_date(deal.close_date)
    );
    if let Some(days) = deal.cycle_days() {
        println!("{}: {} days", style("Cycle").bold(), days);
    }

    if !deal.links.contacts.is_empty() {
        let contact_names: std::collections::HashMap<String, String> =
            load_entities::<Contact>(project, EntityPrefix::Con)
                .into_iter()
                .map(|(c, _)| (c.id.to_string(), c.title))
                .collect();
        let rendered: Vec<String> = deal
            .links
            .contacts
            .iter()
            .map(|id| {
                let label = short_ids
                    .alias_of(&id.to_string())
                    .map(String::from)
                    .unwrap_or_else(|| format_short_id(id));
                match contact_names.get(&id.to_string()) {
                    Some(name) => format!("{} ({})", name, label),
                    None => label,
                }
            })
            .collect();
        println!("{}: {}", style("Contacts").bold(), rendered.join(", "));
    }
    if !deal.tags.is_empty() {
        println!("{}: {}", style("Tags").bold(), deal.tags.join(", "));
    }
    println!("{}", style("─".repeat(60)).dim());

    if let Some(ref description) = deal.description {
        let trimmed = description.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            println!();
            println!("{}", trimmed);
            println!();
            println!("{}", style("─".repeat(60)).dim());
        }
    }

    // Attached worksheet, when one exists
    let proformas: Vec<Proforma> = load_entities::<Proforma>(project, EntityPrefix::Pro)
        .into_iter()
        .map(|(p, _)| p)
        .collect();
    let index = index_by_deal(&proformas);
    if let Some(proforma) = index.get(&deal.id) {
        let breakdown = proforma_profit(proforma, &Config::load().profit_assumptions());
        let margin = breakdown
            .margin_pct
            .map(format_percent)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}: {} - profit {} ({} margin)",
            style("Proforma").bold(),
            proforma.title,
            style(format_currency(breakdown.profit)).green(),
            margin
        );
    }

    let today = chrono::Local::now().date_naive();
    let tasks: Vec<Task> = load_entities::<Task>(project, EntityPrefix::Task)
        .into_iter()
        .map(|(t, _)| t)
        .filter(|t| t.deal.as_ref() == Some(&deal.id))
        .collect();
    if !tasks.is_empty() {
        let open = tasks.iter().filter(|t| t.status.is_open()).count();
        let overdue = tasks.iter().filter(|t| t.is_overdue(today)).count();
        let overdue_note = if overdue > 0 {
            format!(" ({} overdue)", style(overdue).red())
        } else {
            String::new()
        };
        println!(
            "{}: {} open of {}{}",
            style("Tasks").bold(),
            open,
            tasks.len(),
            overdue_note
        );
    }

    println!(
        "{}: {} | {}: {} | {}: {}",
        style("Author").dim(),
        deal.author,
        style("Created").dim(),
        deal.created.format("%Y-%m-%d %H:%M"),
        style("Revision").dim(),
        deal.revision
    );
}

fn run_edit(args: EditArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (deal, path) = find_entity::<Deal>(&project, &ENTITY_CONFIG, &args.id)?;
    open_in_editor(&path, &deal.id)
}

fn run_stage(args: StageArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (mut deal, path) = find_entity::<Deal>(&project, &ENTITY_CONFIG, &args.id)?;
    let from = deal.stage;

    let target = match args.stage {
        Some(ref name) => name
            .parse::<DealStage>()
            .map_err(|e| miette::miette!("{}", e))?,
        None => {
            let allowed = from.allowed_transitions();
            if allowed.is_empty() {
                return Err(miette::miette!(
                    "Deal {} is {}; no transitions available.",
                    format_short_id(&deal.id),
                    from
                ));
            }
            let items: Vec<&str> = allowed.iter().map(|s| s.as_str()).collect();
            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("New stage (currently {})", from))
                .items(&items)
                .default(0)
                .interact()
                .into_diagnostic()?;
            allowed[selection]
        }
    };

    if target == from {
        return Err(miette::miette!("Deal is already in stage '{}'", target));
    }

    if !DealStage::is_valid_transition(from, target) {
        if args.force {
            eprintln!(
                "{} Forcing {} → {} outside the normal pipeline order",
                style("!").yellow(),
                from,
                target
            );
        } else {
            let allowed: Vec<&str> = from
                .allowed_transitions()
                .iter()
                .map(|s| s.as_str())
                .collect();
            return Err(miette::miette!(
                "Invalid transition {} → {}. Allowed from {}: {}. Use --force to override.",
                from,
                target,
                from,
                if allowed.is_empty() {
                    "none".to_string()
                } else {
                    allowed.join(", ")
                }
            ));
        }
    }

    deal.stage = target;
    let today = chrono::Local::now().date_naive();
    let mut stamped: Option<(&str, chrono::NaiveDate)> = None;
    match target {
        DealStage::ControlledApproved if deal.contract_date.is_none() => {
            deal.contract_date = Some(today);
            stamped = Some(("contract_date", today));
        }
        DealStage::Closed if deal.close_date.is_none() => {
            deal.close_date = Some(today);
            stamped = Some(("close_date", today));
        }
        _ => {}
    }
    deal.revision += 1;

    write_entity(&deal, &path)?;

    let short_ids = ShortIdIndex::load(&project);
    let label = short_ids
        .alias_of(&deal.id.to_string())
        .map(String::from)
        .unwrap_or_else(|| format_short_id(&deal.id));
    println!(
        "{} Deal {}: {} → {}",
        style("✓").green(),
        style(label).cyan(),
        from,
        style(target).yellow()
    );
    if let Some((field, date)) = stamped {
        println!("   {} stamped {}", field, date.format("%Y-%m-%d"));
    }

    Ok(())
}
