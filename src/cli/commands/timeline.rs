//! `plat timeline` command - phases, milestones, and the gantt view

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;

use crate::cli::entity_cmd::{
    find_entity, load_entities, open_in_editor, output_new_entity, print_list_footer,
    print_no_results, record_short_ids, write_entity, EntityConfig,
};
use crate::cli::helpers::{format_short_id, parse_date_arg};
use crate::cli::output::effective_format;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::viz::{render_gantt, DEFAULT_CHART_WIDTH};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::core::Config;
use crate::entities::deal::Deal;
use crate::entities::timeline::{Milestone, MilestoneStatus, Phase, PhaseStatus, Timeline};
use crate::metrics::layout;
use crate::schema::template::{TemplateContext, TemplateGenerator};

#[derive(Subcommand, Debug)]
pub enum TimelineCommands {
    /// List timelines
    List(ListArgs),

    /// Create a new timeline
    New(NewArgs),

    /// Show a timeline's phases and milestones
    Show(ShowArgs),

    /// Edit a timeline in your editor
    Edit(EditArgs),

    /// Append a phase to a timeline
    AddPhase(AddPhaseArgs),

    /// Append a milestone to a timeline
    AddMilestone(AddMilestoneArgs),

    /// Render a timeline as a gantt chart
    Gantt(GanttArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Title,
    Deal,
    Phases,
    Milestones,
    Author,
    Created,
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListColumn::Id => write!(f, "id"),
            ListColumn::Title => write!(f, "title"),
            ListColumn::Deal => write!(f, "deal"),
            ListColumn::Phases => write!(f, "phases"),
            ListColumn::Milestones => write!(f, "milestones"),
            ListColumn::Author => write!(f, "author"),
            ListColumn::Created => write!(f, "created"),
        }
    }
}

const TIMELINE_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("title", "TITLE", 30),
    ColumnDef::new("deal", "DEAL", 10),
    ColumnDef::new("phases", "PHASES", 7),
    ColumnDef::new("milestones", "MILESTONES", 11),
    ColumnDef::new("author", "AUTHOR", 14),
    ColumnDef::new("created", "CREATED", 12),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by deal (ID, short ID, or fuzzy title)
    #[arg(long, short = 'd')]
    pub deal: Option<String>,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Title,
        ListColumn::Deal,
        ListColumn::Phases,
        ListColumn::Milestones
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
    /// Timeline title (if not provided, uses placeholder)
    #[arg(long)]
    pub title: Option<String>,

    /// Deal this timeline belongs to (ID, short ID, or fuzzy title)
    #[arg(long, short = 'd')]
    pub deal: Option<String>,

    /// Open in editor after creation
    #[arg(long, short = 'e')]
    pub edit: bool,

    /// Don't open in editor after creation
    #[arg(long)]
    pub no_edit: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Timeline ID, short ID (TML@N), or fuzzy title match
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Timeline ID, short ID (TML@N), or fuzzy title match
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct AddPhaseArgs {
    /// Timeline ID, short ID (TML@N), or fuzzy title match
    pub id: String,

    /// Phase name
    #[arg(long)]
    pub name: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Status: planned, active, completed, delayed
    #[arg(long, default_value = "planned")]
    pub status: String,

    /// Display order (defaults to the end of the list)
    #[arg(long)]
    pub order: Option<i32>,
}

#[derive(clap::Args, Debug)]
pub struct AddMilestoneArgs {
    /// Timeline ID, short ID (TML@N), or fuzzy title match
    pub id: String,

    /// Milestone name
    #[arg(long)]
    pub name: String,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    /// Status: pending, reached, missed
    #[arg(long, default_value = "pending")]
    pub status: String,
}

#[derive(clap::Args, Debug)]
pub struct GanttArgs {
    /// Timeline ID, short ID (TML@N), or fuzzy title match
    pub id: String,

    /// Chart width in characters
    #[arg(long, short = 'w', default_value_t = DEFAULT_CHART_WIDTH)]
    pub width: usize,
}

const ENTITY_CONFIG: EntityConfig = EntityConfig {
    prefix: EntityPrefix::Tml,
    name: "timeline",
    name_plural: "timelines",
};

const DEAL_CONFIG: EntityConfig = EntityConfig {
    prefix: EntityPrefix::Deal,
    name: "deal",
    name_plural: "deals",
};

pub fn run(cmd: TimelineCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        TimelineCommands::List(args) => run_list(args, global),
        TimelineCommands::New(args) => run_new(args, global),
        TimelineCommands::Show(args) => run_show(args, global),
        TimelineCommands::Edit(args) => run_edit(args),
        TimelineCommands::AddPhase(args) => run_add_phase(args),
        TimelineCommands::AddMilestone(args) => run_add_milestone(args),
        TimelineCommands::Gantt(args) => run_gantt(args),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;

    let deal_filter = match args.deal {
        Some(ref query) => {
            let (deal, _) = find_entity::<Deal>(&project, &DEAL_CONFIG, query)?;
            Some(deal.id)
        }
        None => None,
    };

    let mut timelines: Vec<(Timeline, std::path::PathBuf)> =
        load_entities::<Timeline>(&project, EntityPrefix::Tml)
            .into_iter()
            .filter(|(timeline, _)| match deal_filter {
                Some(ref deal_id) => timeline.deal.as_ref() == Some(deal_id),
                None => true,
            })
            .collect();

    match args.sort {
        ListColumn::Id => timelines.sort_by(|a, b| a.0.id.cmp(&b.0.id)),
        ListColumn::Title => timelines.sort_by(|a, b| a.0.title.cmp(&b.0.title)),
        ListColumn::Deal => timelines.sort_by(|a, b| a.0.deal.cmp(&b.0.deal)),
        ListColumn::Phases => timelines.sort_by(|a, b| a.0.phases.len().cmp(&b.0.phases.len())),
        ListColumn::Milestones => {
            timelines.sort_by(|a, b| a.0.milestones.len().cmp(&b.0.milestones.len()))
        }
        ListColumn::Author => timelines.sort_by(|a, b| a.0.author.cmp(&b.0.author)),
        ListColumn::Created => timelines.sort_by(|a, b| a.0.created.cmp(&b.0.created)),
    }

    if args.reverse {
        timelines.reverse();
    }

    if let Some(limit) = args.limit {
        timelines.truncate(limit);
    }

    if args.count {
        println!("{}", timelines.len());
        return Ok(());
    }

    if timelines.is_empty() {
        print_no_results(ENTITY_CONFIG.name_plural);
        println!();
        println!("Create one with: {}", style("plat timeline new").yellow());
        return Ok(());
    }

    let short_ids = record_short_ids(&project, timelines.iter().map(|(t, _)| &t.id));

    let format = effective_format(global.format);
    match format {
        OutputFormat::Json => {
            let entities: Vec<&Timeline> = timelines.iter().map(|(t, _)| t).collect();
            let json = serde_json::to_string_pretty(&entities).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let entities: Vec<&Timeline> = timelines.iter().map(|(t, _)| t).collect();
            let yaml = serde_yml::to_string(&entities).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Path => {
            for (_, path) in &timelines {
                println!("{}", path.display());
            }
        }
        _ => {
            let column_names: Vec<String> = args.columns.iter().map(|c| c.to_string()).collect();
            let mut visible: Vec<&str> = column_names.iter().map(String::as_str).collect();
            if args.show_id && !visible.contains(&"id") {
                visible.insert(0, "id");
            }

            let rows: Vec<TableRow> = timelines
                .iter()
                .map(|(timeline, _)| timeline_to_row(timeline, &short_ids))
                .collect();

            let formatter = TableFormatter::new(TIMELINE_COLUMNS);
            formatter.output(&rows, format, &visible);

            if format == OutputFormat::Table {
                print_list_footer(timelines.len(), &ENTITY_CONFIG);
            }
        }
    }

    Ok(())
}

fn timeline_to_row(timeline: &Timeline, short_ids: &ShortIdIndex) -> TableRow {
    let deal_label = match timeline.deal {
        Some(ref deal_id) => short_ids
            .alias_of(&deal_id.to_string())
            .map(String::from)
            .unwrap_or_else(|| format_short_id(deal_id)),
        None => "-".to_string(),
    };

    TableRow::new(timeline.id.to_string(), short_ids)
        .cell("id", CellValue::Id(timeline.id.to_string()))
        .cell("title", CellValue::Text(timeline.title.clone()))
        .cell("deal", CellValue::Text(deal_label))
        .cell("phases", CellValue::Count(timeline.phases.len()))
        .cell("milestones", CellValue::Count(timeline.milestones.len()))
        .cell("author", CellValue::Text(timeline.author.clone()))
        .cell("created", CellValue::Date(timeline.created))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load();

    let title = args.title.unwrap_or_else(|| "New Timeline".to_string());

    let deal = match args.deal {
        Some(ref query) => {
            let (deal, _) = find_entity::<Deal>(&project, &DEAL_CONFIG, query)?;
            Some(deal)
        }
        None => None,
    };

    let id = EntityId::new(EntityPrefix::Tml);

    let generator = TemplateGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let mut ctx = TemplateContext::new(id.clone(), config.author()).with_title(&title);
    if let Some(ref deal) = deal {
        ctx = ctx.with_deal_ref(deal.id.clone());
    }

    let yaml_content = generator
        .generate_timeline(&ctx)
        .map_err(|e| miette::miette!("{}", e))?;

    let output_dir = project.entity_dir(EntityPrefix::Tml);
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
    if let Some(ref deal) = deal {
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
    }

    if args.edit || !args.no_edit {
        println!();
        println!("Opening in {}...", style(config.editor()).yellow());
        config.run_editor(&file_path).into_diagnostic()?;
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (timeline, path) = find_entity::<Timeline>(&project, &ENTITY_CONFIG, &args.id)?;

    match effective_format(global.format) {
        OutputFormat::Yaml => {
            let content = fs::read_to_string(&path).into_diagnostic()?;
            print!("{}", content);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&timeline).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => println!("{}", timeline.id),
        OutputFormat::ShortId => {
            let short_ids = ShortIdIndex::load(&project);
            println!(
                "{}",
                short_ids
                    .alias_of(&timeline.id.to_string())
                    .map(String::from)
                    .unwrap_or_else(|| format_short_id(&timeline.id))
            );
        }
        OutputFormat::Path => println!("{}", path.display()),
        _ => print_timeline(&timeline, &project),
    }

    Ok(())
}

fn print_timeline(timeline: &Timeline, project: &Project) {
    let short_ids = ShortIdIndex::load(project);

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("ID").bold(),
        style(&timeline.id.to_string()).cyan()
    );
    println!(
        "{}: {}",
        style("Title").bold(),
        style(&timeline.title).yellow()
    );
    if let Some(ref deal_id) = timeline.deal {
        let deal_title = load_entities::<Deal>(project, EntityPrefix::Deal)
            .into_iter()
            .find(|(d, _)| d.id == *deal_id)
            .map(|(d, _)| d.title);
        let label = short_ids
            .alias_of(&deal_id.to_string())
            .map(String::from)
            .unwrap_or_else(|| format_short_id(deal_id));
        match deal_title {
            Some(title) => println!("{}: {} ({})", style("Deal").bold(), title, label),
            None => println!("{}: {}", style("Deal").bold(), label),
        }
    }
    println!("{}", style("─".repeat(60)).dim());

    if timeline.phases.is_empty() && timeline.milestones.is_empty() {
        println!("No phases or milestones yet.");
        println!(
            "Add some with: {}",
            style("plat timeline add-phase").yellow()
        );
    }

    if !timeline.phases.is_empty() {
        println!("{}", style("Phases").bold());
        let mut phases: Vec<&Phase> = timeline.phases.iter().collect();
        phases.sort_by_key(|p| p.order);
        for phase in phases {
            let start = phase
                .start_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "?".to_string());
            let end = phase
                .end_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "?".to_string());
            println!(
                "  {:<28} {} → {}  [{}]",
                phase.name, start, end, phase.status
            );
        }
    }

    if !timeline.milestones.is_empty() {
        if !timeline.phases.is_empty() {
            println!();
        }
        println!("{}", style("Milestones").bold());
        for milestone in &timeline.milestones {
            let due = milestone
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "unscheduled".to_string());
            let status = match milestone.status {
                MilestoneStatus::Reached => style(milestone.status).green().to_string(),
                MilestoneStatus::Missed => style(milestone.status).red().to_string(),
                MilestoneStatus::Pending => milestone.status.to_string(),
            };
            println!("  {:<28} {}  [{}]", milestone.name, due, status);
        }
    }

    if let Some(laid_out) = layout(&timeline.phases, &timeline.milestones) {
        println!();
        println!("{}", style("Schedule").bold());
        print!("{}", render_gantt(&laid_out, DEFAULT_CHART_WIDTH));
    }

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {} | {}: {} | {}: {}",
        style("Author").dim(),
        timeline.author,
        style("Created").dim(),
        timeline.created.format("%Y-%m-%d %H:%M"),
        style("Revision").dim(),
        timeline.revision
    );
}

fn run_edit(args: EditArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (timeline, path) = find_entity::<Timeline>(&project, &ENTITY_CONFIG, &args.id)?;
    open_in_editor(&path, &timeline.id)
}

fn run_add_phase(args: AddPhaseArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (mut timeline, path) = find_entity::<Timeline>(&project, &ENTITY_CONFIG, &args.id)?;

    let status: PhaseStatus = args.status.parse().map_err(|e| miette::miette!("{}", e))?;
    let start_date = match args.start {
        Some(ref raw) => Some(parse_date_arg(raw)?),
        None => None,
    };
    let end_date = match args.end {
        Some(ref raw) => Some(parse_date_arg(raw)?),
        None => None,
    };
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            eprintln!(
                "{} Phase ends before it starts ({} → {})",
                style("!").yellow(),
                start,
                end
            );
        }
    }

    timeline.add_phase(Phase {
        name: args.name.clone(),
        start_date,
        end_date,
        order: args.order.unwrap_or(0),
        status,
    });
    timeline.revision += 1;
    write_entity(&timeline, &path)?;

    println!(
        "{} Added phase {} to {} ({} total)",
        style("✓").green(),
        style(&args.name).yellow(),
        style(format_short_id(&timeline.id)).cyan(),
        timeline.phases.len()
    );

    Ok(())
}

fn run_add_milestone(args: AddMilestoneArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (mut timeline, path) = find_entity::<Timeline>(&project, &ENTITY_CONFIG, &args.id)?;

    let status: MilestoneStatus = args.status.parse().map_err(|e| miette::miette!("{}", e))?;
    let due_date = match args.due {
        Some(ref raw) => Some(parse_date_arg(raw)?),
        None => None,
    };

    timeline.add_milestone(Milestone {
        name: args.name.clone(),
        due_date,
        status,
    });
    timeline.revision += 1;
    write_entity(&timeline, &path)?;

    println!(
        "{} Added milestone {} to {} ({} total)",
        style("✓").green(),
        style(&args.name).yellow(),
        style(format_short_id(&timeline.id)).cyan(),
        timeline.milestones.len()
    );

    Ok(())
}

fn run_gantt(args: GanttArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (timeline, _) = find_entity::<Timeline>(&project, &ENTITY_CONFIG, &args.id)?;

    let Some(laid_out) = layout(&timeline.phases, &timeline.milestones) else {
        println!(
            "Timeline {} has no dated phases or milestones.",
            style(format_short_id(&timeline.id)).cyan()
        );
        println!(
            "Add dates with: {}",
            style("plat timeline add-phase --start YYYY-MM-DD --end YYYY-MM-DD").yellow()
        );
        return Ok(());
    };

    println!();
    println!("  {}", style(&timeline.title).bold());
    println!();
    print!("{}", render_gantt(&laid_out, args.width));
    println!();

    Ok(())
}
