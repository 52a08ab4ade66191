//! `plat task` command - work tracking

use clap::{Subcommand, ValueEnum};
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use std::fs;

use crate::cli::entity_cmd::{
    find_entity, load_entities, open_in_editor, output_new_entity, print_list_footer,
    print_no_results, record_short_ids, write_entity, EntityConfig,
};
use crate::cli::filters::{PriorityFilter, TaskStatusFilter};
use crate::cli::helpers::{format_opt_date, format_short_id, parse_date_arg};
use crate::cli::output::effective_format;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::Priority;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::core::Config;
use crate::entities::deal::Deal;
use crate::entities::task::{Task, TaskStatus};
use crate::schema::template::{TemplateContext, TemplateGenerator};

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List tasks with filtering
    List(ListArgs),

    /// Create a new task
    New(NewArgs),

    /// Show a task's details
    Show(ShowArgs),

    /// Edit a task in your editor
    Edit(EditArgs),

    /// Mark a task completed
    Done(DoneArgs),

    /// Move a task to a different status
    Status(StatusArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Title,
    Status,
    Priority,
    Deal,
    Due,
    Author,
    Created,
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListColumn::Id => write!(f, "id"),
            ListColumn::Title => write!(f, "title"),
            ListColumn::Status => write!(f, "status"),
            ListColumn::Priority => write!(f, "priority"),
            ListColumn::Deal => write!(f, "deal"),
            ListColumn::Due => write!(f, "due"),
            ListColumn::Author => write!(f, "author"),
            ListColumn::Created => write!(f, "created"),
        }
    }
}

const TASK_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 17),
    ColumnDef::new("title", "TITLE", 34),
    ColumnDef::new("status", "STATUS", 12),
    ColumnDef::new("priority", "PRIORITY", 9),
    ColumnDef::new("deal", "DEAL", 10),
    ColumnDef::new("due", "DUE", 12),
    ColumnDef::new("author", "AUTHOR", 14),
    ColumnDef::new("created", "CREATED", 12),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's', default_value = "open")]
    pub status: TaskStatusFilter,

    /// Filter by priority
    #[arg(long, short = 'p', default_value = "all")]
    pub priority: PriorityFilter,

    /// Filter by deal (ID, short ID, or fuzzy title)
    #[arg(long, short = 'd')]
    pub deal: Option<String>,

    /// Only overdue tasks
    #[arg(long)]
    pub overdue: bool,

    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Filter by author (substring match)
    #[arg(long, short = 'a')]
    pub author: Option<String>,

    /// Search in title and description (case-insensitive substring)
    #[arg(long)]
    pub search: Option<String>,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Title,
        ListColumn::Status,
        ListColumn::Priority,
        ListColumn::Deal,
        ListColumn::Due
    ])]
    pub columns: Vec<ListColumn>,

    /// Sort by field
    #[arg(long, default_value = "due")]
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
    /// Task title (if not provided, uses placeholder)
    #[arg(long)]
    pub title: Option<String>,

    /// Deal this task belongs to (ID, short ID, or fuzzy title)
    #[arg(long, short = 'd')]
    pub deal: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    /// Priority: low, medium, high, critical
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

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
    /// Task ID, short ID (TASK@N), or fuzzy title match
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Task ID, short ID (TASK@N), or fuzzy title match
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct DoneArgs {
    /// Task ID, short ID (TASK@N), or fuzzy title match
    pub id: String,

    /// Completion date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Task ID, short ID (TASK@N), or fuzzy title match
    pub id: String,

    /// New status: todo, in_progress, blocked, completed (prompts if omitted)
    pub status: Option<String>,
}

const ENTITY_CONFIG: EntityConfig = EntityConfig {
    prefix: EntityPrefix::Task,
    name: "task",
    name_plural: "tasks",
};

const DEAL_CONFIG: EntityConfig = EntityConfig {
    prefix: EntityPrefix::Deal,
    name: "deal",
    name_plural: "deals",
};

pub fn run(cmd: TaskCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        TaskCommands::List(args) => run_list(args, global),
        TaskCommands::New(args) => run_new(args, global),
        TaskCommands::Show(args) => run_show(args, global),
        TaskCommands::Edit(args) => run_edit(args),
        TaskCommands::Done(args) => run_done(args),
        TaskCommands::Status(args) => run_status(args),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let today = chrono::Local::now().date_naive();

    let deal_filter = match args.deal {
        Some(ref query) => {
            let (deal, _) = find_entity::<Deal>(&project, &DEAL_CONFIG, query)?;
            Some(deal.id)
        }
        None => None,
    };

    let mut tasks: Vec<(Task, std::path::PathBuf)> =
        load_entities::<Task>(&project, EntityPrefix::Task)
            .into_iter()
            .filter(|(task, _)| {
                if !args.status.matches(&task.status) {
                    return false;
                }
                if !args.priority.matches(&task.priority) {
                    return false;
                }
                if let Some(ref deal_id) = deal_filter {
                    if task.deal.as_ref() != Some(deal_id) {
                        return false;
                    }
                }
                if args.overdue && !task.is_overdue(today) {
                    return false;
                }
                if let Some(ref tag) = args.tag {
                    if !task.tags.iter().any(|t| t == tag) {
                        return false;
                    }
                }
                if let Some(ref author) = args.author {
                    if !task.author.to_lowercase().contains(&author.to_lowercase()) {
                        return false;
                    }
                }
                if let Some(ref search) = args.search {
                    let needle = search.to_lowercase();
                    let in_title = task.title.to_lowercase().contains(&needle);
                    let in_description = task
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle));
                    if !in_title && !in_description {
                        return false;
                    }
                }
                true
            })
            .collect();

    match args.sort {
        ListColumn::Id => tasks.sort_by(|a, b| a.0.id.cmp(&b.0.id)),
        ListColumn::Title => tasks.sort_by(|a, b| a.0.title.cmp(&b.0.title)),
        ListColumn::Status => tasks.sort_by(|a, b| a.0.status.as_str().cmp(b.0.status.as_str())),
        ListColumn::Priority => tasks.sort_by(|a, b| b.0.priority.cmp(&a.0.priority)),
        // Undated tasks sort last
        ListColumn::Due => tasks.sort_by(|a, b| match (a.0.due_date, b.0.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.created.cmp(&b.0.created),
        }),
        ListColumn::Deal => tasks.sort_by(|a, b| a.0.deal.cmp(&b.0.deal)),
        ListColumn::Author => tasks.sort_by(|a, b| a.0.author.cmp(&b.0.author)),
        ListColumn::Created => tasks.sort_by(|a, b| a.0.created.cmp(&b.0.created)),
    }

    if args.reverse {
        tasks.reverse();
    }

    if let Some(limit) = args.limit {
        tasks.truncate(limit);
    }

    if args.count {
        println!("{}", tasks.len());
        return Ok(());
    }

    if tasks.is_empty() {
        print_no_results(ENTITY_CONFIG.name_plural);
        println!();
        println!("Create one with: {}", style("plat task new").yellow());
        return Ok(());
    }

    let short_ids = record_short_ids(&project, tasks.iter().map(|(t, _)| &t.id));

    let format = effective_format(global.format);
    match format {
        OutputFormat::Json => {
            let entities: Vec<&Task> = tasks.iter().map(|(t, _)| t).collect();
            let json = serde_json::to_string_pretty(&entities).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let entities: Vec<&Task> = tasks.iter().map(|(t, _)| t).collect();
            let yaml = serde_yml::to_string(&entities).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Path => {
            for (_, path) in &tasks {
                println!("{}", path.display());
            }
        }
        _ => {
            let column_names: Vec<String> = args.columns.iter().map(|c| c.to_string()).collect();
            let mut visible: Vec<&str> = column_names.iter().map(String::as_str).collect();
            if args.show_id && !visible.contains(&"id") {
                visible.insert(0, "id");
            }

            let rows: Vec<TableRow> = tasks
                .iter()
                .map(|(task, _)| task_to_row(task, today, &short_ids))
                .collect();

            let formatter = TableFormatter::new(TASK_COLUMNS);
            formatter.output(&rows, format, &visible);

            if format == OutputFormat::Table {
                print_list_footer(tasks.len(), &ENTITY_CONFIG);
            }
        }
    }

    Ok(())
}

fn task_to_row(task: &Task, today: chrono::NaiveDate, short_ids: &ShortIdIndex) -> TableRow {
    let deal_label = match task.deal {
        Some(ref deal_id) => short_ids
            .alias_of(&deal_id.to_string())
            .map(String::from)
            .unwrap_or_else(|| format_short_id(deal_id)),
        None => "-".to_string(),
    };
    let due = match task.due_date {
        Some(date) if task.is_overdue(today) => format!("{} !", date.format("%Y-%m-%d")),
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    };

    TableRow::new(task.id.to_string(), short_ids)
        .cell("id", CellValue::Id(task.id.to_string()))
        .cell("title", CellValue::Text(task.title.clone()))
        .cell("status", CellValue::Text(task.status.to_string()))
        .cell("priority", CellValue::Text(task.priority.to_string()))
        .cell("deal", CellValue::Text(deal_label))
        .cell("due", CellValue::Text(due))
        .cell("author", CellValue::Text(task.author.clone()))
        .cell("created", CellValue::Date(task.created))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load();
    let theme = ColorfulTheme::default();

    let (title, priority, due) = if args.interactive {
        let title: String = Input::with_theme(&theme)
            .with_prompt("Title")
            .interact_text()
            .into_diagnostic()?;

        let priorities = ["low", "medium", "high", "critical"];
        let selection = Select::with_theme(&theme)
            .with_prompt("Priority")
            .items(&priorities)
            .default(1)
            .interact()
            .into_diagnostic()?;

        let due_input: String = Input::with_theme(&theme)
            .with_prompt("Due date (YYYY-MM-DD, empty for none)")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        let due = if due_input.trim().is_empty() {
            None
        } else {
            Some(parse_date_arg(due_input.trim())?)
        };

        (title, Some(priorities[selection].to_string()), due)
    } else {
        let due = match args.due {
            Some(ref raw) => Some(parse_date_arg(raw)?),
            None => None,
        };
        (
            args.title.unwrap_or_else(|| "New Task".to_string()),
            args.priority.clone(),
            due,
        )
    };

    // Validate early so a typo fails before the file is written
    if let Some(ref p) = priority {
        p.parse::<Priority>().map_err(|e| miette::miette!("{}", e))?;
    }

    let deal = match args.deal {
        Some(ref query) => {
            let (deal, _) = find_entity::<Deal>(&project, &DEAL_CONFIG, query)?;
            Some(deal)
        }
        None => None,
    };

    let id = EntityId::new(EntityPrefix::Task);

    let generator = TemplateGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let mut ctx = TemplateContext::new(id.clone(), config.author())
        .with_title(&title)
        .with_status("todo")
        .with_tags(args.tags.clone());
    if let Some(ref p) = priority {
        ctx = ctx.with_priority(p);
    }
    if let Some(date) = due {
        ctx = ctx.with_due_date(date.format("%Y-%m-%d").to_string());
    }
    if let Some(ref deal) = deal {
        ctx = ctx.with_deal_ref(deal.id.clone());
    }

    let yaml_content = generator
        .generate_task(&ctx)
        .map_err(|e| miette::miette!("{}", e))?;

    let output_dir = project.entity_dir(EntityPrefix::Task);
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

    if args.edit || (!args.no_edit && !args.interactive) {
        println!();
        println!("Opening in {}...", style(config.editor()).yellow());
        config.run_editor(&file_path).into_diagnostic()?;
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (task, path) = find_entity::<Task>(&project, &ENTITY_CONFIG, &args.id)?;

    match effective_format(global.format) {
        OutputFormat::Yaml => {
            let content = fs::read_to_string(&path).into_diagnostic()?;
            print!("{}", content);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&task).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => println!("{}", task.id),
        OutputFormat::ShortId => {
            let short_ids = ShortIdIndex::load(&project);
            println!(
                "{}",
                short_ids
                    .alias_of(&task.id.to_string())
                    .map(String::from)
                    .unwrap_or_else(|| format_short_id(&task.id))
            );
        }
        OutputFormat::Path => println!("{}", path.display()),
        _ => print_task(&task, &project),
    }

    Ok(())
}

fn print_task(task: &Task, project: &Project) {
    let today = chrono::Local::now().date_naive();
    let short_ids = ShortIdIndex::load(project);

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("ID").bold(),
        style(&task.id.to_string()).cyan()
    );
    println!("{}: {}", style("Title").bold(), style(&task.title).yellow());
    println!(
        "{}: {}   {}: {}",
        style("Status").bold(),
        task.status,
        style("Priority").bold(),
        task.priority
    );

    if let Some(ref deal_id) = task.deal {
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

    let overdue_note = if task.is_overdue(today) {
        format!("  {}", style("OVERDUE").red().bold())
    } else {
        String::new()
    };
    println!(
        "{}: {}{}",
        style("Due").bold(),
        format_opt_date(task.due_date),
        overdue_note
    );
    if let Some(done) = task.completed_date {
        let note = match task.completed_on_time() {
            Some(true) => style("on time").green().to_string(),
            Some(false) => style("late").red().to_string(),
            None => String::new(),
        };
        println!(
            "{}: {} ({})",
            style("Completed").bold(),
            done.format("%Y-%m-%d"),
            note
        );
    }
    if !task.tags.is_empty() {
        println!("{}: {}", style("Tags").bold(), task.tags.join(", "));
    }
    println!("{}", style("─".repeat(60)).dim());

    if let Some(ref description) = task.description {
        let trimmed = description.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            println!();
            println!("{}", trimmed);
            println!();
            println!("{}", style("─".repeat(60)).dim());
        }
    }

    println!(
        "{}: {} | {}: {} | {}: {}",
        style("Author").dim(),
        task.author,
        style("Created").dim(),
        task.created.format("%Y-%m-%d %H:%M"),
        style("Revision").dim(),
        task.revision
    );
}

fn run_edit(args: EditArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (task, path) = find_entity::<Task>(&project, &ENTITY_CONFIG, &args.id)?;
    open_in_editor(&path, &task.id)
}

fn run_done(args: DoneArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (mut task, path) = find_entity::<Task>(&project, &ENTITY_CONFIG, &args.id)?;

    if !task.status.is_open() {
        let when = task
            .completed_date
            .map(|d| format!(" on {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!(
            "Task {} is already completed{}.",
            style(format_short_id(&task.id)).cyan(),
            when
        );
        return Ok(());
    }

    let date = match args.date {
        Some(ref raw) => parse_date_arg(raw)?,
        None => chrono::Local::now().date_naive(),
    };

    task.complete(date);
    task.revision += 1;
    write_entity(&task, &path)?;

    let short_ids = ShortIdIndex::load(&project);
    let label = short_ids
        .alias_of(&task.id.to_string())
        .map(String::from)
        .unwrap_or_else(|| format_short_id(&task.id));
    let timing = match task.completed_on_time() {
        Some(true) if task.due_date.is_some() => format!("  {}", style("on time").green()),
        Some(false) => format!("  {}", style("late").red()),
        _ => String::new(),
    };
    println!(
        "{} Completed {}: {}{}",
        style("✓").green(),
        style(label).cyan(),
        task.title,
        timing
    );

    Ok(())
}

fn run_status(args: StatusArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (mut task, path) = find_entity::<Task>(&project, &ENTITY_CONFIG, &args.id)?;
    let from = task.status;

    let target = match args.status {
        Some(ref name) => name
            .parse::<TaskStatus>()
            .map_err(|e| miette::miette!("{}", e))?,
        None => {
            let items: Vec<&str> = TaskStatus::all().iter().map(|s| s.as_str()).collect();
            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("New status (currently {})", from))
                .items(&items)
                .default(0)
                .interact()
                .into_diagnostic()?;
            TaskStatus::all()[selection]
        }
    };

    if target == from {
        println!(
            "Task {} is already {}.",
            style(format_short_id(&task.id)).cyan(),
            target
        );
        return Ok(());
    }

    if target == TaskStatus::Completed {
        task.complete(chrono::Local::now().date_naive());
    } else {
        task.status = target;
        // Reopening clears the completion stamp
        task.completed_date = None;
    }
    task.revision += 1;
    write_entity(&task, &path)?;

    let short_ids = ShortIdIndex::load(&project);
    let label = short_ids
        .alias_of(&task.id.to_string())
        .map(String::from)
        .unwrap_or_else(|| format_short_id(&task.id));
    println!(
        "{} Task {}: {} → {}",
        style("✓").green(),
        style(label).cyan(),
        from,
        target
    );
    if target == TaskStatus::Completed {
        if let Some(date) = task.completed_date {
            println!("   completed_date stamped {}", date.format("%Y-%m-%d"));
        }
    }

    Ok(())
}
