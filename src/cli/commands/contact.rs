//! `plat contact` command - people in the pipeline's orbit

use clap::{Subcommand, ValueEnum};
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use std::fs;

use crate::cli::entity_cmd::{
    find_entity, load_entities, open_in_editor, output_new_entity, print_list_footer,
    print_no_results, record_short_ids, EntityConfig,
};
use crate::cli::filters::RoleFilter;
use crate::cli::helpers::format_short_id;
use crate::cli::output::effective_format;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::core::Config;
use crate::entities::contact::{Contact, ContactRole};
use crate::entities::deal::Deal;
use crate::schema::template::{TemplateContext, TemplateGenerator};

#[derive(Subcommand, Debug)]
pub enum ContactCommands {
    /// List contacts with filtering
    List(ListArgs),

    /// Create a new contact
    New(NewArgs),

    /// Show a contact's details
    Show(ShowArgs),

    /// Edit a contact in your editor
    Edit(EditArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Name,
    Role,
    Company,
    Email,
    Phone,
    Deals,
    Author,
    Created,
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListColumn::Id => write!(f, "id"),
            ListColumn::Name => write!(f, "name"),
            ListColumn::Role => write!(f, "role"),
            ListColumn::Company => write!(f, "company"),
            ListColumn::Email => write!(f, "email"),
            ListColumn::Phone => write!(f, "phone"),
            ListColumn::Deals => write!(f, "deals"),
            ListColumn::Author => write!(f, "author"),
            ListColumn::Created => write!(f, "created"),
        }
    }
}

const CONTACT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("role", "ROLE", 12),
    ColumnDef::new("company", "COMPANY", 22),
    ColumnDef::new("email", "EMAIL", 26),
    ColumnDef::new("phone", "PHONE", 15),
    ColumnDef::new("deals", "DEALS", 6),
    ColumnDef::new("author", "AUTHOR", 14),
    ColumnDef::new("created", "CREATED", 12),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by role
    #[arg(long, short = 'R', default_value = "all")]
    pub role: RoleFilter,

    /// Filter by company (substring match)
    #[arg(long, short = 'c')]
    pub company: Option<String>,

    /// Filter by deal (ID, short ID, or fuzzy title)
    #[arg(long, short = 'd')]
    pub deal: Option<String>,

    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Search in name, company, and notes (case-insensitive substring)
    #[arg(long)]
    pub search: Option<String>,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Name,
        ListColumn::Role,
        ListColumn::Company,
        ListColumn::Email,
        ListColumn::Deals
    ])]
    pub columns: Vec<ListColumn>,

    /// Sort by field
    #[arg(long, default_value = "name")]
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
    /// Contact name (if not provided, uses placeholder)
    #[arg(long)]
    pub name: Option<String>,

    /// Role: broker, seller, buyer, attorney, lender, consultant, partner, other
    #[arg(long, short = 'R')]
    pub role: Option<String>,

    /// Company or firm
    #[arg(long, short = 'c')]
    pub company: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Link a deal (ID or short ID; can repeat)
    #[arg(long, short = 'd')]
    pub deal: Vec<String>,

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
    /// Contact ID, short ID (CON@N), or fuzzy name match
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Contact ID, short ID (CON@N), or fuzzy name match
    pub id: String,
}

const ENTITY_CONFIG: EntityConfig = EntityConfig {
    prefix: EntityPrefix::Con,
    name: "contact",
    name_plural: "contacts",
};

const DEAL_CONFIG: EntityConfig = EntityConfig {
    prefix: EntityPrefix::Deal,
    name: "deal",
    name_plural: "deals",
};

pub fn run(cmd: ContactCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ContactCommands::List(args) => run_list(args, global),
        ContactCommands::New(args) => run_new(args, global),
        ContactCommands::Show(args) => run_show(args, global),
        ContactCommands::Edit(args) => run_edit(args),
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

    let mut contacts: Vec<(Contact, std::path::PathBuf)> =
        load_entities::<Contact>(&project, EntityPrefix::Con)
            .into_iter()
            .filter(|(contact, _)| {
                if !args.role.matches(&contact.role) {
                    return false;
                }
                if let Some(ref company) = args.company {
                    if !contact
                        .company
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&company.to_lowercase()))
                    {
                        return false;
                    }
                }
                if let Some(ref deal_id) = deal_filter {
                    if !contact.links.deals.contains(deal_id) {
                        return false;
                    }
                }
                if let Some(ref tag) = args.tag {
                    if !contact.tags.iter().any(|t| t == tag) {
                        return false;
                    }
                }
                if let Some(ref search) = args.search {
                    let needle = search.to_lowercase();
                    let in_name = contact.title.to_lowercase().contains(&needle);
                    let in_company = contact
                        .company
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&needle));
                    let in_notes = contact
                        .notes
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle));
                    if !in_name && !in_company && !in_notes {
                        return false;
                    }
                }
                true
            })
            .collect();

    match args.sort {
        ListColumn::Id => contacts.sort_by(|a, b| a.0.id.cmp(&b.0.id)),
        ListColumn::Name => contacts.sort_by(|a, b| a.0.title.cmp(&b.0.title)),
        ListColumn::Role => contacts.sort_by(|a, b| a.0.role.as_str().cmp(b.0.role.as_str())),
        ListColumn::Company => contacts.sort_by(|a, b| a.0.company.cmp(&b.0.company)),
        ListColumn::Email => contacts.sort_by(|a, b| a.0.email.cmp(&b.0.email)),
        ListColumn::Phone => contacts.sort_by(|a, b| a.0.phone.cmp(&b.0.phone)),
        ListColumn::Deals => {
            contacts.sort_by(|a, b| a.0.links.deals.len().cmp(&b.0.links.deals.len()))
        }
        ListColumn::Author => contacts.sort_by(|a, b| a.0.author.cmp(&b.0.author)),
        ListColumn::Created => contacts.sort_by(|a, b| a.0.created.cmp(&b.0.created)),
    }

    if args.reverse {
        contacts.reverse();
    }

    if let Some(limit) = args.limit {
        contacts.truncate(limit);
    }

    if args.count {
        println!("{}", contacts.len());
        return Ok(());
    }

    if contacts.is_empty() {
        print_no_results(ENTITY_CONFIG.name_plural);
        println!();
        println!("Create one with: {}", style("plat contact new").yellow());
        return Ok(());
    }

    let short_ids = record_short_ids(&project, contacts.iter().map(|(c, _)| &c.id));

    let format = effective_format(global.format);
    match format {
        OutputFormat::Json => {
            let entities: Vec<&Contact> = contacts.iter().map(|(c, _)| c).collect();
            let json = serde_json::to_string_pretty(&entities).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let entities: Vec<&Contact> = contacts.iter().map(|(c, _)| c).collect();
            let yaml = serde_yml::to_string(&entities).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Path => {
            for (_, path) in &contacts {
                println!("{}", path.display());
            }
        }
        _ => {
            let column_names: Vec<String> = args.columns.iter().map(|c| c.to_string()).collect();
            let mut visible: Vec<&str> = column_names.iter().map(String::as_str).collect();
            if args.show_id && !visible.contains(&"id") {
                visible.insert(0, "id");
            }

            let rows: Vec<TableRow> = contacts
                .iter()
                .map(|(contact, _)| contact_to_row(contact, &short_ids))
                .collect();

            let formatter = TableFormatter::new(CONTACT_COLUMNS);
            formatter.output(&rows, format, &visible);

            if format == OutputFormat::Table {
                print_list_footer(contacts.len(), &ENTITY_CONFIG);
            }
        }
    }

    Ok(())
}

fn contact_to_row(contact: &Contact, short_ids: &ShortIdIndex) -> TableRow {
    TableRow::new(contact.id.to_string(), short_ids)
        .cell("id", CellValue::Id(contact.id.to_string()))
        .cell("name", CellValue::Text(contact.title.clone()))
        .cell("role", CellValue::Text(contact.role.to_string()))
        .cell(
            "company",
            CellValue::Text(contact.company.clone().unwrap_or_else(|| "-".to_string())),
        )
        .cell(
            "email",
            CellValue::Text(contact.email.clone().unwrap_or_else(|| "-".to_string())),
        )
        .cell(
            "phone",
            CellValue::Text(contact.phone.clone().unwrap_or_else(|| "-".to_string())),
        )
        .cell("deals", CellValue::Count(contact.links.deals.len()))
        .cell("author", CellValue::Text(contact.author.clone()))
        .cell("created", CellValue::Date(contact.created))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load();
    let theme = ColorfulTheme::default();

    let (name, role, company) = if args.interactive {
        let name: String = Input::with_theme(&theme)
            .with_prompt("Name")
            .interact_text()
            .into_diagnostic()?;

        let roles: Vec<&str> = [
            ContactRole::Broker,
            ContactRole::Seller,
            ContactRole::Buyer,
            ContactRole::Attorney,
            ContactRole::Lender,
            ContactRole::Consultant,
            ContactRole::Partner,
            ContactRole::Other,
        ]
        .iter()
        .map(|r| r.as_str())
        .collect();
        let selection = Select::with_theme(&theme)
            .with_prompt("Role")
            .items(&roles)
            .default(roles.len() - 1)
            .interact()
            .into_diagnostic()?;

        let company: String = Input::with_theme(&theme)
            .with_prompt("Company (optional)")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;

        (
            name,
            Some(roles[selection].to_string()),
            (!company.is_empty()).then_some(company),
        )
    } else {
        (
            args.name.unwrap_or_else(|| "New Contact".to_string()),
            args.role.clone(),
            args.company.clone(),
        )
    };

    if let Some(ref r) = role {
        r.parse::<ContactRole>()
            .map_err(|e| miette::miette!("{}", e))?;
    }

    let id = EntityId::new(EntityPrefix::Con);

    let generator = TemplateGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let mut ctx = TemplateContext::new(id.clone(), config.author())
        .with_title(&name)
        .with_tags(args.tags.clone());
    if let Some(ref r) = role {
        ctx = ctx.with_role(r);
    }
    if let Some(ref company) = company {
        ctx = ctx.with_company(company);
    }
    if let Some(ref email) = args.email {
        ctx = ctx.with_email(email);
    }
    if let Some(ref phone) = args.phone {
        ctx = ctx.with_phone(phone);
    }

    let yaml_content = generator
        .generate_contact(&ctx)
        .map_err(|e| miette::miette!("{}", e))?;

    let output_dir = project.entity_dir(EntityPrefix::Con);
    if !output_dir.exists() {
        fs::create_dir_all(&output_dir).into_diagnostic()?;
    }
    let file_path = output_dir.join(format!("{}{}", id, crate::core::project::ENTITY_EXT));
    fs::write(&file_path, &yaml_content).into_diagnostic()?;

    let short_ids = record_short_ids(&project, [&id]);
    let short_id = short_ids.alias_of(&id.to_string()).map(String::from);

    let linked = link_deals(&file_path, &yaml_content, &args.deal, &project)?;

    output_new_entity(
        &id,
        &file_path,
        short_id,
        ENTITY_CONFIG.name,
        &name,
        global,
    );
    if !matches!(
        global.format,
        OutputFormat::Id | OutputFormat::ShortId | OutputFormat::Path
    ) {
        for deal_id in &linked {
            println!(
                "   {} deal {}",
                style("→").dim(),
                style(format_short_id(deal_id)).cyan()
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

/// Rewrite the empty deals list in a fresh contact file with linked IDs
fn link_deals(
    file_path: &std::path::Path,
    content: &str,
    references: &[String],
    project: &Project,
) -> Result<Vec<EntityId>> {
    let mut linked = Vec::new();
    for reference in references {
        let (deal, _) = find_entity::<Deal>(project, &DEAL_CONFIG, reference)?;
        linked.push(deal.id);
    }

    if linked.is_empty() {
        return Ok(linked);
    }

    let entries: Vec<String> = linked.iter().map(|id| format!("    - {}", id)).collect();
    let block = format!("links:\n  deals:\n{}", entries.join("\n"));
    let patched = content.replace("links:\n  deals: []", &block);
    fs::write(file_path, patched).into_diagnostic()?;
    Ok(linked)
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (contact, path) = find_entity::<Contact>(&project, &ENTITY_CONFIG, &args.id)?;

    match effective_format(global.format) {
        OutputFormat::Yaml => {
            let content = fs::read_to_string(&path).into_diagnostic()?;
            print!("{}", content);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&contact).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => println!("{}", contact.id),
        OutputFormat::ShortId => {
            let short_ids = ShortIdIndex::load(&project);
            println!(
                "{}",
                short_ids
                    .alias_of(&contact.id.to_string())
                    .map(String::from)
                    .unwrap_or_else(|| format_short_id(&contact.id))
            );
        }
        OutputFormat::Path => println!("{}", path.display()),
        _ => print_contact(&contact, &project),
    }

    Ok(())
}

fn print_contact(contact: &Contact, project: &Project) {
    let short_ids = ShortIdIndex::load(project);

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("ID").bold(),
        style(&contact.id.to_string()).cyan()
    );
    println!(
        "{}: {}",
        style("Name").bold(),
        style(&contact.title).yellow()
    );
    println!("{}: {}", style("Role").bold(), contact.role);
    if let Some(ref company) = contact.company {
        println!("{}: {}", style("Company").bold(), company);
    }
    if let Some(ref email) = contact.email {
        println!("{}: {}", style("Email").bold(), email);
    }
    if let Some(ref phone) = contact.phone {
        println!("{}: {}", style("Phone").bold(), phone);
    }

    if !contact.links.deals.is_empty() {
        let deal_titles: std::collections::HashMap<String, String> =
            load_entities::<Deal>(project, EntityPrefix::Deal)
                .into_iter()
                .map(|(d, _)| (d.id.to_string(), d.title))
                .collect();
        let rendered: Vec<String> = contact
            .links
            .deals
            .iter()
            .map(|id| {
                let label = short_ids
                    .alias_of(&id.to_string())
                    .map(String::from)
                    .unwrap_or_else(|| format_short_id(id));
                match deal_titles.get(&id.to_string()) {
                    Some(title) => format!("{} ({})", title, label),
                    None => label,
                }
            })
            .collect();
        println!("{}: {}", style("Deals").bold(), rendered.join(", "));
    }
    if !contact.tags.is_empty() {
        println!("{}: {}", style("Tags").bold(), contact.tags.join(", "));
    }
    println!("{}", style("─".repeat(60)).dim());

    if let Some(ref notes) = contact.notes {
        let trimmed = notes.trim();
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
        contact.author,
        style("Created").dim(),
        contact.created.format("%Y-%m-%d %H:%M"),
        style("Revision").dim(),
        contact.revision
    );
}

fn run_edit(args: EditArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let (contact, path) = find_entity::<Contact>(&project, &ENTITY_CONFIG, &args.id)?;
    open_in_editor(&path, &contact.id)
}
