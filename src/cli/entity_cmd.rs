//! Shared entity command infrastructure
//!
//! Common patterns for entity CRUD operations so the per-entity command
//! files only carry what is specific to their type.

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::cli::helpers::format_short_id;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::core::Config;

/// Static configuration for an entity type
pub struct EntityConfig {
    /// Entity prefix (e.g. EntityPrefix::Deal)
    pub prefix: EntityPrefix,
    /// Singular name for messages (e.g. "deal")
    pub name: &'static str,
    /// Plural name for messages (e.g. "deals")
    pub name_plural: &'static str,
}

/// Load and parse every entity file of one type
///
/// Unparseable files are skipped with a warning on stderr rather than
/// aborting; one broken file should not hide the rest of the pipeline.
pub fn load_entities<T>(project: &Project, prefix: EntityPrefix) -> Vec<(T, PathBuf)>
where
    T: DeserializeOwned + 'static,
{
    let mut entities = Vec::new();
    for path in project.iter_entity_files(prefix) {
        match crate::yaml::parse_yaml_file::<T>(&path) {
            Ok(entity) => entities.push((entity, path)),
            Err(e) => {
                eprintln!(
                    "{} Failed to parse {}: {}",
                    style("!").yellow(),
                    path.display(),
                    e
                );
            }
        }
    }
    entities
}

/// Find one entity by short ID, full ID, ID prefix, or title substring
///
/// Multiple matches list the candidates and error out; queries must narrow
/// to exactly one entity.
pub fn find_entity<T>(project: &Project, config: &EntityConfig, query: &str) -> Result<(T, PathBuf)>
where
    T: Entity + 'static,
{
    let short_ids = ShortIdIndex::load(project);
    let resolved = short_ids
        .resolve_for(config.prefix, query)
        .unwrap_or_else(|| query.to_string());

    let mut matches: Vec<(T, PathBuf)> = Vec::new();
    for (entity, path) in load_entities::<T>(project, config.prefix) {
        let id_str = entity.id().to_string();
        if id_str == resolved || id_str.starts_with(&resolved) {
            matches.push((entity, path));
        } else if entity
            .title()
            .to_lowercase()
            .contains(&query.to_lowercase())
        {
            matches.push((entity, path));
        }
    }

    match matches.len() {
        0 => Err(miette::miette!(
            "No {} found matching '{}'",
            config.name,
            query
        )),
        1 => Ok(matches.remove(0)),
        _ => {
            println!("{} Multiple matches found:", style("!").yellow());
            for (entity, _) in &matches {
                println!("  {} - {}", format_short_id(entity.id()), entity.title());
            }
            Err(miette::miette!(
                "Ambiguous query '{}'. Please be more specific.",
                query
            ))
        }
    }
}

/// Open an entity file in the configured editor
pub fn open_in_editor(path: &Path, id: &EntityId) -> Result<()> {
    let config = Config::load();
    println!(
        "Opening {} in {}...",
        style(format_short_id(id)).cyan(),
        style(config.editor()).yellow()
    );
    config.run_editor(path).into_diagnostic()?;
    Ok(())
}

/// Rewrite an entity file from its in-memory form
///
/// Scaffold comments are lost on the first rewrite; the data is what the
/// toolchain cares about.
pub fn write_entity<T: Entity>(entity: &T, path: &Path) -> Result<()> {
    let yaml = serde_yml::to_string(entity).into_diagnostic()?;
    std::fs::write(path, yaml).into_diagnostic()?;
    Ok(())
}

/// Record IDs in the short-ID index and persist it
pub fn record_short_ids<'a>(
    project: &Project,
    ids: impl IntoIterator<Item = &'a EntityId>,
) -> ShortIdIndex {
    let mut index = ShortIdIndex::load(project);
    index.record_all(ids);
    if let Err(e) = index.save(project) {
        eprintln!(
            "{} Failed to save short ID index: {}",
            style("!").yellow(),
            e
        );
    }
    index
}

/// Print the confirmation for a newly created entity
pub fn output_new_entity(
    id: &EntityId,
    file_path: &Path,
    short_id: Option<String>,
    entity_name: &str,
    title: &str,
    global: &GlobalOpts,
) {
    match global.format {
        OutputFormat::Id => {
            println!("{}", id);
        }
        OutputFormat::ShortId => {
            println!("{}", short_id.unwrap_or_else(|| format_short_id(id)));
        }
        OutputFormat::Path => {
            println!("{}", file_path.display());
        }
        _ => {
            let display_id = short_id.unwrap_or_else(|| format_short_id(id));
            println!(
                "{} Created {} {}",
                style("✓").green(),
                entity_name,
                style(&display_id).cyan()
            );
            println!("   {}", style(file_path.display()).dim());
            println!("   {}", style(title).yellow());
        }
    }
}

/// Print "No X found" message
pub fn print_no_results(name_plural: &str) {
    println!("No {} found.", name_plural);
}

/// Print list footer with count
pub fn print_list_footer(count: usize, config: &EntityConfig) {
    println!();
    println!(
        "{} {} found. Reference by short ID, e.g. {}.",
        style(count).cyan(),
        if count == 1 {
            config.name
        } else {
            config.name_plural
        },
        style(format!("{}@1", config.prefix)).cyan()
    );
}
