//! `plat validate` command - schema-check entity files

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::identity::EntityPrefix;
use crate::core::project::Project;
use crate::schema::registry::SchemaRegistry;
use crate::schema::validator::Validator;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Specific files to validate (whole project when omitted)
    pub paths: Vec<PathBuf>,

    /// Only report failures
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

struct ValidationStats {
    files_checked: usize,
    files_failed: usize,
    total_errors: usize,
}

pub fn run(args: ValidateArgs, _global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let registry = SchemaRegistry::new();
    let validator = Validator::new(&registry);

    let targets: Vec<(PathBuf, EntityPrefix)> = if args.paths.is_empty() {
        let mut all = Vec::new();
        for prefix in EntityPrefix::all() {
            for path in project.iter_entity_files(*prefix) {
                all.push((path, *prefix));
            }
        }
        all
    } else {
        let mut picked = Vec::new();
        for path in &args.paths {
            if !path.exists() {
                return Err(miette::miette!("No such file: {}", path.display()));
            }
            let prefix = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(EntityPrefix::from_filename);
            match prefix {
                Some(prefix) => picked.push((path.clone(), prefix)),
                None => {
                    eprintln!(
                        "{} Skipping {}: filename has no entity prefix",
                        style("!").yellow(),
                        path.display()
                    );
                }
            }
        }
        picked
    };

    if targets.is_empty() {
        println!("Nothing to validate.");
        return Ok(());
    }

    let mut stats = ValidationStats {
        files_checked: 0,
        files_failed: 0,
        total_errors: 0,
    };

    for (path, prefix) in &targets {
        let content = fs::read_to_string(path).into_diagnostic()?;
        let display = path
            .strip_prefix(project.root())
            .unwrap_or(path)
            .display()
            .to_string();

        stats.files_checked += 1;
        match validator.iter_errors(&content, &display, *prefix) {
            Ok(()) => {
                if !args.quiet {
                    println!("{} {}", style("✓").green(), style(&display).dim());
                }
            }
            Err(e) => {
                stats.files_failed += 1;
                stats.total_errors += e.violation_count();
                eprintln!("{} {}", style("✗").red(), display);
                eprintln!("{:?}", miette::Report::new(e));
            }
        }
    }

    println!();
    if stats.files_failed == 0 {
        println!(
            "{} {} file{} valid",
            style("✓").green(),
            stats.files_checked,
            if stats.files_checked == 1 { "" } else { "s" }
        );
        Ok(())
    } else {
        Err(miette::miette!(
            "{} of {} files failed validation ({} violation{})",
            stats.files_failed,
            stats.files_checked,
            stats.total_errors,
            if stats.total_errors == 1 { "" } else { "s" }
        ))
    }
}
