//! `plat init` command - project initialization

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::core::identity::EntityPrefix;
use crate::core::project::Project;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Suppress the getting-started hints
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let target = match args.path {
        Some(path) => path,
        None => std::env::current_dir().map_err(|e| miette::miette!("{}", e))?,
    };

    let project = Project::init(&target).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Initialized plat project in {}",
        style("✓").green(),
        style(project.root().display()).cyan()
    );
    for prefix in EntityPrefix::all() {
        println!("   {}", style(prefix.dir()).dim());
    }

    if !args.quiet {
        println!();
        println!("Next steps:");
        println!(
            "  {}   create your first deal",
            style("plat deal new --title \"...\"").yellow()
        );
        println!(
            "  {}                   see the pipeline",
            style("plat dash").yellow()
        );
        println!(
            "  {}              check files against schemas",
            style("plat validate").yellow()
        );
    }

    Ok(())
}
