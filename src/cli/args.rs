//! Top-level argument definitions

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::contact::ContactCommands;
use crate::cli::commands::dash::DashArgs;
use crate::cli::commands::deal::DealCommands;
use crate::cli::commands::export::ExportArgs;
use crate::cli::commands::health::HealthArgs;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::pro::ProCommands;
use crate::cli::commands::task::TaskCommands;
use crate::cli::commands::timeline::TimelineCommands;
use crate::cli::commands::validate::ValidateArgs;

#[derive(Parser, Debug)]
#[command(
    name = "plat",
    about = "Plain-text deal tracking for real-estate development",
    long_about = "Plat tracks a development pipeline as plain YAML files under git.\n\
                  Deals, proformas, tasks, contacts, and timelines each live in their\n\
                  own file; metrics are derived on demand and never stored.",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto", value_enum)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new plat project
    Init(InitArgs),

    /// Manage deals
    #[command(subcommand)]
    Deal(DealCommands),

    /// Manage proformas (per-deal financial worksheets)
    #[command(subcommand)]
    Pro(ProCommands),

    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommands),

    /// Manage contacts
    #[command(subcommand)]
    Contact(ContactCommands),

    /// Manage deal timelines
    #[command(subcommand)]
    Timeline(TimelineCommands),

    /// Pipeline dashboard: funnel, quarters, profitability
    Dash(DashArgs),

    /// Process health report with sigma levels
    Health(HealthArgs),

    /// Export entities to CSV
    Export(ExportArgs),

    /// Validate every entity file against its schema
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format for entity data
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable rendering for the command
    #[default]
    Auto,
    /// Aligned table with truncated columns
    Table,
    /// Tab-separated, untruncated (for awk/cut)
    Tsv,
    /// Raw YAML
    Yaml,
    /// Pretty-printed JSON
    Json,
    /// Full entity IDs, one per line
    Id,
    /// Short IDs (PREFIX@N), one per line
    ShortId,
    /// File paths, one per line
    Path,
}
