//! Configuration - project and user settings
//!
//! Project settings live in `.plat/config.yaml`; user-level defaults in the
//! platform config dir (e.g. `~/.config/plat/config.yaml`). Project values
//! win. Missing or unparseable files fall back to defaults silently: config
//! is a convenience layer, never a hard requirement.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::project::Project;
use crate::metrics::profit::ProfitAssumptions;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Author recorded on new entities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Editor command for `--edit`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Overrides for the financial assumptions baked into profit math
    #[serde(default)]
    pub assumptions: AssumptionsConfig,
}

/// Configurable financial assumptions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssumptionsConfig {
    /// Contingency percentage applied to hard+soft costs (default 5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contingency_percentage: Option<f64>,

    /// Sales commission percentage applied to gross revenue (default 3)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_commission_percentage: Option<f64>,
}

impl Config {
    /// Load configuration, merging project config over user config
    pub fn load() -> Self {
        let mut config = Self::load_user().unwrap_or_default();
        if let Ok(project) = Project::discover() {
            if let Some(project_config) = Self::read_file(&project.marker_dir().join("config.yaml"))
            {
                config.merge(project_config);
            }
        }
        config
    }

    fn load_user() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("", "", "plat")?;
        Self::read_file(&dirs.config_dir().join("config.yaml"))
    }

    fn read_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        serde_yml::from_str(&content).ok()
    }

    /// Overlay `other`'s set fields onto self
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.editor.is_some() {
            self.editor = other.editor;
        }
        if other.assumptions.contingency_percentage.is_some() {
            self.assumptions.contingency_percentage = other.assumptions.contingency_percentage;
        }
        if other.assumptions.sales_commission_percentage.is_some() {
            self.assumptions.sales_commission_percentage =
                other.assumptions.sales_commission_percentage;
        }
    }

    /// Author for new entities: config, then $USER, then "unknown"
    pub fn author(&self) -> String {
        self.author
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Editor command: config, then $EDITOR, then vi
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| "vi".to_string())
    }

    /// Open `path` in the configured editor, waiting for it to exit
    pub fn run_editor(&self, path: &Path) -> io::Result<()> {
        let editor = self.editor();
        let mut parts = editor.split_whitespace();
        let program = parts.next().unwrap_or("vi");
        let status = std::process::Command::new(program)
            .args(parts)
            .arg(path)
            .status()?;
        if !status.success() {
            return Err(io::Error::other(format!(
                "editor '{}' exited with {}",
                editor, status
            )));
        }
        Ok(())
    }

    /// Profit assumptions with any configured overrides applied
    pub fn profit_assumptions(&self) -> ProfitAssumptions {
        let defaults = ProfitAssumptions::default();
        ProfitAssumptions {
            contingency_pct: self
                .assumptions
                .contingency_percentage
                .unwrap_or(defaults.contingency_pct),
            sales_commission_pct: self
                .assumptions
                .sales_commission_percentage
                .unwrap_or(defaults.sales_commission_pct),
        }
    }
}
