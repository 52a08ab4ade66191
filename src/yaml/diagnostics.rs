//! Miette diagnostics for YAML parse failures

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Errors from reading and parsing entity YAML files
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error("failed to read file")]
    #[diagnostic(code(plat::yaml::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),
}

/// A YAML syntax or shape error, carrying source context for display
#[derive(Debug, Error, Diagnostic)]
#[error("invalid YAML in {filename}")]
#[diagnostic(
    code(plat::yaml::syntax),
    help("check indentation and field names near the highlighted location")
)]
pub struct YamlSyntaxError {
    pub filename: String,
    pub message: String,

    #[source_code]
    src: NamedSource<String>,

    #[label("{message}")]
    span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    /// Build a labeled diagnostic from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let message = err.to_string();
        let span = err.location().and_then(|loc| {
            if content.is_empty() {
                return None;
            }
            // Location index can sit one past the end on truncated input
            let start = loc.index().min(content.len().saturating_sub(1));
            Some(SourceSpan::from(start..start + 1))
        });
        Self {
            filename: filename.to_string(),
            message,
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }
}
