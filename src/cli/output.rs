//! Output formatting utilities

use crate::cli::OutputFormat;

/// Resolve `auto` to the human-readable rendering
///
/// Machine formats (json, yaml, tsv, id, path) are always opt-in; `auto`
/// never produces one. List commands render the result as a table, show
/// commands as their detail view.
pub fn effective_format(format: OutputFormat) -> OutputFormat {
    match format {
        OutputFormat::Auto => OutputFormat::Table,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_resolves_to_human_rendering() {
        assert_eq!(effective_format(OutputFormat::Auto), OutputFormat::Table);
    }

    #[test]
    fn test_explicit_formats_pass_through() {
        assert_eq!(effective_format(OutputFormat::Json), OutputFormat::Json);
        assert_eq!(effective_format(OutputFormat::Yaml), OutputFormat::Yaml);
        assert_eq!(effective_format(OutputFormat::Id), OutputFormat::Id);
    }
}
