//! Shared helper functions for CLI commands

use chrono::NaiveDate;
use miette::Result;

use crate::core::identity::EntityId;

/// Format an EntityId for display, truncating if too long
///
/// IDs longer than 16 characters are truncated to 13 chars with "..." suffix.
/// This keeps list and confirmation output at a consistent width.
pub fn format_short_id(id: &EntityId) -> String {
    format_short_id_str(&id.to_string())
}

/// Format a string ID for display, truncating if too long
pub fn format_short_id_str(id: &str) -> String {
    if id.len() > 16 {
        format!("{}...", &id[..13])
    } else {
        id.to_string()
    }
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date_arg(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| miette::miette!("Invalid date '{}'. Use YYYY-MM-DD.", value))
}

/// Render an optional date for display, `-` when unset
pub fn format_opt_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;

    #[test]
    fn test_format_short_id() {
        let id = EntityId::new(EntityPrefix::Deal);
        let formatted = format_short_id(&id);
        // DEAL-<26 char ULID> is 31 chars, so it truncates
        assert!(formatted.len() <= 16);
        assert!(formatted.ends_with("..."));
        assert!(formatted.starts_with("DEAL-"));
    }

    #[test]
    fn test_format_short_id_str() {
        assert_eq!(format_short_id_str("DEAL@3"), "DEAL@3");
        assert_eq!(
            format_short_id_str("DEAL-01J123456789ABCDEF123456"),
            "DEAL-01J123456..."
        );
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        // Truncation counts chars, not bytes
        assert_eq!(truncate_str("née Müller-Straße", 9), "née Mü...");
    }

    #[test]
    fn test_parse_date_arg() {
        assert_eq!(
            parse_date_arg("2026-06-30").unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()
        );
        assert!(parse_date_arg("06/30/2026").is_err());
        assert!(parse_date_arg("someday").is_err());
    }

    #[test]
    fn test_format_opt_date() {
        assert_eq!(format_opt_date(None), "-");
        assert_eq!(
            format_opt_date(NaiveDate::from_ymd_opt(2026, 1, 5)),
            "2026-01-05"
        );
    }
}
