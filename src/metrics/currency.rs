//! Currency and rate formatting for reports
//!
//! USD only. Dashboards show whole dollars; cents on a land deal are noise.

/// Full currency string with thousands separators, e.g. `$235,000`
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let body = group_thousands(rounded.abs() as u64);
    if rounded < 0.0 {
        format!("-${}", body)
    } else {
        format!("${}", body)
    }
}

/// Abbreviated currency string: `$2.1M`, `$450K`, `$50`
pub fn format_currency_compact(value: f64) -> String {
    let abs = value.abs();
    let body = if abs >= 1_000_000.0 {
        format!("${:.1}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("${:.0}K", abs / 1_000.0)
    } else {
        format!("${:.0}", abs)
    };
    if value < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

/// A rate already in the 0-100 space, e.g. `66.7%`
pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate)
}

/// A ratio in days, shown to one decimal, e.g. `94.5 days`
pub fn format_days(days: f64) -> String {
    format!("{:.1} days", days)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_snapshot!(format_currency(235_000.0), @"$235,000");
        assert_snapshot!(format_currency(1_234_567.0), @"$1,234,567");
        assert_snapshot!(format_currency(999.0), @"$999");
        assert_snapshot!(format_currency(0.0), @"$0");
    }

    #[test]
    fn test_format_currency_rounds_cents() {
        assert_snapshot!(format_currency(1_499.5), @"$1,500");
        assert_snapshot!(format_currency(1_499.4), @"$1,499");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_snapshot!(format_currency(-1_250.0), @"-$1,250");
        // Rounds to zero, no stray sign
        assert_snapshot!(format_currency(-0.4), @"$0");
    }

    #[test]
    fn test_format_compact_thresholds() {
        assert_snapshot!(format_currency_compact(2_100_000.0), @"$2.1M");
        assert_snapshot!(format_currency_compact(1_000_000.0), @"$1.0M");
        assert_snapshot!(format_currency_compact(450_000.0), @"$450K");
        assert_snapshot!(format_currency_compact(1_000.0), @"$1K");
        assert_snapshot!(format_currency_compact(999.0), @"$999");
        assert_snapshot!(format_currency_compact(50.0), @"$50");
    }

    #[test]
    fn test_format_compact_negative() {
        assert_snapshot!(format_currency_compact(-1_500_000.0), @"-$1.5M");
    }

    #[test]
    fn test_format_percent() {
        assert_snapshot!(format_percent(66.666_666), @"66.7%");
        assert_snapshot!(format_percent(0.0), @"0.0%");
        assert_snapshot!(format_percent(100.0), @"100.0%");
    }

    #[test]
    fn test_format_days() {
        assert_snapshot!(format_days(94.5), @"94.5 days");
    }
}
