//! Terminal visualization for pipeline and schedule data
//!
//! Gantt bars, funnel and quarter charts are plain block glyphs; the value
//! trend uses Unicode braille for a denser plot. Everything renders to a
//! `String` so commands decide when to print.

use drawille::Canvas;

use crate::entities::timeline::{MilestoneStatus, PhaseStatus};
use crate::metrics::pipeline::{QuarterSummary, StageSummary};
use crate::metrics::timeline::{MilestonePoint, PhaseSpan, TimelineLayout};
use crate::metrics::{format_currency, format_currency_compact};

/// Default bar width for gantt and chart output
pub const DEFAULT_CHART_WIDTH: usize = 60;

/// Label column width for gantt rows
const GANTT_LABEL_WIDTH: usize = 22;

/// Render a timeline as a Gantt chart
///
/// Phases draw as bars between their fraction offsets, milestones as single
/// markers. A phase without both dates still gets a one-glyph marker at its
/// known edge so it is not invisible.
///
/// # Example Output
/// ```text
/// Due diligence         │████████░░░░░░░░░░░░░░░░░░░░│ active
/// Entitlement           │        ░░░░░░░░░░░░        │ planned
/// Close on land         │            ◇               │ 2026-04-01 pending
///                       2026-01-15 ──── 90 days ──── 2026-04-15
/// ```
pub fn render_gantt(layout: &TimelineLayout, width: usize) -> String {
    let width = width.max(10);
    let mut lines = Vec::new();

    for phase in &layout.phases {
        lines.push(render_phase_row(phase, width));
    }
    for milestone in &layout.milestones {
        lines.push(render_milestone_row(milestone, width));
    }

    // Date axis under the bars
    let span_label = format!(" {} days ", layout.total_days);
    let left = layout.earliest.format("%Y-%m-%d").to_string();
    let right = layout.latest.format("%Y-%m-%d").to_string();
    let mid_width = width.saturating_sub(left.len() + right.len());
    let dashes = mid_width.saturating_sub(span_label.len());
    let axis = format!(
        "{}{}{}{}{}",
        left,
        "─".repeat(dashes / 2),
        span_label,
        "─".repeat(dashes - dashes / 2),
        right
    );
    lines.push(format!("{} {}", " ".repeat(GANTT_LABEL_WIDTH), axis));

    lines.join("\n")
}

fn render_phase_row(phase: &PhaseSpan, width: usize) -> String {
    let mut bar: Vec<char> = vec![' '; width];
    let start = ((phase.left * width as f64) as usize).min(width - 1);
    let len = ((phase.width * width as f64).round() as usize).max(1);
    let glyph = phase_glyph(phase.status);
    for slot in bar.iter_mut().skip(start).take(len) {
        *slot = glyph;
    }

    format!(
        "{:<label$} │{}│ {}",
        truncate_label(&phase.name, GANTT_LABEL_WIDTH),
        bar.iter().collect::<String>(),
        phase.status,
        label = GANTT_LABEL_WIDTH
    )
}

fn render_milestone_row(milestone: &MilestonePoint, width: usize) -> String {
    let mut bar: Vec<char> = vec![' '; width];
    let pos = ((milestone.position * width as f64) as usize).min(width - 1);
    bar[pos] = milestone_glyph(milestone.status);

    format!(
        "{:<label$} │{}│ {} {}",
        truncate_label(&milestone.name, GANTT_LABEL_WIDTH),
        bar.iter().collect::<String>(),
        milestone.due.format("%Y-%m-%d"),
        milestone.status,
        label = GANTT_LABEL_WIDTH
    )
}

fn phase_glyph(status: PhaseStatus) -> char {
    match status {
        PhaseStatus::Planned => '░',
        PhaseStatus::Active => '▓',
        PhaseStatus::Completed => '█',
        PhaseStatus::Delayed => '▒',
    }
}

fn milestone_glyph(status: MilestoneStatus) -> char {
    match status {
        MilestoneStatus::Pending => '◇',
        MilestoneStatus::Reached => '◆',
        MilestoneStatus::Missed => '✗',
    }
}

/// Render the pipeline funnel: one bar per stage, scaled by deal count
///
/// # Example Output
/// ```text
/// prospecting             ████████████ 4   $3.2M
/// controlled_approved     ██████ 2         $1.5M
/// closed                  ███ 1            $890K
/// ```
pub fn render_stage_funnel(stages: &[StageSummary], width: usize) -> String {
    let max_count = stages.iter().map(|s| s.deal_count).max().unwrap_or(0).max(1);
    let mut lines = Vec::new();

    for summary in stages {
        let bar_len = summary.deal_count * width / max_count;
        let bar: String = "█".repeat(bar_len);
        lines.push(format!(
            "{:<24} {:<bar_width$} {:>3}  {:>8}",
            summary.stage,
            bar,
            summary.deal_count,
            format_currency_compact(summary.total_value),
            bar_width = width
        ));
    }

    lines.join("\n")
}

/// Render deal value per quarter as a horizontal bar chart
///
/// # Example Output
/// ```text
/// 2026 Q1 │████████████░░░░░░░░│ $1,200,000 (2 deals)
/// 2026 Q2 │████████████████████│ $2,050,000 (3 deals)
/// ```
pub fn render_quarter_chart(quarters: &[QuarterSummary], width: usize) -> String {
    let max_value = quarters
        .iter()
        .map(|q| q.total_value)
        .fold(0.0f64, f64::max)
        .max(1.0);
    let mut lines = Vec::new();

    for quarter in quarters {
        let filled = ((quarter.total_value / max_value) * width as f64).round() as usize;
        let filled = filled.min(width);
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(width - filled));
        lines.push(format!(
            "{} │{}│ {} ({} {})",
            quarter.label(),
            bar,
            format_currency(quarter.total_value),
            quarter.deal_count,
            if quarter.deal_count == 1 {
                "deal"
            } else {
                "deals"
            }
        ));
    }

    lines.join("\n")
}

/// Render quarterly deal value as a braille trend line
///
/// Returns an empty string below two quarters; a single point is not a
/// trend.
pub fn render_value_trend(quarters: &[QuarterSummary], width: u32, height: u32) -> String {
    if quarters.len() < 2 {
        return String::new();
    }

    let max_value = quarters
        .iter()
        .map(|q| q.total_value)
        .fold(0.0f64, f64::max)
        .max(1.0);

    let mut canvas = Canvas::new(width, height);
    let step = width as f64 / (quarters.len() - 1) as f64;

    let point = |i: usize| -> (f64, f64) {
        let x = i as f64 * step;
        let y = height as f64 - (quarters[i].total_value / max_value) * height as f64;
        (x, y.clamp(0.0, height as f64 - 1.0))
    };

    for i in 0..quarters.len() - 1 {
        let (x0, y0) = point(i);
        let (x1, y1) = point(i + 1);
        // Interpolate along the segment; drawille plots individual dots
        let steps = ((x1 - x0).abs().max((y1 - y0).abs()) as u32).max(1);
        for s in 0..=steps {
            let t = s as f64 / steps as f64;
            let x = x0 + (x1 - x0) * t;
            let y = y0 + (y1 - y0) * t;
            canvas.set(x as u32, y as u32);
        }
    }

    let first = quarters.first().map(|q| q.label()).unwrap_or_default();
    let last = quarters.last().map(|q| q.label()).unwrap_or_default();
    format!("{}\n{} → {}", canvas.frame(), first, last)
}

/// Truncate a label with an ellipsis
fn truncate_label(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!(
            "{}…",
            s.chars().take(max_len.saturating_sub(1)).collect::<String>()
        )
    }
}
