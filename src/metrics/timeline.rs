//! Date-to-fraction layout for Gantt rendering
//!
//! Maps a timeline's phases and milestones onto a `[0, 1]` horizontal
//! scale so renderers only deal in fractions of the total span.

use chrono::NaiveDate;

use crate::entities::timeline::{Milestone, MilestoneStatus, Phase, PhaseStatus};

/// A phase placed on the fraction scale
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSpan {
    pub name: String,
    pub status: PhaseStatus,
    /// Left edge as a fraction of the total span
    pub left: f64,
    /// Width as a fraction of the total span; zero when dates are missing
    pub width: f64,
}

/// A milestone placed on the fraction scale
#[derive(Debug, Clone, PartialEq)]
pub struct MilestonePoint {
    pub name: String,
    pub status: MilestoneStatus,
    pub due: NaiveDate,
    /// Position as a fraction of the total span
    pub position: f64,
}

/// The laid-out timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
    /// Span in days, never less than one
    pub total_days: i64,
    /// Phases sorted by their order field
    pub phases: Vec<PhaseSpan>,
    /// Milestones with a due date, chronological
    pub milestones: Vec<MilestonePoint>,
}

/// Lay out phases and milestones on the fraction scale
///
/// Returns `None` when no element carries any date at all. A single known
/// date still lays out: the span clamps to one day and everything sits at
/// fraction zero.
pub fn layout(phases: &[Phase], milestones: &[Milestone]) -> Option<TimelineLayout> {
    let mut dates: Vec<NaiveDate> = Vec::new();
    for phase in phases {
        dates.extend(phase.start_date);
        dates.extend(phase.end_date);
    }
    dates.extend(milestones.iter().filter_map(|m| m.due_date));

    let earliest = *dates.iter().min()?;
    let latest = *dates.iter().max()?;
    let total_days = (latest - earliest).num_days().max(1);
    let span = total_days as f64;

    let mut indexed: Vec<(i32, usize, PhaseSpan)> = phases
        .iter()
        .enumerate()
        .map(|(i, phase)| {
            let left = phase
                .start_date
                .or(phase.end_date)
                .map(|d| (d - earliest).num_days() as f64 / span)
                .unwrap_or(0.0)
                .max(0.0);
            let width = match (phase.start_date, phase.end_date) {
                (Some(start), Some(end)) => ((end - start).num_days() as f64 / span).max(0.0),
                _ => 0.0,
            };
            let placed = PhaseSpan {
                name: phase.name.clone(),
                status: phase.status,
                left,
                width,
            };
            (phase.order, i, placed)
        })
        .collect();
    // Sort by the order field; equal orders keep input order
    indexed.sort_by_key(|(order, i, _)| (*order, *i));
    let spans: Vec<PhaseSpan> = indexed.into_iter().map(|(_, _, s)| s).collect();

    let mut points: Vec<MilestonePoint> = milestones
        .iter()
        .filter_map(|m| {
            let due = m.due_date?;
            Some(MilestonePoint {
                name: m.name.clone(),
                status: m.status,
                due,
                position: (due - earliest).num_days() as f64 / span,
            })
        })
        .collect();
    points.sort_by_key(|p| p.due);

    Some(TimelineLayout {
        earliest,
        latest,
        total_days,
        phases: spans,
        milestones: points,
    })
}
