//! Pipeline process health assessment
//!
//! Rates answer `None` when their denominator is empty: a pipeline with no
//! closed deals has no conversion rate, not a zero one.

use chrono::NaiveDate;
use serde::Serialize;

use crate::entities::deal::{Deal, DealStage};
use crate::entities::task::Task;
use crate::metrics::sigma::{dpmo_from_failure_pct, sigma_level};

/// Snapshot of how the pipeline and its task discipline are running
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessHealth {
    /// closed / (closed + dead), as a percentage
    pub conversion_rate: Option<f64>,
    /// Mean contract-to-close span in days
    pub avg_cycle_days: Option<f64>,
    /// Completed tasks that met their due date, as a percentage
    pub task_on_time_rate: Option<f64>,
    /// Open tasks already past due
    pub overdue_tasks: usize,
    /// Sigma level of task lateness
    pub task_sigma: Option<f64>,
    /// Sigma level of deals dying instead of closing
    pub deal_sigma: Option<f64>,
    /// Deals still in the pipeline
    pub active_deals: usize,
    pub closed_deals: usize,
    pub dead_deals: usize,
    pub completed_tasks: usize,
}

/// Assess pipeline health as of `today`
pub fn assess_process_health(deals: &[Deal], tasks: &[Task], today: NaiveDate) -> ProcessHealth {
    let closed_deals = deals.iter().filter(|d| d.stage == DealStage::Closed).count();
    let dead_deals = deals.iter().filter(|d| d.stage == DealStage::Dead).count();
    let active_deals = deals.iter().filter(|d| d.stage.is_active()).count();
    let terminal = closed_deals + dead_deals;

    let conversion_rate = if terminal > 0 {
        Some(closed_deals as f64 / terminal as f64 * 100.0)
    } else {
        None
    };

    let cycle_spans: Vec<i64> = deals.iter().filter_map(|d| d.cycle_days()).collect();
    let avg_cycle_days = if cycle_spans.is_empty() {
        None
    } else {
        Some(cycle_spans.iter().sum::<i64>() as f64 / cycle_spans.len() as f64)
    };

    let completions: Vec<bool> = tasks.iter().filter_map(|t| t.completed_on_time()).collect();
    let completed_tasks = completions.len();
    let task_on_time_rate = if completed_tasks > 0 {
        let on_time = completions.iter().filter(|&&ok| ok).count();
        Some(on_time as f64 / completed_tasks as f64 * 100.0)
    } else {
        None
    };

    let overdue_tasks = tasks.iter().filter(|t| t.is_overdue(today)).count();

    let task_sigma = task_on_time_rate.map(|rate| sigma_level(dpmo_from_failure_pct(100.0 - rate)));
    let deal_sigma = if terminal > 0 {
        let dead_rate = dead_deals as f64 / terminal as f64;
        Some(sigma_level(dead_rate * 1_000_000.0))
    } else {
        None
    };

    ProcessHealth {
        conversion_rate,
        avg_cycle_days,
        task_on_time_rate,
        overdue_tasks,
        task_sigma,
        deal_sigma,
        active_deals,
        closed_deals,
        dead_deals,
        completed_tasks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::deal::DealStage;
    use crate::entities::task::TaskStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn deal_in(stage: DealStage) -> Deal {
        Deal::new("D".to_string(), "test".to_string()).with_stage(stage)
    }

    fn closed_deal(contract: NaiveDate, close: NaiveDate) -> Deal {
        let mut deal = deal_in(DealStage::Closed);
        deal.contract_date = Some(contract);
        deal.close_date = Some(close);
        deal
    }

    #[test]
    fn test_empty_inputs_are_all_none() {
        let health = assess_process_health(&[], &[], date(2024, 6, 15));
        assert_eq!(health.conversion_rate, None);
        assert_eq!(health.avg_cycle_days, None);
        assert_eq!(health.task_on_time_rate, None);
        assert_eq!(health.task_sigma, None);
        assert_eq!(health.deal_sigma, None);
        assert_eq!(health.overdue_tasks, 0);
        assert_eq!(health.active_deals, 0);
    }

    #[test]
    fn test_conversion_rate_counts_terminal_only() {
        let deals = vec![
            deal_in(DealStage::Closed),
            deal_in(DealStage::Closed),
            deal_in(DealStage::Dead),
            deal_in(DealStage::Development),
            deal_in(DealStage::Prospecting),
        ];
        let health = assess_process_health(&deals, &[], date(2024, 6, 15));
        let rate = health.conversion_rate.unwrap();
        assert!((rate - 66.666_666_666_666_67).abs() < 1e-9);
        assert_eq!(health.active_deals, 2);
        assert_eq!(health.closed_deals, 2);
        assert_eq!(health.dead_deals, 1);
    }

    #[test]
    fn test_all_dead_pipeline_is_zero_not_none() {
        let deals = vec![deal_in(DealStage::Dead), deal_in(DealStage::Dead)];
        let health = assess_process_health(&deals, &[], date(2024, 6, 15));
        assert_eq!(health.conversion_rate, Some(0.0));
        // Every terminal deal died: one million DPMO
        assert_eq!(health.deal_sigma, Some(0.0));
    }

    #[test]
    fn test_avg_cycle_days() {
        let deals = vec![
            closed_deal(date(2024, 1, 1), date(2024, 3, 1)), // 60 days
            closed_deal(date(2024, 1, 1), date(2024, 4, 10)), // 100 days
        ];
        let health = assess_process_health(&deals, &[], date(2024, 6, 15));
        assert_eq!(health.avg_cycle_days, Some(80.0));
    }

    #[test]
    fn test_cycle_days_need_both_dates() {
        let mut deal = deal_in(DealStage::Closed);
        deal.close_date = Some(date(2024, 3, 1)); // no contract date
        let health = assess_process_health(&[deal], &[], date(2024, 6, 15));
        assert_eq!(health.avg_cycle_days, None);
    }

    #[test]
    fn test_on_time_rate_and_task_sigma() {
        let due = date(2024, 5, 1);
        let mut on_time = Task::new("A".to_string(), "test".to_string()).with_due_date(due);
        on_time.complete(date(2024, 4, 28));
        let mut late = Task::new("B".to_string(), "test".to_string()).with_due_date(due);
        late.complete(date(2024, 5, 10));
        let open = Task::new("C".to_string(), "test".to_string()).with_due_date(due);

        let tasks = vec![on_time, late, open];
        let health = assess_process_health(&[], &tasks, date(2024, 6, 15));

        assert_eq!(health.completed_tasks, 2);
        assert_eq!(health.task_on_time_rate, Some(50.0));
        // 50% failures = 500,000 DPMO, deep in the 1-2 sigma bracket
        let sigma = health.task_sigma.unwrap();
        assert!(sigma > 1.0 && sigma < 2.0, "got {sigma}");
    }

    #[test]
    fn test_completed_without_dates_counts_on_time() {
        let mut task = Task::new("A".to_string(), "test".to_string());
        task.status = TaskStatus::Completed;
        let health = assess_process_health(&[], &[task], date(2024, 6, 15));
        assert_eq!(health.task_on_time_rate, Some(100.0));
        assert_eq!(health.task_sigma, Some(6.0));
    }

    #[test]
    fn test_overdue_excludes_completed() {
        let today = date(2024, 6, 15);
        let past_due = date(2024, 6, 1);

        let open_late = Task::new("A".to_string(), "test".to_string()).with_due_date(past_due);
        let blocked_late = {
            let mut t = Task::new("B".to_string(), "test".to_string()).with_due_date(past_due);
            t.status = TaskStatus::Blocked;
            t
        };
        let done_late = {
            let mut t = Task::new("C".to_string(), "test".to_string()).with_due_date(past_due);
            t.complete(date(2024, 6, 10));
            t
        };
        let due_today = Task::new("D".to_string(), "test".to_string()).with_due_date(today);

        let tasks = vec![open_late, blocked_late, done_late, due_today];
        let health = assess_process_health(&[], &tasks, today);
        assert_eq!(health.overdue_tasks, 2);
    }

    #[test]
    fn test_deal_sigma_tracks_dead_rate() {
        // 1 dead out of 4 terminal = 250,000 DPMO
        let deals = vec![
            deal_in(DealStage::Closed),
            deal_in(DealStage::Closed),
            deal_in(DealStage::Closed),
            deal_in(DealStage::Dead),
        ];
        let health = assess_process_health(&deals, &[], date(2024, 6, 15));
        let sigma = health.deal_sigma.unwrap();
        assert!(sigma > 2.0 && sigma < 3.0, "got {sigma}");
    }

    #[test]
    fn test_perfect_pipeline() {
        let deals = vec![deal_in(DealStage::Closed)];
        let mut task = Task::new("A".to_string(), "test".to_string()).with_due_date(date(2024, 5, 1));
        task.complete(date(2024, 4, 1));
        let health = assess_process_health(&deals, &[task], date(2024, 6, 15));
        assert_eq!(health.conversion_rate, Some(100.0));
        assert_eq!(health.deal_sigma, Some(6.0));
        assert_eq!(health.task_sigma, Some(6.0));
    }

    #[test]
    fn test_negative_cycle_span_counts_as_is() {
        // close before contract: bad data surfaces as a negative average
        let deals = vec![closed_deal(date(2024, 3, 1), date(2024, 1, 1))];
        let health = assess_process_health(&deals, &[], date(2024, 6, 15));
        assert_eq!(health.avg_cycle_days, Some(-60.0));
    }
}
