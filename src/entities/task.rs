//! Task entity type

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, Priority};
use crate::core::identity::EntityId;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Blocked,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn all() -> &'static [TaskStatus] {
        &[
            TaskStatus::Todo,
            TaskStatus::InProgress,
            TaskStatus::Blocked,
            TaskStatus::Completed,
        ]
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, TaskStatus::Completed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" | "in-progress" => Ok(TaskStatus::InProgress),
            "blocked" => Ok(TaskStatus::Blocked),
            "completed" | "done" => Ok(TaskStatus::Completed),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// A unit of work, optionally attached to a deal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: EntityId,

    /// Short title
    pub title: String,

    /// Deal this task belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal: Option<EntityId>,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,

    /// Priority level
    #[serde(default)]
    pub priority: Priority,

    /// When the task is due
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// When the task was completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Tags for filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who created this task)
    pub author: String,

    /// Revision number
    #[serde(default = "default_revision")]
    pub revision: u32,
}

fn default_revision() -> u32 {
    1
}

impl Entity for Task {
    const PREFIX: &'static str = "TASK";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn status(&self) -> &str {
        self.status.as_str()
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}

impl Task {
    /// Create a new task with the given parameters
    pub fn new(title: String, author: String) -> Self {
        Self {
            id: EntityId::new(crate::core::EntityPrefix::Task),
            title,
            deal: None,
            status: TaskStatus::default(),
            priority: Priority::default(),
            due_date: None,
            completed_date: None,
            description: None,
            tags: Vec::new(),
            created: Utc::now(),
            author,
            revision: 1,
        }
    }

    pub fn with_deal(mut self, deal: EntityId) -> Self {
        self.deal = Some(deal);
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Mark completed as of `date`
    pub fn complete(&mut self, date: NaiveDate) {
        self.status = TaskStatus::Completed;
        self.completed_date = Some(date);
    }

    /// An open task whose due date has passed is overdue
    ///
    /// Day granularity: due today is not overdue yet.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if !self.status.is_open() {
            return false;
        }
        match self.due_date {
            Some(due) => due < today,
            None => false,
        }
    }

    /// Whether a completed task met its due date
    ///
    /// Missing either date counts as on-time: we only penalize tasks we can
    /// prove were late. Open tasks answer `None`.
    pub fn completed_on_time(&self) -> Option<bool> {
        if self.status.is_open() {
            return None;
        }
        match (self.due_date, self.completed_date) {
            (Some(due), Some(done)) => Some(done <= due),
            _ => Some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_task_roundtrip() {
        let task = Task::new("Order survey".to_string(), "test".to_string())
            .with_due_date(date(2024, 6, 1))
            .with_priority(Priority::High);

        let yaml = serde_yml::to_string(&task).unwrap();
        let parsed: Task = serde_yml::from_str(&yaml).unwrap();

        assert_eq!(parsed.id, task.id);
        assert_eq!(parsed.due_date, Some(date(2024, 6, 1)));
        assert_eq!(parsed.priority, Priority::High);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_yml::to_string(&TaskStatus::Todo).unwrap().trim(),
            "todo"
        );
        assert_eq!(
            serde_yml::to_string(&TaskStatus::InProgress).unwrap().trim(),
            "in_progress"
        );
        assert_eq!(
            serde_yml::to_string(&TaskStatus::Blocked).unwrap().trim(),
            "blocked"
        );
        assert_eq!(
            serde_yml::to_string(&TaskStatus::Completed).unwrap().trim(),
            "completed"
        );
    }

    #[test]
    fn test_status_from_str_aliases() {
        assert_eq!("done".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert_eq!(
            "in-progress".parse::<TaskStatus>().unwrap(),
            TaskStatus::InProgress
        );
        assert!("paused".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_overdue_requires_open_status_and_past_due() {
        let today = date(2024, 6, 15);

        let mut task = Task::new("X".to_string(), "test".to_string());
        assert!(!task.is_overdue(today)); // no due date

        task.due_date = Some(date(2024, 6, 14));
        assert!(task.is_overdue(today));

        // Due today is not overdue
        task.due_date = Some(today);
        assert!(!task.is_overdue(today));

        // Completed tasks are never overdue, however late the dates look
        task.due_date = Some(date(2024, 1, 1));
        task.complete(date(2024, 6, 1));
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn test_completed_on_time() {
        let mut task = Task::new("X".to_string(), "test".to_string());
        assert_eq!(task.completed_on_time(), None); // still open

        task.due_date = Some(date(2024, 6, 1));
        task.complete(date(2024, 5, 30));
        assert_eq!(task.completed_on_time(), Some(true));

        task.completed_date = Some(date(2024, 6, 1));
        assert_eq!(task.completed_on_time(), Some(true)); // on the day counts

        task.completed_date = Some(date(2024, 6, 2));
        assert_eq!(task.completed_on_time(), Some(false));
    }

    #[test]
    fn test_completed_without_dates_counts_on_time() {
        let mut task = Task::new("X".to_string(), "test".to_string());
        task.status = TaskStatus::Completed;
        assert_eq!(task.completed_on_time(), Some(true));

        task.due_date = Some(date(2024, 6, 1));
        task.completed_date = None;
        assert_eq!(task.completed_on_time(), Some(true));
    }

    #[test]
    fn test_blocked_tasks_count_as_open() {
        let mut task = Task::new("X".to_string(), "test".to_string());
        task.status = TaskStatus::Blocked;
        task.due_date = Some(date(2024, 1, 1));
        assert!(task.is_overdue(date(2024, 2, 1)));
    }

    #[test]
    fn test_minimal_file_deserializes_with_defaults() {
        let yaml = r#"
id: TASK-01KDGJC92W6EBFGZ5SJW6MFGW6
title: "Bare"
created: "2024-01-01T00:00:00Z"
author: "test"
"#;
        let task: Task = serde_yml::from_str(yaml).unwrap();
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.deal.is_none());
    }
}
