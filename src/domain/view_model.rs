//! Derived views over a task snapshot.
//!
//! Everything here is a pure function of the task list, the selected filter
//! and the current calendar date. Callers recompute on every render.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;
use super::task::{Task, TaskStatus};

/// Shown when a filter leaves nothing visible.
pub const EMPTY_LIST_MESSAGE: &str = "No tasks yet.";

/// Today's calendar date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFilter {
    #[default]
    All,
    Today,
    Overdue,
    Done,
}

impl TaskFilter {
    pub const ALL: [TaskFilter; 4] = [
        TaskFilter::All,
        TaskFilter::Today,
        TaskFilter::Overdue,
        TaskFilter::Done,
    ];

    /// Tasks without a due date only show up under `All` and (when done) `Done`.
    pub fn matches(self, task: &Task, today: NaiveDate) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Today => task.due_date == Some(today),
            TaskFilter::Overdue => is_overdue(task, today),
            TaskFilter::Done => task.status == TaskStatus::Done,
        }
    }

    pub fn next(self) -> Self {
        match self {
            TaskFilter::All => TaskFilter::Today,
            TaskFilter::Today => TaskFilter::Overdue,
            TaskFilter::Overdue => TaskFilter::Done,
            TaskFilter::Done => TaskFilter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Today => "today",
            TaskFilter::Overdue => "overdue",
            TaskFilter::Done => "done",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskFilter::All => "All",
            TaskFilter::Today => "Today",
            TaskFilter::Overdue => "Overdue",
            TaskFilter::Done => "Done",
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "today" => Ok(TaskFilter::Today),
            "overdue" => Ok(TaskFilter::Overdue),
            "done" => Ok(TaskFilter::Done),
            other => Err(DomainError::InvalidValue {
                field: "filter",
                value: other.to_string(),
            }),
        }
    }
}

/// Overdue badge: has a due date strictly before today and is not done.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    task.due_date
        .map(|due| due < today && task.status != TaskStatus::Done)
        .unwrap_or(false)
}

/// Visible subset, in snapshot order.
pub fn filter_tasks(tasks: &[Task], filter: TaskFilter, today: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| filter.matches(t, today)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub completion_percent: u8,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.is_done()).count();
        let completion_percent = if total == 0 {
            0
        } else {
            (completed as f64 / total as f64 * 100.0).round() as u8
        };

        Self {
            total,
            completed,
            completion_percent,
        }
    }
}
