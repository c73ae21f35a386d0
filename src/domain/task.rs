use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{DomainError, DomainResult};

/// Wire format for due dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        TaskId(id)
    }
}

impl FromStr for TaskId {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        s.trim()
            .parse::<i64>()
            .map(TaskId)
            .map_err(|_| DomainError::InvalidId(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Done,
    ];

    /// Next status in the fixed rotation. There is no terminal state.
    pub fn next(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Pending,
        }
    }

    pub fn previous(self) -> Self {
        self.next().next()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim() {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(DomainError::InvalidValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    pub fn previous(self) -> Self {
        self.next().next()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(DomainError::InvalidValue {
                field: "priority",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl Task {
    /// Copy of this task with only the status advanced.
    pub fn with_next_status(&self) -> Task {
        Task {
            status: self.status.next(),
            ..self.clone()
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    pub fn due_date_display(&self) -> String {
        match self.due_date {
            None => String::new(),
            Some(due) => format!("Due {}", due.format(DATE_FORMAT)),
        }
    }
}

/// Fields submitted when creating a task. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::MissingField("title".to_string()));
        }

        Ok(Self {
            title,
            description: None,
            status: TaskStatus::default(),
            priority: Priority::default(),
            due_date: None,
        })
    }

    /// Build from raw form input. Empty description and due date mean "none".
    pub fn from_form(
        title: &str,
        description: &str,
        status: TaskStatus,
        priority: Priority,
        due_date: &str,
    ) -> DomainResult<Self> {
        let mut task = Self::new(title)?;
        task.description = (!description.trim().is_empty()).then(|| description.to_string());
        task.status = status;
        task.priority = priority;
        task.due_date = parse_due_date(due_date)?;
        Ok(task)
    }
}

/// Parse user-entered due date. Blank input is "no due date".
pub fn parse_due_date(input: &str) -> DomainResult<Option<NaiveDate>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map(Some)
        .map_err(|_| DomainError::InvalidDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_cycle_returns_after_three_steps() {
        for status in TaskStatus::ALL {
            assert_ne!(status.next(), status);
            assert_eq!(status.next().next().next(), status);
        }
        assert_eq!(TaskStatus::Pending.next(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::InProgress.next(), TaskStatus::Done);
        assert_eq!(TaskStatus::Done.next(), TaskStatus::Pending);
    }

    #[test]
    fn test_with_next_status_keeps_other_fields() {
        let task = Task {
            id: TaskId(7),
            title: "Write report".to_string(),
            description: Some("quarterly".to_string()),
            status: TaskStatus::InProgress,
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        };

        let next = task.with_next_status();
        assert_eq!(next.status, TaskStatus::Done);
        assert_eq!(next.id, task.id);
        assert_eq!(next.title, task.title);
        assert_eq!(next.description, task.description);
        assert_eq!(next.priority, task.priority);
        assert_eq!(next.due_date, task.due_date);
    }

    #[test]
    fn test_new_task_rejects_blank_title() {
        assert!(matches!(NewTask::new(""), Err(DomainError::MissingField(_))));
        assert!(matches!(NewTask::new("   \t"), Err(DomainError::MissingField(_))));
        assert_eq!(NewTask::new(" ship it ").unwrap().title, " ship it ");
    }

    #[test]
    fn test_from_form_normalizes_empty_fields() {
        let task =
            NewTask::from_form("Buy milk", "", TaskStatus::Pending, Priority::Low, "").unwrap();
        assert_eq!(task.description, None);
        assert_eq!(task.due_date, None);

        let task = NewTask::from_form(
            "Buy milk",
            "two litres",
            TaskStatus::Done,
            Priority::High,
            "2024-06-01",
        )
        .unwrap();
        assert_eq!(task.description.as_deref(), Some("two litres"));
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn test_from_form_rejects_bad_date() {
        let result =
            NewTask::from_form("x", "", TaskStatus::Pending, Priority::Medium, "06/01/2024");
        assert!(matches!(result, Err(DomainError::InvalidDate(_))));
    }

    #[test]
    fn test_parse_enums_from_wire_names() {
        assert_eq!("in_progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!("42".parse::<TaskId>().unwrap(), TaskId(42));
        assert!("abc".parse::<TaskId>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let priority: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(priority, Priority::Low);
    }
}
