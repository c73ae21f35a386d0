use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::domain::*;

// Task as served by `GET /tasks` and sent back on `PUT /tasks/{id}`
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    // Nullable and free-form on the server side
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>, // YYYY-MM-DD, occasionally a full datetime
}

// Request body for `POST /tasks`
#[derive(Debug, Serialize)]
pub struct TaskCreateDto {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<String>,
}

/// Decodes `GET /tasks` row by row. Rows that do not map to a task are skipped.
pub fn decode_task_list(rows: Vec<serde_json::Value>) -> Vec<Task> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<TaskDto>(row.clone()) {
            Ok(dto) => Some(dto.into()),
            Err(e) => {
                tracing::warn!("Skipping task row {}: {}", row, e);
                None
            }
        })
        .collect()
}

/// Keep only the calendar date. Datetimes are cut at the `T` or the space.
fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split(['T', ' ']).next().unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!("Ignoring unparseable due date {:?}: {}", raw, e);
            None
        }
    }
}

// Unknown priorities fall back to the default instead of dropping the task.
fn parse_wire_priority(raw: &str) -> Priority {
    raw.parse().unwrap_or_else(|e| {
        tracing::warn!("Unknown priority {:?}, using {}: {}", raw, Priority::default(), e);
        Priority::default()
    })
}

fn format_wire_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

impl From<TaskDto> for Task {
    fn from(dto: TaskDto) -> Self {
        Self {
            id: TaskId(dto.id),
            title: dto.title,
            description: dto.description,
            status: dto.status,
            priority: dto
                .priority
                .as_deref()
                .map(parse_wire_priority)
                .unwrap_or_default(),
            due_date: dto.due_date.as_deref().and_then(parse_wire_date),
        }
    }
}

impl From<&Task> for TaskDto {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.0,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: Some(task.priority.as_str().to_string()),
            due_date: task.due_date.map(format_wire_date),
        }
    }
}

impl From<&NewTask> for TaskCreateDto {
    fn from(task: &NewTask) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date.map(format_wire_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_task() {
        let json = r#"{"id":3,"title":"Call bank","description":"re: card","status":"in_progress","priority":"high","due_date":"2024-02-29"}"#;
        let task: Task = serde_json::from_str::<TaskDto>(json).unwrap().into();

        assert_eq!(task.id, TaskId(3));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_decode_defaults_and_datetime_due_date() {
        let json = r#"{"id":1,"title":"t","description":null,"priority":null,"due_date":"2024-05-06T00:00:00"}"#;
        let task: Task = serde_json::from_str::<TaskDto>(json).unwrap().into();

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.description, None);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 5, 6));
    }

    #[test]
    fn test_decode_garbage_due_date_as_none() {
        let json = r#"{"id":1,"title":"t","status":"done","due_date":"soon"}"#;
        let task: Task = serde_json::from_str::<TaskDto>(json).unwrap().into();
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_decode_space_separated_datetime_due_date() {
        let json = r#"{"id":1,"title":"t","due_date":"2024-05-06 00:00:00"}"#;
        let task: Task = serde_json::from_str::<TaskDto>(json).unwrap().into();
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 5, 6));
    }

    #[test]
    fn test_unknown_priority_falls_back_to_medium() {
        let json = r#"{"id":1,"title":"t","priority":"urgent"}"#;
        let task: Task = serde_json::from_str::<TaskDto>(json).unwrap().into();
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_task_list_skips_unmappable_rows() {
        let rows: Vec<serde_json::Value> = serde_json::from_str(
            r#"[
                {"id":1,"title":"keep","status":"pending","priority":"low"},
                {"id":2,"title":"bad status","status":"archived"},
                {"id":"three","title":"bad id"},
                {"id":4,"title":"odd priority","priority":"urgent"}
            ]"#,
        )
        .unwrap();

        let tasks = decode_task_list(rows);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "keep");
        assert_eq!(tasks[0].priority, Priority::Low);
        assert_eq!(tasks[1].id, TaskId(4));
        assert_eq!(tasks[1].priority, Priority::Medium);
    }

    #[test]
    fn test_create_body_sends_null_due_date() {
        let new_task = NewTask::new("Plan trip").unwrap();
        let value = serde_json::to_value(TaskCreateDto::from(&new_task)).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "title": "Plan trip",
                "description": null,
                "status": "pending",
                "priority": "medium",
                "due_date": null
            })
        );
    }

    #[test]
    fn test_update_body_is_full_task() {
        let task = Task {
            id: TaskId(12),
            title: "Review PR".to_string(),
            description: None,
            status: TaskStatus::Done,
            priority: Priority::Low,
            due_date: NaiveDate::from_ymd_opt(2025, 1, 9),
        };
        let value = serde_json::to_value(TaskDto::from(&task)).unwrap();

        assert_eq!(value["id"], 12);
        assert_eq!(value["status"], "done");
        assert_eq!(value["priority"], "low");
        assert_eq!(value["due_date"], "2025-01-09");
    }
}
