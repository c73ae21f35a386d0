use async_trait::async_trait;

use super::{decode_task_list, TaskApiClient, TaskCreateDto, TaskDto};
use crate::{
    domain::{NewTask, Task, TaskId},
    ports::{RepositoryResult, TaskRepository},
};

#[derive(Clone)]
pub struct HttpTaskRepository {
    client: TaskApiClient,
}

impl HttpTaskRepository {
    pub fn new(client: TaskApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TaskRepository for HttpTaskRepository {
    async fn list_tasks(&self) -> RepositoryResult<Vec<Task>> {
        let rows: Vec<serde_json::Value> = self.client.get("/tasks").await?;
        Ok(decode_task_list(rows))
    }

    async fn create_task(&self, task: &NewTask) -> RepositoryResult<()> {
        let create_dto = TaskCreateDto::from(task);
        self.client.post("/tasks", &create_dto).await
    }

    async fn update_task(&self, id: &TaskId, task: &Task) -> RepositoryResult<()> {
        let path = format!("/tasks/{}", id.0);
        let update_dto = TaskDto::from(task);
        self.client.put(&path, &update_dto).await
    }

    async fn delete_task(&self, id: &TaskId) -> RepositoryResult<()> {
        let path = format!("/tasks/{}", id.0);
        self.client.delete(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, TaskStatus};
    use crate::adapters::api::test_support::mock_endpoint;
    use chrono::NaiveDate;
    use tokio::net::TcpListener;

    fn repo(base: &str) -> HttpTaskRepository {
        HttpTaskRepository::new(TaskApiClient::new(base, None).unwrap())
    }

    #[tokio::test]
    async fn test_list_tasks_uses_injected_base_url() {
        let (base, server) = mock_endpoint(vec![(
            200,
            r#"[{"id":1,"title":"a","description":null,"status":"done","priority":"low","due_date":"2024-01-01"},{"id":2,"title":"b","description":"x","status":"pending","priority":"medium","due_date":null}]"#,
        )])
        .await;

        let tasks = repo(&format!("{base}/")).list_tasks().await.unwrap();
        let requests = server.await.unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].status, TaskStatus::Done);
        assert_eq!(tasks[0].due_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(tasks[1].due_date, None);
        assert!(requests[0].starts_with("GET /tasks HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let (base, server) = mock_endpoint(vec![
            (500, r#"{"detail":"boom"}"#),
            (404, r#"{"detail":"Task not found"}"#),
            (404, r#"{"detail":"Task not found"}"#),
        ])
        .await;
        let repo = repo(&base);

        assert!(repo.list_tasks().await.is_err());
        let task = Task {
            id: TaskId(99),
            title: "gone".to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            due_date: None,
        };
        assert!(repo.update_task(&task.id, &task).await.is_err());
        assert!(repo.delete_task(&task.id).await.is_err());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = repo(&base).list_tasks().await.unwrap_err();
        assert!(err.to_string().starts_with("Transport error"));
    }

    #[tokio::test]
    async fn test_undecodable_list_is_transport_error() {
        let (base, server) = mock_endpoint(vec![(200, r#"{"message":"not a list"}"#)]).await;
        assert!(repo(&base).list_tasks().await.is_err());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_one_bad_row_keeps_the_rest() {
        let (base, server) = mock_endpoint(vec![(
            200,
            r#"[{"id":1,"title":"a","status":"pending","priority":"low"},{"id":2,"title":"b","status":"blocked"},{"id":3,"title":"c","status":"done","priority":"urgent"}]"#,
        )])
        .await;

        let tasks = repo(&base).list_tasks().await.unwrap();
        let ids: Vec<TaskId> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TaskId(1), TaskId(3)]);
        assert_eq!(tasks[1].priority, Priority::Medium);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_write_requests_shape() {
        let (base, server) = mock_endpoint(vec![
            (200, r#"{"id":5}"#),
            (200, "{}"),
            (200, r#"{"detail":"Task deleted"}"#),
        ])
        .await;
        let repo = repo(&base);

        let mut new_task = NewTask::new("Book flights").unwrap();
        new_task.due_date = NaiveDate::from_ymd_opt(2024, 8, 15);
        repo.create_task(&new_task).await.unwrap();

        let task = Task {
            id: TaskId(5),
            title: "Book flights".to_string(),
            description: None,
            status: TaskStatus::InProgress,
            priority: Priority::Medium,
            due_date: NaiveDate::from_ymd_opt(2024, 8, 15),
        };
        repo.update_task(&task.id, &task).await.unwrap();
        repo.delete_task(&task.id).await.unwrap();

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("POST /tasks HTTP/1.1"));
        assert!(requests[0].to_ascii_lowercase().contains("content-type: application/json"));
        assert!(requests[0].contains(r#""due_date":"2024-08-15""#));
        assert!(requests[1].starts_with("PUT /tasks/5 HTTP/1.1"));
        assert!(requests[1].contains(r#""status":"in_progress""#));
        assert!(requests[2].starts_with("DELETE /tasks/5 HTTP/1.1"));
    }
}
