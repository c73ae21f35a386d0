use async_trait::async_trait;
use crate::domain::{NewTask, Task, TaskId};
use thiserror::Error;

/// The only failure the task store reports: the request did not succeed.
/// Network errors, non-2xx statuses and undecodable bodies all end up here.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Transport error: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError(message.into())
    }
}

pub type RepositoryResult<T> = Result<T, TransportError>;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn list_tasks(&self) -> RepositoryResult<Vec<Task>>;
    async fn create_task(&self, task: &NewTask) -> RepositoryResult<()>;
    /// Replaces the whole record stored at `id`.
    async fn update_task(&self, id: &TaskId, task: &Task) -> RepositoryResult<()>;
    async fn delete_task(&self, id: &TaskId) -> RepositoryResult<()>;
}
