use super::AppResult;
use crate::domain::*;
use crate::ports::TaskRepository;
use std::sync::Arc;

/// Thin layer over the repository: one call per store operation, logged.
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        let tasks = self.repository.list_tasks().await?;
        tracing::debug!("Fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    pub async fn create_task(&self, task: &NewTask) -> AppResult<()> {
        tracing::info!("Creating task {:?}", task.title);
        self.repository.create_task(task).await?;
        Ok(())
    }

    /// Sends the full record back with only the status advanced.
    pub async fn cycle_status(&self, task: &Task) -> AppResult<TaskStatus> {
        let updated = task.with_next_status();
        tracing::info!(
            "Moving task {} from {} to {}",
            task.id,
            task.status,
            updated.status
        );
        self.repository.update_task(&task.id, &updated).await?;
        Ok(updated.status)
    }

    pub async fn delete_task(&self, id: &TaskId) -> AppResult<()> {
        tracing::info!("Deleting task {}", id);
        self.repository.delete_task(id).await?;
        Ok(())
    }
}
