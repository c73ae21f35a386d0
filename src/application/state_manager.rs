use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{Mutex, RwLock};

use super::{AppError, AppResult, TaskService};
use crate::domain::*;

pub const CREATE_FAILED: &str = "Failed to create task";
pub const UPDATE_FAILED: &str = "Failed to update task";
pub const DELETE_FAILED: &str = "Failed to delete task";

#[derive(Debug, Default)]
struct BoardState {
    // Last successful fetch. Replaced wholesale, never patched.
    tasks: Vec<Task>,
    filter: TaskFilter,
    error: Option<String>,
}

/// Owns the task snapshot and keeps it in step with the remote store.
///
/// Every successful mutation is followed by a full reload. A failed reload
/// keeps the previous snapshot on screen and records an error message.
/// Mutations are serialized: while one is in flight, others get
/// [`AppError::Busy`] without touching the store.
pub struct StateManager {
    task_service: Arc<TaskService>,
    api_base: String,
    state: RwLock<BoardState>,
    mutation_guard: Mutex<()>,
}

impl StateManager {
    pub fn new(task_service: Arc<TaskService>, api_base: impl Into<String>) -> Self {
        Self {
            task_service,
            api_base: api_base.into(),
            state: RwLock::new(BoardState::default()),
            mutation_guard: Mutex::new(()),
        }
    }

    pub fn with_filter(self, filter: TaskFilter) -> Self {
        if let Ok(mut state) = self.state.try_write() {
            state.filter = filter;
        }
        self
    }

    pub fn load_failed_message(&self) -> String {
        format!("Could not connect to the task API at {}", self.api_base)
    }

    pub async fn load_tasks(&self) -> AppResult<()> {
        match self.task_service.list_tasks().await {
            Ok(tasks) => {
                let mut state = self.state.write().await;
                state.tasks = tasks;
                state.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load tasks: {}", e);
                self.state.write().await.error = Some(self.load_failed_message());
                Err(e)
            }
        }
    }

    pub async fn add_task(&self, task: NewTask) -> AppResult<()> {
        let service = self.task_service.clone();
        self.run_mutation(CREATE_FAILED, async move { service.create_task(&task).await })
            .await
    }

    pub async fn cycle_status(&self, id: &TaskId) -> AppResult<()> {
        let task = self
            .state
            .read()
            .await
            .tasks
            .iter()
            .find(|t| t.id == *id)
            .cloned()
            .ok_or(AppError::TaskNotFound(*id))?;

        let service = self.task_service.clone();
        self.run_mutation(UPDATE_FAILED, async move {
            service.cycle_status(&task).await.map(|_| ())
        })
        .await
    }

    pub async fn delete_task(&self, id: &TaskId) -> AppResult<()> {
        let service = self.task_service.clone();
        let id = *id;
        self.run_mutation(DELETE_FAILED, async move { service.delete_task(&id).await })
            .await
    }

    async fn run_mutation(
        &self,
        failure_message: &str,
        operation: impl Future<Output = AppResult<()>>,
    ) -> AppResult<()> {
        let _guard = self.mutation_guard.try_lock().map_err(|_| {
            tracing::warn!("Rejected change while another one is in flight");
            AppError::Busy
        })?;

        if let Err(e) = operation.await {
            tracing::error!("{}: {}", failure_message, e);
            self.state.write().await.error = Some(failure_message.to_string());
            return Err(e);
        }

        // The mutation stands even if this reload fails; load_tasks records that.
        let _ = self.load_tasks().await;
        Ok(())
    }

    pub async fn snapshot(&self) -> Vec<Task> {
        self.state.read().await.tasks.clone()
    }

    pub async fn filter(&self) -> TaskFilter {
        self.state.read().await.filter
    }

    pub async fn set_filter(&self, filter: TaskFilter) {
        self.state.write().await.filter = filter;
    }

    pub async fn visible_tasks(&self, today: NaiveDate) -> Vec<Task> {
        let state = self.state.read().await;
        filter_tasks(&state.tasks, state.filter, today)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.state.read().await.tasks)
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }
}
