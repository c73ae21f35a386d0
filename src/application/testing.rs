use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{Mutex, Notify};

use crate::domain::{NewTask, Task, TaskId};
use crate::ports::{RepositoryResult, TaskRepository, TransportError};

/// In-memory stand-in for the remote task API.
#[derive(Default)]
pub struct FakeTaskRepository {
    pub tasks: Mutex<Vec<Task>>,
    next_id: AtomicU64,
    pub fail_list: AtomicBool,
    pub fail_writes: AtomicBool,
    /// When set, writes park until `release` is called.
    pub hold_writes: AtomicBool,
    gate: Notify,
    pub list_calls: AtomicU64,
    pub write_calls: AtomicU64,
}

impl FakeTaskRepository {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id.0).max().unwrap_or(0) as u64;
        Self {
            tasks: Mutex::new(tasks),
            next_id: AtomicU64::new(next_id),
            ..Default::default()
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> u64 {
        self.write_calls.load(Ordering::SeqCst)
    }

    async fn begin_write(&self) -> RepositoryResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.hold_writes.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TransportError::new("HTTP 500 Internal Server Error"));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for FakeTaskRepository {
    async fn list_tasks(&self) -> RepositoryResult<Vec<Task>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(TransportError::new("connection refused"));
        }
        Ok(self.tasks.lock().await.clone())
    }

    async fn create_task(&self, task: &NewTask) -> RepositoryResult<()> {
        self.begin_write().await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        self.tasks.lock().await.push(Task {
            id: TaskId(id),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
        });
        Ok(())
    }

    async fn update_task(&self, id: &TaskId, task: &Task) -> RepositoryResult<()> {
        self.begin_write().await?;
        let mut tasks = self.tasks.lock().await;
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or_else(|| TransportError::new("HTTP 404 Not Found"))?;
        *slot = task.clone();
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> RepositoryResult<()> {
        self.begin_write().await?;
        let mut tasks = self.tasks.lock().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != *id);
        if tasks.len() == before {
            return Err(TransportError::new("HTTP 404 Not Found"));
        }
        Ok(())
    }
}
