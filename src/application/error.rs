use crate::domain::TaskId;
use crate::ports::TransportError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Repository error: {0}")]
    Repository(#[from] TransportError),

    #[error("Task {0} is not in the current task list")]
    TaskNotFound(TaskId),

    #[error("Another change is still in progress")]
    Busy,
}

pub type AppResult<T> = Result<T, AppError>;
