pub mod task_repository;
pub mod config_store;

pub use task_repository::*;
pub use config_store::*;
