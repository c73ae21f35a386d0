pub mod task_service;
pub mod state_manager;
pub mod error;

#[cfg(test)]
pub mod testing;

pub use task_service::*;
pub use state_manager::*;
pub use error::*;
