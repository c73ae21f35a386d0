pub mod error;
pub mod task;
pub mod view_model;

pub use error::*;
pub use task::*;
pub use view_model::*;
