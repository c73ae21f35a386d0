use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid date format (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Required field missing: {0}")]
    MissingField(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

pub type DomainResult<T> = Result<T, DomainError>;
