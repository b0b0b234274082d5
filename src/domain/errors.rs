//! Domain error types
//!
//! These errors are framework-agnostic and represent storage-level failures.

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// Resource not found
    NotFound,
    /// A uniqueness constraint was violated (e.g. duplicate book title)
    Conflict(String),
    /// Business rule refused the operation
    Rejected(String),
    /// Database/persistence error
    Database(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Rejected(msg) => write!(f, "Rejected: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Unique-index violations are reported as conflicts so callers can tell them
// apart from genuine storage failures.
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => DomainError::Conflict(msg),
            _ => DomainError::Database(e.to_string()),
        }
    }
}
