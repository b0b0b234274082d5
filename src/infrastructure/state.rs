//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{AuditLog, BookRepository, TransactionRepository};
use crate::infrastructure::{SeaOrmBookRepository, SeaOrmTransactionRepository, TracingAuditLog};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Book repository
    pub book_repo: Arc<dyn BookRepository>,
    /// Transaction repository
    pub transaction_repo: Arc<dyn TransactionRepository>,
    /// Sink for request outcomes
    pub audit: Arc<dyn AuditLog>,
}

impl AppState {
    /// Create a new AppState backed by SeaORM repositories and tracing audit output
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            book_repo: Arc::new(SeaOrmBookRepository::new(db.clone())),
            transaction_repo: Arc::new(SeaOrmTransactionRepository::new(db)),
            audit: Arc::new(TracingAuditLog),
        }
    }

    /// Assemble state from explicit parts (stub repositories, recording audit sinks)
    pub fn from_parts(
        book_repo: Arc<dyn BookRepository>,
        transaction_repo: Arc<dyn TransactionRepository>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            book_repo,
            transaction_repo,
            audit,
        }
    }
}
