//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use super::validation::BookFields;
use crate::models::book::Book;
use crate::models::transaction::{Transaction, TransactionType};

/// Filter criteria for book queries
#[derive(Debug, Default, Clone)]
pub struct BookFilter {
    /// Case-insensitive substring matched against title, author, ISBN and genre
    pub query: Option<String>,
}

/// A book about to be inserted
#[derive(Debug, Clone)]
pub struct NewBook {
    pub fields: BookFields,
    /// Base64-encoded cover image
    pub image: Option<String>,
}

/// Full-field replacement applied by an update.
#[derive(Debug, Clone)]
pub struct BookChanges {
    pub fields: BookFields,
    /// `None` keeps the stored image untouched.
    pub image: Option<String>,
}

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find all books matching the filter, ordered by title
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError>;

    /// Find a single book by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Book>, DomainError>;

    /// Find the book carrying exactly this title
    async fn find_by_title(&self, title: &str) -> Result<Option<Book>, DomainError>;

    /// Create a new book. Fails with `Conflict` when the title is taken.
    async fn create(&self, book: NewBook) -> Result<Book, DomainError>;

    /// Apply changes and return the updated book, or `None` if it no longer exists.
    /// Fails with `Conflict` when the new title is taken.
    async fn update(&self, id: &str, changes: BookChanges) -> Result<Option<Book>, DomainError>;
}

/// Input for recording a transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub book_id: String,
    pub borrower_name: String,
    pub transaction_type: TransactionType,
}

/// Repository trait for Transaction entity
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Store the transaction and adjust the book's available copies in one step.
    ///
    /// Fails with `NotFound` for an unknown book and `Rejected` when a borrow
    /// would drive the copies below zero.
    async fn record(&self, input: NewTransaction) -> Result<Transaction, DomainError>;

    /// List transactions, newest first, optionally for a single book
    async fn find_all(&self, book_id: Option<String>) -> Result<Vec<Transaction>, DomainError>;
}
