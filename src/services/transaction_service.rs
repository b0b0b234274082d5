//! Transaction Service - borrow/return bookkeeping

use serde::Deserialize;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::validation::AUTHOR_MAX_CHARS;
use crate::domain::{AuditLog, DomainError, NewTransaction, TransactionRepository};
use crate::models::{Transaction, TransactionType};

/// Request DTO for recording a transaction
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTransactionRequest {
    pub book_id: Option<String>,
    pub borrower_name: Option<String>,
    pub transaction_type: Option<String>,
}

/// Error type for transaction operations
#[derive(Debug)]
pub enum TransactionServiceError {
    Invalid(String),
    BookNotFound,
    NoCopiesAvailable,
    Storage(DomainError),
}

impl fmt::Display for TransactionServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionServiceError::Invalid(msg) => write!(f, "{}", msg),
            TransactionServiceError::BookNotFound => write!(f, "Book not found"),
            TransactionServiceError::NoCopiesAvailable => {
                write!(f, "No copies available to borrow.")
            }
            TransactionServiceError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TransactionServiceError {}

fn parse_request(request: AddTransactionRequest) -> Result<NewTransaction, TransactionServiceError> {
    let book_id = request
        .book_id
        .as_deref()
        .map(str::trim)
        .and_then(|id| Uuid::parse_str(id).ok())
        .ok_or_else(|| TransactionServiceError::Invalid("Invalid book ID format".to_string()))?;

    let borrower_name = request
        .borrower_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| TransactionServiceError::Invalid("Borrower name is required.".to_string()))?;
    // Same limit as author names
    if borrower_name.chars().count() > AUTHOR_MAX_CHARS {
        return Err(TransactionServiceError::Invalid(
            "Borrower name must be 150 characters or fewer.".to_string(),
        ));
    }

    let transaction_type: TransactionType = request
        .transaction_type
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| {
            TransactionServiceError::Invalid(
                "Transaction type must be 'borrow' or 'return'.".to_string(),
            )
        })?;

    Ok(NewTransaction {
        book_id: book_id.to_string(),
        borrower_name: borrower_name.to_string(),
        transaction_type,
    })
}

/// Record a borrow or return and adjust the book's available copies.
pub async fn add_transaction(
    repo: &dyn TransactionRepository,
    audit: &dyn AuditLog,
    request: AddTransactionRequest,
) -> Result<Transaction, TransactionServiceError> {
    let input = match parse_request(request) {
        Ok(input) => input,
        Err(e) => {
            audit.error(&format!("Validation failed for transaction: {}", e));
            return Err(e);
        }
    };
    let book_id = input.book_id.clone();
    let kind = input.transaction_type;

    match repo.record(input).await {
        Ok(transaction) => {
            audit.info(&format!(
                "Recorded {} transaction {} for book with ID: {}",
                kind, transaction.id, book_id
            ));
            Ok(transaction)
        }
        Err(DomainError::NotFound) => {
            audit.error(&format!("Book with ID: {} not found", book_id));
            Err(TransactionServiceError::BookNotFound)
        }
        Err(DomainError::Rejected(_)) => {
            audit.error(&format!("No copies left to borrow for book with ID: {}", book_id));
            Err(TransactionServiceError::NoCopiesAvailable)
        }
        Err(e) => {
            audit.error(&format!(
                "Error recording transaction for book with ID: {}: {}",
                book_id, e
            ));
            Err(TransactionServiceError::Storage(e))
        }
    }
}

/// List transactions, newest first
pub async fn list_transactions(
    repo: &dyn TransactionRepository,
    book_id: Option<String>,
) -> Result<Vec<Transaction>, TransactionServiceError> {
    let book_id = book_id.filter(|id| !id.trim().is_empty());
    repo.find_all(book_id)
        .await
        .map_err(TransactionServiceError::Storage)
}
