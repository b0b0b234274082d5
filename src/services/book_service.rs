//! Book Service - Pure business logic without HTTP layer
//!
//! Fetch, update, add, list and search operations. Every outcome is reported
//! to the injected [`AuditLog`]; HTTP handlers only translate the result.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;
use uuid::Uuid;

use crate::domain::validation::{check_image_size, validate_submission};
use crate::domain::{
    AuditLog, BookChanges, BookFilter, BookRepository, DomainError, NewBook, RawBookFields,
    ValidationError,
};
use crate::models::Book;

/// Uploaded cover image, raw bytes as received
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Error type for book operations
#[derive(Debug)]
pub enum BookServiceError {
    /// Identifier is not a well-formed UUID
    InvalidId,
    Invalid(ValidationError),
    NotFound,
    DuplicateTitle,
    /// Storage accepted the write but returned no record
    UpdateFailed,
    Storage(DomainError),
}

impl fmt::Display for BookServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookServiceError::InvalidId => write!(f, "Invalid book ID format"),
            BookServiceError::Invalid(e) => write!(f, "{}", e),
            BookServiceError::NotFound => write!(f, "Book not found"),
            BookServiceError::DuplicateTitle => write!(f, "Title already exists."),
            BookServiceError::UpdateFailed => write!(f, "Failed to update the book."),
            BookServiceError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for BookServiceError {}

impl From<ValidationError> for BookServiceError {
    fn from(e: ValidationError) -> Self {
        BookServiceError::Invalid(e)
    }
}

/// Fetch a book by its raw (untrusted) identifier.
///
/// The identifier is checked for format before storage is touched.
pub async fn fetch_book(
    repo: &dyn BookRepository,
    audit: &dyn AuditLog,
    raw_id: &str,
) -> Result<Book, BookServiceError> {
    let raw_id = raw_id.trim();
    audit.info(&format!("Received request to fetch book with ID: {}", raw_id));

    let Ok(uuid) = Uuid::parse_str(raw_id) else {
        audit.error(&format!("Invalid book ID format: {}", raw_id));
        return Err(BookServiceError::InvalidId);
    };
    let id = uuid.to_string();

    match repo.find_by_id(&id).await {
        Ok(Some(book)) => {
            audit.info(&format!("Book with ID: {} fetched successfully", id));
            Ok(book)
        }
        Ok(None) => {
            audit.error(&format!("Book with ID: {} not found", id));
            Err(BookServiceError::NotFound)
        }
        Err(e) => {
            audit.error(&format!("Error fetching book with ID: {}: {}", id, e));
            Err(BookServiceError::Storage(e))
        }
    }
}

/// Replace every field of an existing book, and its image when a new one is supplied.
///
/// Checks run in order: field rules, existence, title uniqueness (only when
/// the title changes), image size. A missing image leaves the stored one alone.
pub async fn update_book(
    repo: &dyn BookRepository,
    audit: &dyn AuditLog,
    id: &str,
    raw: RawBookFields,
    image: Option<ImageUpload>,
) -> Result<Book, BookServiceError> {
    let id = canonical_id(id);
    let id = id.as_str();
    audit.info(&format!("Received request to update book with ID: {}", id));

    let fields = validate_submission(&raw).map_err(|e| rejected(audit, id, e))?;

    let existing = match repo.find_by_id(id).await {
        Ok(Some(book)) => book,
        Ok(None) => {
            audit.error(&format!("Book with ID: {} not found", id));
            return Err(BookServiceError::NotFound);
        }
        Err(e) => return Err(storage_failure(audit, id, e)),
    };

    if existing.title != fields.title {
        match repo.find_by_title(&fields.title).await {
            Ok(Some(_)) => {
                audit.error(&format!(
                    "Validation failed: Title \"{}\" already exists",
                    fields.title
                ));
                return Err(BookServiceError::DuplicateTitle);
            }
            Ok(None) => {}
            Err(e) => return Err(storage_failure(audit, id, e)),
        }
    }

    let image = encode_image(image).map_err(|e| rejected(audit, id, e))?;

    match repo.update(id, BookChanges { fields, image }).await {
        Ok(Some(book)) => {
            audit.info(&format!("Book with ID: {} updated successfully", id));
            Ok(book)
        }
        Ok(None) => {
            audit.error(&format!("Failed to update book with ID: {}", id));
            Err(BookServiceError::UpdateFailed)
        }
        // Lost a race against another writer claiming the same title
        Err(DomainError::Conflict(msg)) => {
            audit.error(&format!(
                "Title conflict while updating book with ID: {}: {}",
                id, msg
            ));
            Err(BookServiceError::DuplicateTitle)
        }
        Err(e) => Err(storage_failure(audit, id, e)),
    }
}

/// Create a book after applying the same rules as an update.
pub async fn add_book(
    repo: &dyn BookRepository,
    audit: &dyn AuditLog,
    raw: RawBookFields,
    image: Option<ImageUpload>,
) -> Result<Book, BookServiceError> {
    audit.info("Received request to add a book");

    let fields = validate_submission(&raw).map_err(|e| rejected(audit, "(new)", e))?;

    match repo.find_by_title(&fields.title).await {
        Ok(Some(_)) => {
            audit.error(&format!(
                "Validation failed: Title \"{}\" already exists",
                fields.title
            ));
            return Err(BookServiceError::DuplicateTitle);
        }
        Ok(None) => {}
        Err(e) => return Err(storage_failure(audit, "(new)", e)),
    }

    let image = encode_image(image).map_err(|e| rejected(audit, "(new)", e))?;

    match repo.create(NewBook { fields, image }).await {
        Ok(book) => {
            audit.info(&format!("Book with ID: {} added successfully", book.id));
            Ok(book)
        }
        Err(DomainError::Conflict(_)) => {
            audit.error("Title conflict while adding a book");
            Err(BookServiceError::DuplicateTitle)
        }
        Err(e) => Err(storage_failure(audit, "(new)", e)),
    }
}

/// List all books ordered by title
pub async fn list_books(repo: &dyn BookRepository) -> Result<Vec<Book>, BookServiceError> {
    let books = repo
        .find_all(BookFilter::default())
        .await
        .map_err(BookServiceError::Storage)?;
    tracing::debug!("Listing {} books", books.len());
    Ok(books)
}

/// Search books by title, author, ISBN or genre
pub async fn search_books(
    repo: &dyn BookRepository,
    query: Option<String>,
) -> Result<Vec<Book>, BookServiceError> {
    tracing::info!("Search books - query={:?}", query);
    repo.find_all(BookFilter { query })
        .await
        .map_err(BookServiceError::Storage)
}

/// Hyphenated lowercase form of a UUID; anything else is passed through trimmed
/// and will simply not be found.
fn canonical_id(raw_id: &str) -> String {
    let raw_id = raw_id.trim();
    Uuid::parse_str(raw_id)
        .map(|uuid| uuid.to_string())
        .unwrap_or_else(|_| raw_id.to_string())
}

fn encode_image(image: Option<ImageUpload>) -> Result<Option<String>, ValidationError> {
    match image {
        Some(upload) => {
            check_image_size(upload.bytes.len())?;
            tracing::debug!(
                "Encoding image {:?} ({} bytes)",
                upload.file_name,
                upload.bytes.len()
            );
            Ok(Some(STANDARD.encode(&upload.bytes)))
        }
        None => Ok(None),
    }
}

fn rejected(audit: &dyn AuditLog, id: &str, e: ValidationError) -> BookServiceError {
    audit.error(&format!("Validation failed for book {}: {}", id, e));
    BookServiceError::Invalid(e)
}

fn storage_failure(audit: &dyn AuditLog, id: &str, e: DomainError) -> BookServiceError {
    audit.error(&format!("Storage error for book with ID: {}: {}", id, e));
    BookServiceError::Storage(e)
}
