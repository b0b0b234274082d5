//! Submission rules shared by the HTTP handlers and the edit-form client
//!
//! Both sides call the same functions so the interactive pre-check and the
//! authoritative server check can never drift apart.

use std::fmt;

use super::isbn::is_valid_isbn;

pub const TITLE_MAX_CHARS: usize = 100;
pub const AUTHOR_MAX_CHARS: usize = 150;
/// Largest accepted cover image, measured before base64 encoding.
pub const MAX_IMAGE_BYTES: usize = 16 * 1024 * 1024;

/// Book fields exactly as submitted (form values are always text).
#[derive(Debug, Clone, Default)]
pub struct RawBookFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub available_copies: Option<String>,
}

/// Book fields that passed [`validate_submission`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: String,
    pub available_copies: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField(&'static str),
    TitleTooLong,
    AuthorTooLong,
    MalformedCopies,
    NegativeCopies,
    InvalidIsbn,
    ImageTooLarge,
}

impl ValidationError {
    /// User-facing message, also used verbatim as the HTTP error body.
    pub fn message(&self) -> String {
        match self {
            ValidationError::MissingField(name) => format!("Missing required field: {}.", name),
            ValidationError::TitleTooLong => "Title must be 100 characters or fewer.".to_string(),
            ValidationError::AuthorTooLong => {
                "Author name must be 150 characters or fewer.".to_string()
            }
            ValidationError::MalformedCopies => {
                "Available copies must be a whole number.".to_string()
            }
            // Wording kept as clients already match on it; zero is accepted.
            ValidationError::NegativeCopies => "Available copies should be more that 0".to_string(),
            ValidationError::InvalidIsbn => {
                "Invalid ISBN. Please enter a valid ISBN-10 or ISBN-13.".to_string()
            }
            ValidationError::ImageTooLarge => "Image size should not exceed 16MB.".to_string(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ValidationError {}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ValidationError> {
    value.as_deref().ok_or(ValidationError::MissingField(name))
}

/// Validate a full-field submission, stopping at the first failing rule.
///
/// Order: title, author, available copies, ISBN, genre.
pub fn validate_submission(raw: &RawBookFields) -> Result<BookFields, ValidationError> {
    let title = required(&raw.title, "title")?;
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong);
    }

    let author = required(&raw.author, "author")?;
    if author.chars().count() > AUTHOR_MAX_CHARS {
        return Err(ValidationError::AuthorTooLong);
    }

    let available_copies = parse_available_copies(required(&raw.available_copies, "availableCopies")?)?;

    let isbn = required(&raw.isbn, "isbn")?;
    if !is_valid_isbn(isbn) {
        return Err(ValidationError::InvalidIsbn);
    }

    let genre = required(&raw.genre, "genre")?;

    Ok(BookFields {
        title: title.to_string(),
        author: author.to_string(),
        isbn: isbn.to_string(),
        genre: genre.to_string(),
        available_copies,
    })
}

/// Parse the copies counter; negative values are rejected, zero is fine.
pub fn parse_available_copies(value: &str) -> Result<i32, ValidationError> {
    let copies: i32 = value
        .trim()
        .parse()
        .map_err(|_| ValidationError::MalformedCopies)?;
    if copies < 0 {
        return Err(ValidationError::NegativeCopies);
    }
    Ok(copies)
}

pub fn check_image_size(len: usize) -> Result<(), ValidationError> {
    if len > MAX_IMAGE_BYTES {
        return Err(ValidationError::ImageTooLarge);
    }
    Ok(())
}
