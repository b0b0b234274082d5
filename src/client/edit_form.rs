//! Edit form controller
//!
//! Mirrors what a user sees when editing a book: the form is filled from the
//! stored record, a new cover can be previewed before upload, and a
//! submission is checked locally (field rules, title uniqueness, explicit
//! confirmation) before the update request is sent. Every rejection is shown
//! through the [`Prompter`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::domain::validation::{check_image_size, validate_submission};
use crate::domain::RawBookFields;
use crate::models::Book;

use super::api::{BookTrackClient, ClientError};

pub const FETCH_FAILED: &str = "Failed to fetch book details for editing.";
pub const FETCH_ERROR: &str = "An error occurred while fetching the book details.";
pub const IMAGE_TOO_LARGE: &str =
    "Image size should not exceed 16MB. Please select a smaller file.";
pub const DUPLICATE_TITLE: &str = "Title already exists. Please choose a different title.";
pub const CONFIRM_UPDATE: &str = "Are you sure you want to update the book details?";
pub const UPDATE_SUCCEEDED: &str = "Book updated successfully!";
pub const UPDATE_FAILED: &str = "Failed to update book. Please try again later.";
pub const UPDATE_ERROR: &str =
    "An error occurred while updating the book. Please check the console for details.";

/// The interactive surface: modal alerts, a yes/no confirmation and a console.
pub trait Prompter: Send + Sync {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
    fn log_error(&self, message: &str);
}

/// Cover image picked by the user, not yet uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Current state of the edit form inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: String,
    pub available_copies: String,
    pub image: Option<SelectedImage>,
    /// `data:` URL shown in the preview element
    pub preview: Option<String>,
}

impl From<Book> for EditForm {
    fn from(book: Book) -> Self {
        Self {
            book_id: book.id,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            genre: book.genre,
            available_copies: book.available_copies.to_string(),
            image: None,
            // Stored covers are JPEG
            preview: book
                .image
                .map(|encoded| format!("data:image/jpeg;base64,{}", encoded)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing to submit
    NoFormOpen,
    /// A local check failed; the form stays open
    Rejected,
    /// The user declined the confirmation
    Cancelled,
    /// The update request failed; the form stays open
    Failed,
    /// Saved; the form is closed. Carries the refreshed list when it could be loaded.
    Updated(Option<Vec<Book>>),
}

pub struct EditFormController<P: Prompter> {
    client: BookTrackClient,
    prompter: P,
    form: Option<EditForm>,
}

impl<P: Prompter> EditFormController<P> {
    pub fn new(client: BookTrackClient, prompter: P) -> Self {
        Self {
            client,
            prompter,
            form: None,
        }
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn form(&self) -> Option<&EditForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut EditForm> {
        self.form.as_mut()
    }

    pub fn is_open(&self) -> bool {
        self.form.is_some()
    }

    pub fn close(&mut self) {
        self.form = None;
    }

    /// Open the form populated from the stored record. Returns whether it opened.
    pub async fn edit_book(&mut self, book_id: &str) -> bool {
        match self.client.fetch_book(book_id).await {
            Ok(book) => {
                self.form = Some(EditForm::from(book));
                true
            }
            Err(ClientError::Status { status, .. }) => {
                tracing::debug!("Fetching book {} for editing returned {}", book_id, status);
                self.prompter.alert(FETCH_FAILED);
                false
            }
            Err(e) => {
                self.prompter
                    .log_error(&format!("Error fetching book for editing: {}", e));
                self.prompter.alert(FETCH_ERROR);
                false
            }
        }
    }

    /// Pick a new cover. Oversized files are refused and the selection cleared.
    pub fn select_image(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) -> bool {
        let Some(form) = self.form.as_mut() else {
            return false;
        };

        if check_image_size(bytes.len()).is_err() {
            self.prompter.alert(IMAGE_TOO_LARGE);
            form.image = None;
            return false;
        }

        form.preview = Some(data_url(&bytes));
        form.image = Some(SelectedImage {
            file_name: file_name.into(),
            bytes,
        });
        true
    }

    /// Check the form locally, confirm with the user, then send the update.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(form) = self.form.clone() else {
            return SubmitOutcome::NoFormOpen;
        };

        let raw = RawBookFields {
            title: Some(form.title.trim().to_string()),
            author: Some(form.author.trim().to_string()),
            isbn: Some(form.isbn.clone()),
            genre: Some(form.genre.clone()),
            available_copies: Some(form.available_copies.clone()),
        };
        let fields = match validate_submission(&raw) {
            Ok(fields) => fields,
            Err(e) => {
                self.prompter.alert(&e.message());
                return SubmitOutcome::Rejected;
            }
        };

        match self.is_title_unique(&fields.title, &form.book_id).await {
            Ok(true) => {}
            Ok(false) => {
                self.prompter.alert(DUPLICATE_TITLE);
                return SubmitOutcome::Rejected;
            }
            Err(e) => {
                self.prompter
                    .log_error(&format!("Error checking title uniqueness: {}", e));
                self.prompter.alert(UPDATE_ERROR);
                return SubmitOutcome::Failed;
            }
        }

        if !self.prompter.confirm(CONFIRM_UPDATE) {
            return SubmitOutcome::Cancelled;
        }

        match self
            .client
            .update_book(&form.book_id, &fields, form.image.as_ref())
            .await
        {
            Ok(_) => {
                self.prompter.alert(UPDATE_SUCCEEDED);
                self.close();
                SubmitOutcome::Updated(self.refresh().await)
            }
            Err(ClientError::Status { status, body }) => {
                tracing::debug!("Update of book {} rejected ({}): {}", form.book_id, status, body);
                self.prompter.alert(UPDATE_FAILED);
                SubmitOutcome::Failed
            }
            Err(e) => {
                self.prompter
                    .log_error(&format!("Error updating book: {}", e));
                self.prompter.alert(UPDATE_ERROR);
                SubmitOutcome::Failed
            }
        }
    }

    /// A title is free when no other book carries it; the book's own title always is.
    async fn is_title_unique(&self, title: &str, book_id: &str) -> Result<bool, ClientError> {
        let books = self.client.list_books().await?;
        Ok(books.iter().all(|b| b.title != title || b.id == book_id))
    }

    async fn refresh(&self) -> Option<Vec<Book>> {
        match self.client.list_books().await {
            Ok(books) => Some(books),
            Err(e) => {
                self.prompter
                    .log_error(&format!("Error refreshing book list: {}", e));
                None
            }
        }
    }
}

fn data_url(bytes: &[u8]) -> String {
    let mime = image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
