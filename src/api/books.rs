//! Book API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::api::submission::BookSubmission;
use crate::infrastructure::AppState;
use crate::services::{self, BookServiceError};

/// Map a failed add/update to its JSON error response.
/// Storage failures hide their detail behind `internal_message`.
fn submission_error(e: BookServiceError, internal_message: &str) -> Response {
    let status = match &e {
        BookServiceError::InvalidId
        | BookServiceError::Invalid(_)
        | BookServiceError::DuplicateTitle => StatusCode::BAD_REQUEST,
        BookServiceError::NotFound => StatusCode::NOT_FOUND,
        BookServiceError::UpdateFailed | BookServiceError::Storage(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let message = match e {
        BookServiceError::Storage(_) => internal_message.to_string(),
        other => other.to_string(),
    };
    (status, Json(json!({ "error": message }))).into_response()
}

#[utoipa::path(
    get,
    path = "/books",
    responses(
        (status = 200, description = "All books ordered by title", body = [Book]),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_books(State(state): State<AppState>) -> Response {
    match services::list_books(state.book_repo.as_ref()).await {
        Ok(books) => (StatusCode::OK, Json(books)).into_response(),
        Err(e) => {
            tracing::error!("Error fetching books: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch books." })),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/search",
    params(
        ("query" = Option<String>, Query, description = "Matched against title, author, ISBN and genre")
    ),
    responses(
        (status = 200, description = "Matching books", body = [Book]),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let query = params.query.or(params.q);
    match services::search_books(state.book_repo.as_ref(), query).await {
        Ok(books) => (StatusCode::OK, Json(books)).into_response(),
        Err(e) => {
            tracing::error!("Error searching books: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to search books." })),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/books/{id}",
    params(("id" = String, Path, description = "Book identifier (UUID)")),
    responses(
        (status = 200, description = "The book", body = Book),
        (status = 400, description = "Invalid book ID format"),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Server error")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match services::fetch_book(state.book_repo.as_ref(), state.audit.as_ref(), &id).await {
        Ok(book) => (StatusCode::OK, Json(book)).into_response(),
        Err(BookServiceError::InvalidId) => {
            (StatusCode::BAD_REQUEST, "Invalid book ID format").into_response()
        }
        Err(BookServiceError::NotFound) => (StatusCode::NOT_FOUND, "Book not found").into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/addBook",
    responses(
        (status = 201, description = "Book added"),
        (status = 400, description = "Validation failure or duplicate title"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn add_book(State(state): State<AppState>, submission: BookSubmission) -> Response {
    match services::add_book(
        state.book_repo.as_ref(),
        state.audit.as_ref(),
        submission.fields,
        submission.image,
    )
    .await
    {
        Ok(book) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Book added successfully!",
                "book": book
            })),
        )
            .into_response(),
        Err(e) => submission_error(e, "An error occurred while adding the book."),
    }
}

#[utoipa::path(
    put,
    path = "/updateBook/{id}",
    params(("id" = String, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Book updated"),
        (status = 400, description = "Validation failure, duplicate title or oversized image"),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Update failed")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    submission: BookSubmission,
) -> Response {
    match services::update_book(
        state.book_repo.as_ref(),
        state.audit.as_ref(),
        &id,
        submission.fields,
        submission.image,
    )
    .await
    {
        Ok(book) => (
            StatusCode::OK,
            Json(json!({
                "message": "Book updated successfully!",
                "book": book
            })),
        )
            .into_response(),
        Err(e) => submission_error(e, "An error occurred while updating the book."),
    }
}
