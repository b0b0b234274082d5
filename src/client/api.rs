//! HTTP client for the BookTrack REST API

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::fmt;

use crate::domain::BookFields;
use crate::models::Book;

use super::edit_form::SelectedImage;

/// Error type for client calls
#[derive(Debug)]
pub enum ClientError {
    /// Connection, timeout or body decoding failure
    Transport(reqwest::Error),
    /// Server answered with a non-success status
    Status { status: u16, body: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "Request failed: {}", e),
            ClientError::Status { status, body } => write!(f, "HTTP {}: {}", status, body),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e)
    }
}

/// Body of a successful `PUT /updateBook/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateResponse {
    pub message: String,
    pub book: Book,
}

#[derive(Clone, Debug)]
pub struct BookTrackClient {
    http: reqwest::Client,
    base_url: String,
}

impl BookTrackClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// `GET /books/{id}`
    pub async fn fetch_book(&self, id: &str) -> Result<Book, ClientError> {
        let response = self.http.get(self.url(&format!("/books/{}", id))).send().await?;
        Ok(Self::check(response).await?.json::<Book>().await?)
    }

    /// `GET /books`
    pub async fn list_books(&self) -> Result<Vec<Book>, ClientError> {
        let response = self.http.get(self.url("/books")).send().await?;
        Ok(Self::check(response).await?.json::<Vec<Book>>().await?)
    }

    /// `PUT /updateBook/{id}` as multipart, attaching the image when one was selected
    pub async fn update_book(
        &self,
        id: &str,
        fields: &BookFields,
        image: Option<&SelectedImage>,
    ) -> Result<UpdateResponse, ClientError> {
        let mut form = Form::new()
            .text("title", fields.title.clone())
            .text("author", fields.author.clone())
            .text("isbn", fields.isbn.clone())
            .text("genre", fields.genre.clone())
            .text("availableCopies", fields.available_copies.to_string());

        if let Some(image) = image {
            form = form.part(
                "image",
                Part::bytes(image.bytes.clone()).file_name(image.file_name.clone()),
            );
        }

        let response = self
            .http
            .put(self.url(&format!("/updateBook/{}", id)))
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(response).await?.json::<UpdateResponse>().await?)
    }
}
