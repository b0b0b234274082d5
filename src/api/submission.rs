//! Extractor for book form submissions
//!
//! The edit and add forms post `multipart/form-data` (with an optional
//! `image` file part), but plain urlencoded forms and JSON bodies carrying
//! the same field names are accepted too.
//!
//! Image parts are buffered only up to one byte past the size cap, so an
//! oversized upload is reported as such even when the body exceeds the
//! request limit.

use axum::{
    Form, Json, async_trait,
    extract::{FromRequest, Multipart, Request, multipart::{Field, MultipartError}},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::collections::HashMap;

use crate::domain::validation::MAX_IMAGE_BYTES;
use crate::domain::{RawBookFields, ValidationError};
use crate::services::ImageUpload;

const IMAGE_FIELD: &str = "image";

/// Book fields plus the optional uploaded image
#[derive(Debug)]
pub struct BookSubmission {
    pub fields: RawBookFields,
    pub image: Option<ImageUpload>,
}

#[async_trait]
impl<S> FromRequest<S> for BookSubmission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            read_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let Json(values) = Json::<HashMap<String, Value>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            let values = values
                .into_iter()
                .filter_map(|(k, v)| json_to_text(v).map(|v| (k, v)))
                .collect();
            Ok(Self {
                fields: raw_fields(values),
                image: None,
            })
        } else {
            let Form(values) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self {
                fields: raw_fields(values),
                image: None,
            })
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<BookSubmission, Response> {
    let mut values = HashMap::new();
    let mut image: Option<ImageUpload> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(stream_error(e, image.as_ref())),
        };
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let bytes = read_capped(field).await?;
            // Browsers send an empty, unnamed part when no file was picked
            if bytes.is_empty() && file_name.as_deref().is_none_or(str::is_empty) {
                continue;
            }
            image = Some(ImageUpload { file_name, bytes });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| stream_error(e, image.as_ref()))?;
            values.insert(name, text);
        }
    }

    Ok(BookSubmission {
        fields: raw_fields(values),
        image,
    })
}

/// Read a file part, keeping at most `MAX_IMAGE_BYTES + 1` bytes.
async fn read_capped(mut field: Field<'_>) -> Result<Vec<u8>, Response> {
    let mut bytes = Vec::new();
    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                let room = MAX_IMAGE_BYTES + 1 - bytes.len();
                bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
                if bytes.len() > MAX_IMAGE_BYTES {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => return Err(e.into_response()),
        }
    }
    Ok(bytes)
}

/// Once an oversized image has been seen, a broken stream (usually the body
/// limit cutting off its remainder) is reported as the image being too large.
fn stream_error(e: MultipartError, image: Option<&ImageUpload>) -> Response {
    if image.is_some_and(|upload| upload.bytes.len() > MAX_IMAGE_BYTES) {
        tracing::warn!("Stopped reading oversized image upload: {}", e);
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": ValidationError::ImageTooLarge.message() })),
        )
            .into_response();
    }
    e.into_response()
}

fn json_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn raw_fields(mut values: HashMap<String, String>) -> RawBookFields {
    RawBookFields {
        title: values.remove("title"),
        author: values.remove("author"),
        isbn: values.remove("isbn"),
        genre: values.remove("genre"),
        available_copies: values.remove("availableCopies"),
    }
}
