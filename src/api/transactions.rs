//! Transaction API handlers

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::infrastructure::AppState;
use crate::services::{self, AddTransactionRequest, TransactionServiceError};

#[utoipa::path(
    post,
    path = "/addTransaction",
    request_body = AddTransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded"),
        (status = 400, description = "Invalid request or no copies left"),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn add_transaction(
    State(state): State<AppState>,
    Json(payload): Json<AddTransactionRequest>,
) -> Response {
    match services::add_transaction(
        state.transaction_repo.as_ref(),
        state.audit.as_ref(),
        payload,
    )
    .await
    {
        Ok(transaction) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Transaction recorded successfully!",
                "transaction": transaction
            })),
        )
            .into_response(),
        Err(e) => {
            let (status, message) = match &e {
                TransactionServiceError::Invalid(_) | TransactionServiceError::NoCopiesAvailable => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                TransactionServiceError::BookNotFound => (StatusCode::NOT_FOUND, e.to_string()),
                TransactionServiceError::Storage(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while recording the transaction.".to_string(),
                ),
            };
            (status, Json(json!({ "error": message }))).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub book_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/transactions",
    params(("bookId" = Option<String>, Query, description = "Only transactions for this book")),
    responses(
        (status = 200, description = "Transactions, newest first", body = [Transaction]),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<TransactionQuery>,
) -> Response {
    match services::list_transactions(state.transaction_repo.as_ref(), params.book_id).await {
        Ok(transactions) => (StatusCode::OK, Json(transactions)).into_response(),
        Err(e) => {
            tracing::error!("Error fetching transactions: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch transactions." })),
            )
                .into_response()
        }
    }
}
