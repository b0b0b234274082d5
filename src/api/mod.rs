pub mod books;
pub mod health;
pub mod submission;
pub mod transactions;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::infrastructure::AppState;

pub fn api_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::get_book))
        .route("/search", get(books::search_books))
        .route("/addBook", post(books::add_book))
        .route("/updateBook/:id", put(books::update_book))
        // Transactions
        .route("/addTransaction", post(transactions::add_transaction))
        .route("/transactions", get(transactions::list_transactions))
        .with_state(state)
}
