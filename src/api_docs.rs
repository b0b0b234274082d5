use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::list_books,
        api::books::search_books,
        api::books::get_book,
        api::books::add_book,
        api::books::update_book,
        api::transactions::add_transaction,
        api::transactions::list_transactions,
    ),
    components(
        schemas(
            crate::models::Book,
            crate::models::Transaction,
            crate::models::TransactionType,
            crate::services::AddTransactionRequest,
        )
    ),
    tags(
        (name = "booktrack", description = "BookTrack inventory API")
    )
)]
pub struct ApiDoc;
