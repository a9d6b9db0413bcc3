//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    AppState, ErrorResponse, endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint,
        get_transaction_by_reference_endpoint, get_transaction_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(
            endpoints::TRANSACTIONS_NO_SLASH,
            post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION, get(get_transaction_endpoint))
        .route(
            endpoints::TRANSACTION_BY_REFERENCE,
            get(get_transaction_by_reference_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .method_not_allowed_fallback(get_405_method_not_allowed)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            detail: "Not Found".to_owned(),
        }),
    )
        .into_response()
}

async fn get_405_method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            detail: "Method Not Allowed".to_owned(),
        }),
    )
        .into_response()
}
