use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;

use crate::{
    Error,
    transaction::{TransactionInput, TransactionResponse, state::TransactionState},
};

/// A route handler for creating a transaction.
///
/// Responds with `201 Created` and the new transaction. The date and time are
/// set by the server.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    WithRejection(Json(input), _): WithRejection<Json<TransactionInput>, Error>,
) -> Result<(StatusCode, Json<TransactionResponse>), Error> {
    tracing::info!(
        "Received request to create transaction: {}",
        input.reference_number
    );

    let session = state.database.session()?;
    let transaction = state.service.create_transaction(&session, &input)?;

    tracing::info!(
        "Transaction created successfully with ID: {}",
        transaction.id
    );

    Ok((StatusCode::CREATED, Json(transaction)))
}
