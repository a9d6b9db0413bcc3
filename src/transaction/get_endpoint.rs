use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{TransactionResponse, state::TransactionState},
};

/// A route handler for getting a transaction by its database ID.
///
/// The ID is parsed here rather than by the `Path` extractor so that a
/// malformed ID gets the same error body as any other invalid input.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    WithRejection(Path(transaction_id), _): WithRejection<Path<String>, Error>,
) -> Result<Json<TransactionResponse>, Error> {
    tracing::info!("Received request to get transaction with ID: {transaction_id}");

    let transaction_id = transaction_id
        .trim()
        .parse::<TransactionId>()
        .map_err(|_| Error::InvalidTransactionId)?;

    let session = state.database.session()?;
    let transaction = state
        .service
        .get_transaction_by_id(&session, transaction_id)?;

    Ok(Json(transaction))
}

/// A route handler for getting a transaction by its reference number.
pub async fn get_transaction_by_reference_endpoint(
    State(state): State<TransactionState>,
    WithRejection(Path(reference_number), _): WithRejection<Path<String>, Error>,
) -> Result<Json<TransactionResponse>, Error> {
    tracing::info!(
        "Received request to get transaction with reference number: {reference_number}"
    );

    let session = state.database.session()?;
    let transaction = state
        .service
        .get_transaction_by_reference_number(&session, &reference_number)?;

    Ok(Json(transaction))
}
