use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;

use crate::{
    Error,
    transaction::{TransactionInput, TransactionResponse, state::TransactionState},
};

/// A route handler for overwriting the transaction with the reference number in the path.
///
/// The body may change the reference number. The date and time are restamped
/// by the server.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    WithRejection(Path(reference_number), _): WithRejection<Path<String>, Error>,
    WithRejection(Json(input), _): WithRejection<Json<TransactionInput>, Error>,
) -> Result<Json<TransactionResponse>, Error> {
    tracing::info!(
        "Received request to update transaction with reference number: {reference_number}"
    );

    let session = state.database.session()?;
    let transaction =
        state
            .service
            .update_transaction_by_reference_number(&session, &reference_number, &input)?;

    tracing::info!(
        "Transaction updated successfully with reference number: {reference_number}"
    );

    Ok(Json(transaction))
}
