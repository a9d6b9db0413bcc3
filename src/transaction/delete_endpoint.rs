use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;

use crate::{
    Error,
    transaction::{DeleteResponse, state::TransactionState},
};

/// A route handler for deleting a transaction, responds with a confirmation message.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    WithRejection(Path(reference_number), _): WithRejection<Path<String>, Error>,
) -> Result<Json<DeleteResponse>, Error> {
    tracing::info!(
        "Received request to delete transaction with reference number: {reference_number}"
    );

    let session = state.database.session()?;
    let response = state
        .service
        .delete_transaction_by_reference_number(&session, &reference_number)?;

    Ok(Json(response))
}
