use axum::extract::FromRef;

use crate::{AppState, db::Database, transaction::TransactionService};

/// The state needed by the transaction route handlers.
#[derive(Clone)]
pub struct TransactionState {
    /// The database to open a session on for each request.
    pub database: Database,
    /// The business logic for transactions.
    pub service: TransactionService,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            database: state.database.clone(),
            service: state.transaction_service.clone(),
        }
    }
}
