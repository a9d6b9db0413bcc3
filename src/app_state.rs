//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use crate::{
    db::Database,
    timezone::Clock,
    transaction::{SQLiteTransactionRepository, TransactionService},
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The handle to the application database.
    pub database: Database,

    /// The business logic for transactions.
    pub transaction_service: TransactionService,
}

impl AppState {
    /// Create a new [AppState] backed by the SQLite `database`.
    ///
    /// Transactions are stamped with the date and time reported by `clock`.
    pub fn new(database: Database, clock: Arc<dyn Clock>) -> Self {
        let repository = SQLiteTransactionRepository::new(clock);

        Self {
            database,
            transaction_service: TransactionService::new(Arc::new(repository)),
        }
    }
}
