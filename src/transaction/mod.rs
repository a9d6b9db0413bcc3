//! Transaction records.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the request/response shapes
//! - The repository that stores transactions in SQLite
//! - The service that validates requests
//! - The route handlers for the REST API

mod core;
mod create_endpoint;
mod delete_endpoint;
mod get_endpoint;
mod repository;
mod service;
mod state;
#[cfg(test)]
mod test_utils;
mod update_endpoint;

pub use self::core::{
    DeleteResponse, Transaction, TransactionInput, TransactionResponse, create_transaction_table,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use get_endpoint::{get_transaction_by_reference_endpoint, get_transaction_endpoint};
pub use repository::{SQLiteTransactionRepository, TransactionRepository};
pub use service::TransactionService;
pub use update_endpoint::update_transaction_endpoint;
