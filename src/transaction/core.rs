//! Defines the core data models and table schema for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, Time};

use crate::database_id::TransactionId;

// ============================================================================
// MODELS
// ============================================================================

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");
time::serde::format_description!(
    iso_time,
    Time,
    "[hour]:[minute]:[second].[subsecond digits:6]"
);

/// A payment that has been recorded in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction, if known.
    pub user_id: Option<String>,
    /// The client supplied reference number, unique across all transactions.
    pub reference_number: String,
    /// How the payment was made, e.g. "card" or "cash".
    pub payment_method: String,
    /// The amount of money paid. Always greater than zero.
    pub amount: f64,
    /// The date the transaction was created or last updated.
    pub date: Date,
    /// The time the transaction was created or last updated.
    pub time: Time,
}

/// The fields a client supplies to create or update a transaction.
///
/// The date and time are always set by the server, so any client supplied
/// values for them are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// The unique reference number for the transaction.
    pub reference_number: String,
    /// How the payment was made.
    pub payment_method: String,
    /// The amount of money paid.
    pub amount: f64,
    /// The user that owns the transaction. Only used when creating a transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl TransactionInput {
    /// Create an input without an owning user.
    pub fn new(reference_number: &str, payment_method: &str, amount: f64) -> Self {
        Self {
            reference_number: reference_number.to_owned(),
            payment_method: payment_method.to_owned(),
            amount,
            user_id: None,
        }
    }
}

/// The transaction as it is shown to API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The unique reference number for the transaction.
    pub reference_number: String,
    /// The date the transaction was created or last updated.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// The time the transaction was created or last updated.
    #[serde(with = "iso_time")]
    pub time: Time,
    /// How the payment was made.
    pub payment_method: String,
    /// The amount of money paid.
    pub amount: f64,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            reference_number: transaction.reference_number,
            date: transaction.date,
            time: transaction.time,
            payment_method: transaction.payment_method,
            amount: transaction.amount,
        }
    }
}

/// The response body for a successful delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// A message confirming which transaction was deleted.
    pub message: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns of the transaction table in the order [map_transaction_row] expects.
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, user_id, reference_number, payment_method, amount, date, time";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT,
                reference_number TEXT NOT NULL UNIQUE,
                payment_method TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                time TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = row.get(1)?;
    let reference_number = row.get(2)?;
    let payment_method = row.get(3)?;
    let amount = row.get(4)?;
    let date = row.get(5)?;
    let time = row.get(6)?;

    Ok(Transaction {
        id,
        user_id,
        reference_number,
        payment_method,
        amount,
        date,
        time,
    })
}

// ============================================================================
// TESTS
// ============================================================================
