//! The repository: the only place SQL is run against the transaction table.

use std::{fmt::Display, sync::Arc};

use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    Error,
    database_id::TransactionId,
    timezone::Clock,
    transaction::core::{
        TRANSACTION_COLUMNS, Transaction, TransactionInput, map_transaction_row,
    },
};

/// Handles the storage and retrieval of transactions.
///
/// Every operation runs against `connection`, the session for the current
/// unit of work.
pub trait TransactionRepository: Send + Sync {
    /// Store a new transaction stamped with the current date and time.
    ///
    /// # Errors
    /// Returns a [Error::DuplicateReferenceNumber] if the reference number is
    /// already used, or an [Error::SqlError] if the write failed.
    fn create(&self, connection: &Connection, input: &TransactionInput)
    -> Result<Transaction, Error>;

    /// Retrieve a transaction by its `id`, or `None` if there is no such transaction.
    fn get_by_id(
        &self,
        connection: &Connection,
        id: TransactionId,
    ) -> Result<Option<Transaction>, Error>;

    /// Retrieve a transaction by its reference number, or `None` if there is no such transaction.
    fn get_by_reference_number(
        &self,
        connection: &Connection,
        reference_number: &str,
    ) -> Result<Option<Transaction>, Error>;

    /// Overwrite the transaction with `reference_number` and restamp its date and time.
    ///
    /// # Errors
    /// Returns a [Error::NotFound] if there is no transaction with
    /// `reference_number`, a [Error::DuplicateNewReferenceNumber] if the new
    /// reference number belongs to another transaction, or an
    /// [Error::SqlError] if the write failed.
    fn update_by_reference_number(
        &self,
        connection: &Connection,
        reference_number: &str,
        input: &TransactionInput,
    ) -> Result<Transaction, Error>;

    /// Delete the transaction with `reference_number`.
    ///
    /// Returns whether a row was removed.
    ///
    /// # Errors
    /// Returns a [Error::NotFound] if there is no transaction with
    /// `reference_number`, or an [Error::SqlError] if the delete failed.
    fn delete_by_reference_number(
        &self,
        connection: &Connection,
        reference_number: &str,
    ) -> Result<bool, Error>;
}

/// Stores transactions in a SQLite database.
///
/// Writes run inside a SQL transaction that is rolled back if any step fails.
#[derive(Clone)]
pub struct SQLiteTransactionRepository {
    clock: Arc<dyn Clock>,
}

impl SQLiteTransactionRepository {
    /// Create a repository that stamps transactions using `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl TransactionRepository for SQLiteTransactionRepository {
    fn create(
        &self,
        connection: &Connection,
        input: &TransactionInput,
    ) -> Result<Transaction, Error> {
        let sql_transaction = connection.unchecked_transaction()?;

        if select_by_reference_number(&sql_transaction, &input.reference_number)?.is_some() {
            tracing::warn!("Duplicate reference number: {}", input.reference_number);
            return Err(Error::DuplicateReferenceNumber(
                input.reference_number.clone(),
            ));
        }

        let now = self.clock.now();
        tracing::debug!("Inserting transaction: {input:?}");

        let transaction = sql_transaction
            .prepare(&format!(
                "INSERT INTO \"transaction\" (user_id, reference_number, payment_method, amount, date, time)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                params![
                    input.user_id,
                    input.reference_number,
                    input.payment_method,
                    input.amount,
                    now.date(),
                    now.time(),
                ],
                map_transaction_row,
            )
            .map_err(|error| {
                map_unique_violation(error, || {
                    Error::DuplicateReferenceNumber(input.reference_number.clone())
                })
            })
            .inspect_err(|error| log_storage_fault("create", &input.reference_number, error))?;

        sql_transaction.commit()?;

        tracing::info!(
            "Transaction created successfully with ID {} at {now}",
            transaction.id
        );

        Ok(transaction)
    }

    fn get_by_id(
        &self,
        connection: &Connection,
        id: TransactionId,
    ) -> Result<Option<Transaction>, Error> {
        let transaction = connection
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
            ))?
            .query_row(&[(":id", &id)], map_transaction_row)
            .optional()
            .map_err(Error::from)
            .inspect_err(|error| log_storage_fault("get by ID", &id, error))?;

        match transaction {
            Some(_) => tracing::info!("Transaction retrieved with ID {id}"),
            None => tracing::info!("No transaction found with ID {id}"),
        }

        Ok(transaction)
    }

    fn get_by_reference_number(
        &self,
        connection: &Connection,
        reference_number: &str,
    ) -> Result<Option<Transaction>, Error> {
        let transaction = select_by_reference_number(connection, reference_number)
            .map_err(Error::from)
            .inspect_err(|error| {
                log_storage_fault("get by reference number", &reference_number, error)
            })?;

        match transaction {
            Some(_) => tracing::info!("Transaction retrieved with reference number {reference_number}"),
            None => tracing::info!("No transaction found with reference number {reference_number}"),
        }

        Ok(transaction)
    }

    fn update_by_reference_number(
        &self,
        connection: &Connection,
        reference_number: &str,
        input: &TransactionInput,
    ) -> Result<Transaction, Error> {
        let sql_transaction = connection.unchecked_transaction()?;

        let Some(existing) = select_by_reference_number(&sql_transaction, reference_number)? else {
            tracing::warn!("Transaction not found with reference number: {reference_number}");
            return Err(Error::NotFound);
        };

        if input.reference_number != reference_number
            && select_by_reference_number(&sql_transaction, &input.reference_number)?.is_some()
        {
            tracing::warn!("Duplicate reference number: {}", input.reference_number);
            return Err(Error::DuplicateNewReferenceNumber(
                input.reference_number.clone(),
            ));
        }

        let now = self.clock.now();
        tracing::debug!("Updating transaction {}: {input:?}", existing.id);

        let transaction = sql_transaction
            .prepare(&format!(
                "UPDATE \"transaction\"
                 SET reference_number = ?1, payment_method = ?2, amount = ?3, date = ?4, time = ?5
                 WHERE id = ?6
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                params![
                    input.reference_number,
                    input.payment_method,
                    input.amount,
                    now.date(),
                    now.time(),
                    existing.id,
                ],
                map_transaction_row,
            )
            .map_err(|error| {
                map_unique_violation(error, || {
                    Error::DuplicateNewReferenceNumber(input.reference_number.clone())
                })
            })
            .inspect_err(|error| log_storage_fault("update", &reference_number, error))?;

        sql_transaction.commit()?;

        tracing::info!(
            "Transaction {} updated successfully at {now}",
            transaction.id
        );

        Ok(transaction)
    }

    fn delete_by_reference_number(
        &self,
        connection: &Connection,
        reference_number: &str,
    ) -> Result<bool, Error> {
        let sql_transaction = connection.unchecked_transaction()?;

        let Some(existing) = select_by_reference_number(&sql_transaction, reference_number)? else {
            tracing::warn!("Transaction not found with reference number: {reference_number}");
            return Err(Error::NotFound);
        };

        tracing::debug!("Deleting transaction: {existing:?}");

        let rows_affected = sql_transaction
            .execute(
                "DELETE FROM \"transaction\" WHERE id = :id",
                &[(":id", &existing.id)],
            )
            .map_err(Error::from)
            .inspect_err(|error| log_storage_fault("delete", &reference_number, error))?;

        sql_transaction.commit()?;

        tracing::info!("Transaction deleted successfully with reference number {reference_number}");

        Ok(rows_affected > 0)
    }
}

fn select_by_reference_number(
    connection: &Connection,
    reference_number: &str,
) -> Result<Option<Transaction>, rusqlite::Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE reference_number = :reference_number"
        ))?
        .query_row(
            &[(":reference_number", &reference_number)],
            map_transaction_row,
        )
        .optional()
}

/// Treat a failed UNIQUE constraint as the conflict produced by `conflict`.
fn map_unique_violation(error: rusqlite::Error, conflict: impl FnOnce() -> Error) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => conflict(),
        error => error.into(),
    }
}

fn log_storage_fault(operation: &str, key: &dyn Display, error: &Error) {
    if let Error::SqlError(sql_error) = error {
        tracing::error!("Database error during transaction {operation} for {key}: {sql_error}");
    }
}
