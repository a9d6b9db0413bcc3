//! Validates requests and turns repository results into API responses.

use std::sync::Arc;

use rusqlite::Connection;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{
        core::{DeleteResponse, TransactionInput, TransactionResponse},
        repository::TransactionRepository,
    },
};

/// The business logic for transactions.
///
/// Inputs are validated before the repository is called, so invalid requests
/// never touch the database.
#[derive(Clone)]
pub struct TransactionService {
    repository: Arc<dyn TransactionRepository>,
}

impl TransactionService {
    /// Create a service that stores transactions in `repository`.
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        Self { repository }
    }

    /// Validate and store a new transaction.
    ///
    /// # Errors
    /// Returns a validation error if `input` is invalid, otherwise any error
    /// from [TransactionRepository::create].
    pub fn create_transaction(
        &self,
        connection: &Connection,
        input: &TransactionInput,
    ) -> Result<TransactionResponse, Error> {
        validate_transaction_input(input)?;

        tracing::info!("Creating transaction with reference: {}", input.reference_number);

        let transaction = self.repository.create(connection, input)?;

        Ok(transaction.into())
    }

    /// Get the transaction with the database ID `transaction_id`.
    ///
    /// # Errors
    /// Returns an [Error::InvalidTransactionId] if `transaction_id` is not
    /// positive, or an [Error::NotFound] if there is no such transaction.
    pub fn get_transaction_by_id(
        &self,
        connection: &Connection,
        transaction_id: TransactionId,
    ) -> Result<TransactionResponse, Error> {
        validate_transaction_id(transaction_id)?;

        tracing::info!("Retrieving transaction with ID: {transaction_id}");

        match self.repository.get_by_id(connection, transaction_id)? {
            Some(transaction) => Ok(transaction.into()),
            None => {
                tracing::warn!("Transaction not found with ID: {transaction_id}");
                Err(Error::NotFound)
            }
        }
    }

    /// Get the transaction with `reference_number`.
    ///
    /// # Errors
    /// Returns an [Error::MissingReferenceNumber] if `reference_number` is
    /// blank, or an [Error::NotFound] if there is no such transaction.
    pub fn get_transaction_by_reference_number(
        &self,
        connection: &Connection,
        reference_number: &str,
    ) -> Result<TransactionResponse, Error> {
        validate_reference_number(reference_number)?;

        tracing::info!("Retrieving transaction with reference number: {reference_number}");

        match self
            .repository
            .get_by_reference_number(connection, reference_number)?
        {
            Some(transaction) => Ok(transaction.into()),
            None => {
                tracing::warn!("Transaction not found with reference number: {reference_number}");
                Err(Error::NotFound)
            }
        }
    }

    /// Validate `input` and use it to overwrite the transaction with `reference_number`.
    ///
    /// # Errors
    /// Returns a validation error if `reference_number` or `input` are
    /// invalid, otherwise any error from
    /// [TransactionRepository::update_by_reference_number].
    pub fn update_transaction_by_reference_number(
        &self,
        connection: &Connection,
        reference_number: &str,
        input: &TransactionInput,
    ) -> Result<TransactionResponse, Error> {
        validate_reference_number(reference_number)?;
        validate_transaction_input(input)?;

        tracing::info!("Updating transaction with reference number: {reference_number}");

        let transaction =
            self.repository
                .update_by_reference_number(connection, reference_number, input)?;

        Ok(transaction.into())
    }

    /// Delete the transaction with `reference_number`.
    ///
    /// # Errors
    /// Returns an [Error::MissingReferenceNumber] if `reference_number` is
    /// blank, an [Error::NotFound] if there is no such transaction, or an
    /// [Error::DeleteFailed] if the repository did not remove the transaction.
    pub fn delete_transaction_by_reference_number(
        &self,
        connection: &Connection,
        reference_number: &str,
    ) -> Result<DeleteResponse, Error> {
        validate_reference_number(reference_number)?;

        tracing::info!("Deleting transaction with reference number: {reference_number}");

        if !self
            .repository
            .delete_by_reference_number(connection, reference_number)?
        {
            tracing::error!("Failed to delete transaction with reference number: {reference_number}");
            return Err(Error::DeleteFailed(reference_number.to_owned()));
        }

        Ok(DeleteResponse {
            message: format!(
                "Transaction with reference number {reference_number} deleted successfully"
            ),
        })
    }
}

fn validate_transaction_input(input: &TransactionInput) -> Result<(), Error> {
    validate_reference_number(&input.reference_number)?;

    if input.payment_method.trim().is_empty() {
        return Err(Error::MissingPaymentMethod);
    }

    if input.amount.is_nan() || input.amount <= 0.0 {
        return Err(Error::NonPositiveAmount);
    }

    tracing::debug!("Transaction validation passed");

    Ok(())
}

fn validate_transaction_id(transaction_id: TransactionId) -> Result<(), Error> {
    if transaction_id <= 0 {
        return Err(Error::InvalidTransactionId);
    }

    Ok(())
}

fn validate_reference_number(reference_number: &str) -> Result<(), Error> {
    if reference_number.trim().is_empty() {
        return Err(Error::MissingReferenceNumber);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rusqlite::Connection;
    use time::macros::{date, datetime, time};

    use crate::{
        Error,
        database_id::TransactionId,
        db::initialize,
        timezone::FrozenClock,
        transaction::{
            SQLiteTransactionRepository, Transaction, TransactionInput, TransactionRepository,
            TransactionResponse,
        },
    };

    use super::TransactionService;

    /// Fails the test if the service reaches the database.
    struct UnreachableRepository;

    impl TransactionRepository for UnreachableRepository {
        fn create(&self, _: &Connection, _: &TransactionInput) -> Result<Transaction, Error> {
            panic!("create should not be called")
        }

        fn get_by_id(&self, _: &Connection, _: TransactionId) -> Result<Option<Transaction>, Error> {
            panic!("get_by_id should not be called")
        }

        fn get_by_reference_number(
            &self,
            _: &Connection,
            _: &str,
        ) -> Result<Option<Transaction>, Error> {
            panic!("get_by_reference_number should not be called")
        }

        fn update_by_reference_number(
            &self,
            _: &Connection,
            _: &str,
            _: &TransactionInput,
        ) -> Result<Transaction, Error> {
            panic!("update_by_reference_number should not be called")
        }

        fn delete_by_reference_number(&self, _: &Connection, _: &str) -> Result<bool, Error> {
            panic!("delete_by_reference_number should not be called")
        }
    }

    /// Claims every delete succeeded without removing anything.
    struct NoOpDeleteRepository;

    impl TransactionRepository for NoOpDeleteRepository {
        fn create(&self, _: &Connection, _: &TransactionInput) -> Result<Transaction, Error> {
            unimplemented!()
        }

        fn get_by_id(&self, _: &Connection, _: TransactionId) -> Result<Option<Transaction>, Error> {
            unimplemented!()
        }

        fn get_by_reference_number(
            &self,
            _: &Connection,
            _: &str,
        ) -> Result<Option<Transaction>, Error> {
            unimplemented!()
        }

        fn update_by_reference_number(
            &self,
            _: &Connection,
            _: &str,
            _: &TransactionInput,
        ) -> Result<Transaction, Error> {
            unimplemented!()
        }

        fn delete_by_reference_number(&self, _: &Connection, _: &str) -> Result<bool, Error> {
            Ok(false)
        }
    }

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn get_test_service() -> TransactionService {
        TransactionService::new(Arc::new(SQLiteTransactionRepository::new(Arc::new(
            FrozenClock(datetime!(2025-06-01 14:30:15.25 +5:30)),
        ))))
    }

    fn get_validating_service() -> TransactionService {
        TransactionService::new(Arc::new(UnreachableRepository))
    }

    #[test]
    fn create_returns_response_shape() {
        let conn = get_test_connection();
        let service = get_test_service();

        let response = service
            .create_transaction(&conn, &TransactionInput::new("TX-1", "card", 10.5))
            .expect("could not create transaction");

        assert_eq!(
            response,
            TransactionResponse {
                id: 1,
                reference_number: "TX-1".to_owned(),
                date: date!(2025 - 06 - 01),
                time: time!(14:30:15.25),
                payment_method: "card".to_owned(),
                amount: 10.5,
            }
        );
    }

    #[test]
    fn create_rejects_blank_fields_before_storage() {
        let conn = get_test_connection();
        let service = get_validating_service();

        for reference_number in ["", "   ", "\t\n"] {
            assert_eq!(
                service.create_transaction(&conn, &TransactionInput::new(reference_number, "card", 1.0)),
                Err(Error::MissingReferenceNumber)
            );
        }

        for payment_method in ["", "   "] {
            assert_eq!(
                service.create_transaction(&conn, &TransactionInput::new("TX-1", payment_method, 1.0)),
                Err(Error::MissingPaymentMethod)
            );
        }
    }

    #[test]
    fn create_and_update_reject_non_positive_amounts() {
        let conn = get_test_connection();
        let service = get_validating_service();

        for amount in [0.0, -1.0, -0.01, f64::NAN] {
            let input = TransactionInput::new("TX-1", "card", amount);

            assert_eq!(
                service.create_transaction(&conn, &input),
                Err(Error::NonPositiveAmount),
                "create accepted amount {amount}"
            );
            assert_eq!(
                service.update_transaction_by_reference_number(&conn, "TX-1", &input),
                Err(Error::NonPositiveAmount),
                "update accepted amount {amount}"
            );
        }
    }

    #[test]
    fn get_by_id_rejects_non_positive_ids() {
        let conn = get_test_connection();
        let service = get_validating_service();

        assert_eq!(
            service.get_transaction_by_id(&conn, 0),
            Err(Error::InvalidTransactionId)
        );
        assert_eq!(
            service.get_transaction_by_id(&conn, -3),
            Err(Error::InvalidTransactionId)
        );
    }

    #[test]
    fn reference_number_operations_reject_blank_reference_number() {
        let conn = get_test_connection();
        let service = get_validating_service();

        assert_eq!(
            service.get_transaction_by_reference_number(&conn, " "),
            Err(Error::MissingReferenceNumber)
        );
        assert_eq!(
            service.update_transaction_by_reference_number(
                &conn,
                " ",
                &TransactionInput::new("TX-1", "card", 1.0)
            ),
            Err(Error::MissingReferenceNumber)
        );
        assert_eq!(
            service.delete_transaction_by_reference_number(&conn, ""),
            Err(Error::MissingReferenceNumber)
        );
    }

    #[test]
    fn missing_transactions_are_not_found() {
        let conn = get_test_connection();
        let service = get_test_service();

        assert_eq!(
            service.get_transaction_by_id(&conn, 1),
            Err(Error::NotFound)
        );
        assert_eq!(
            service.get_transaction_by_reference_number(&conn, "TX-404"),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_returns_message() {
        let conn = get_test_connection();
        let service = get_test_service();
        service
            .create_transaction(&conn, &TransactionInput::new("TX-1", "card", 10.5))
            .unwrap();

        let response = service
            .delete_transaction_by_reference_number(&conn, "TX-1")
            .expect("could not delete transaction");

        assert_eq!(
            response.message,
            "Transaction with reference number TX-1 deleted successfully"
        );
        assert_eq!(
            service.get_transaction_by_reference_number(&conn, "TX-1"),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_that_removes_nothing_is_an_internal_error() {
        let conn = get_test_connection();
        let service = TransactionService::new(Arc::new(NoOpDeleteRepository));

        assert_eq!(
            service.delete_transaction_by_reference_number(&conn, "TX-1"),
            Err(Error::DeleteFailed("TX-1".to_owned()))
        );
    }
}
