//! A small record-keeping service for financial transactions.
//!
//! This library provides a JSON REST API for creating, reading, updating and
//! deleting transactions stored in a single SQLite database file. Every
//! transaction is identified by a database ID and by a unique, client supplied
//! reference number, and is stamped with the server's date and time in a fixed
//! timezone.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod app_state;
mod database_id;
mod db;
pub mod endpoints;
mod logging;
mod routing;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use database_id::TransactionId;
pub use db::{Database, Session, initialize as initialize_db};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::{
    Clock, DEFAULT_TIMEZONE, FixedOffsetClock, FrozenClock, SRI_LANKA_OFFSET, get_local_offset,
};
pub use transaction::{
    DeleteResponse, SQLiteTransactionRepository, Transaction, TransactionInput,
    TransactionRepository, TransactionResponse, TransactionService,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// Each variant belongs to exactly one class of failure (invalid input,
/// conflict, not found or internal), which determines the HTTP status code in
/// [Error::status_code].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The reference number was missing or only contained whitespace.
    #[error("Reference number is required")]
    MissingReferenceNumber,

    /// The payment method was missing or only contained whitespace.
    #[error("Payment method is required")]
    MissingPaymentMethod,

    /// The amount was zero or negative.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// The transaction ID was not a positive integer.
    #[error("Invalid transaction ID")]
    InvalidTransactionId,

    /// The request body or a path parameter could not be parsed into the
    /// expected shape.
    #[error("{0}")]
    InvalidRequestBody(String),

    /// A transaction with the reference number already exists.
    #[error("Reference number already exists")]
    DuplicateReferenceNumber(String),

    /// An update tried to change a reference number to one that is held by
    /// another transaction.
    #[error("New reference number already exists")]
    DuplicateNewReferenceNumber(String),

    /// The requested transaction was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("Transaction not found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A delete found the transaction but did not remove any rows.
    #[error("failed to delete transaction with reference number {0}")]
    DeleteFailed(String),

    /// An error occurred while getting the offset from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An I/O error occurred while preparing the database location.
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// The HTTP status code that the error should be reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingReferenceNumber
            | Error::MissingPaymentMethod
            | Error::NonPositiveAmount
            | Error::InvalidTransactionId
            | Error::InvalidRequestBody(_)
            | Error::DuplicateReferenceNumber(_)
            | Error::DuplicateNewReferenceNumber(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::DeleteFailed(_)
            | Error::InvalidTimezoneError(_)
            | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {rejection}");
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        tracing::warn!("Rejected path parameter: {rejection}");
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value.to_string())
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A human readable description of what went wrong.
    pub detail: String,
}

/// The detail sent for any error that is not intended to be shown to the client.
pub const INTERNAL_SERVER_ERROR_DETAIL: &str = "Internal server error";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let detail = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            // The cause is only for the server logs.
            tracing::error!("An unexpected error occurred: {}", self);
            INTERNAL_SERVER_ERROR_DETAIL.to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(ErrorResponse { detail })).into_response()
    }
}
