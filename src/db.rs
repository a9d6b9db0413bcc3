//! The storage handle: owns the SQLite connection, creates the schema and
//! hands out scoped sessions.

use std::{
    fs,
    ops::Deref,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, transaction::create_transaction_table};

/// Create the application tables in the database.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if the tables cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()
}

/// A handle to the application's SQLite database.
///
/// Cloning the handle is cheap and every clone shares the same connection.
#[derive(Debug, Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the database file at `path` and initialize its tables.
    ///
    /// The parent directory of `path` is created if it does not exist.
    ///
    /// # Errors
    /// Returns an [Error::Io] if the directory cannot be created, or an
    /// [Error::SqlError] if the database cannot be opened or initialized.
    pub fn open(path: &Path) -> Result<Self, Error> {
        if let Some(directory) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            if directory.is_dir() {
                tracing::info!("Database directory already exists at: {}", directory.display());
            } else {
                fs::create_dir_all(directory)?;
                tracing::info!("Created database directory at: {}", directory.display());
            }
        }

        let connection = Connection::open(path)?;

        Self::from_connection(connection)
    }

    /// Create a new, initialized database that only lives in memory.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the database cannot be created.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap an open `connection`, initializing its tables.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the tables cannot be created.
    pub fn from_connection(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;
        tracing::info!("Created database tables (if they did not exist).");

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Start a unit of work against the database.
    ///
    /// The connection is held until the returned [Session] is dropped.
    ///
    /// # Errors
    /// Returns an [Error::DatabaseLockError] if the connection lock is poisoned.
    pub fn session(&self) -> Result<Session<'_>, Error> {
        let guard = self.connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        Ok(Session { guard })
    }
}

/// Exclusive access to the database connection for a single unit of work.
///
/// The connection is released when the session goes out of scope, including
/// on early returns and panics.
pub struct Session<'a> {
    guard: MutexGuard<'a, Connection>,
}

impl Deref for Session<'_> {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        tracing::debug!("Database session closed.");
    }
}
