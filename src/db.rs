//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    transaction::{create_transaction_table, register_search_functions},
};

/// Create all of the database tables for the application and register the
/// SQL functions that queries rely on.
///
/// Tables are only created if they do not already exist, so it is safe to
/// call this on an existing database. Functions only live as long as
/// `connection`, so call this on every new connection.
///
/// # Errors
/// Returns an error if a table cannot be created or there is some other SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    register_search_functions(connection)?;

    Ok(())
}
