/*! Database initialization for the application. */

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error, account::create_account_table, bank::create_bank_table,
    counterparty::create_counterparty_table, transaction::create_transaction_table,
};

/// Create the application's tables if they do not exist.
///
/// The tables are created inside a single exclusive transaction so that a
/// half-initialized schema is never observable.
///
/// # Errors
/// Returns an [Error::SqlError] if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_bank_table(&transaction)?;
    create_account_table(&transaction)?;
    create_counterparty_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
