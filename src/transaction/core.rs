//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row, params};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{Error, account::AccountId, counterparty::CounterpartyId};

/// Alias for the remote transaction identifier.
pub type TransactionId = String;

/// A transaction mirrored from the aggregator.
///
/// Rows are immutable once ingested: re-fetching an already-stored
/// transaction is a no-op. Transactions are keyed by `(account_id, id)`
/// because the remote identifier namespace is only known to be unique per
/// account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The remote id for the transaction.
    pub id: TransactionId,
    /// The account the transaction belongs to.
    pub account_id: AccountId,
    /// The counterparty on the other side of the transaction.
    pub counterparty_id: CounterpartyId,
    /// The amount of money spent or earned in this transaction.
    ///
    /// Positive values are income/credits, negative values are
    /// expenses/debits.
    pub amount: f64,
    /// When the transaction happened, pinned to UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// The bank's description of the transaction.
    pub description: String,
    /// Whether the transaction is pending or posted.
    pub status: String,
    /// The transaction type, e.g. "card_payment".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// The spending category, `"unknown"` when the aggregator had none.
    pub category: String,
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id TEXT NOT NULL,
                account_id TEXT NOT NULL,
                counterparty_id TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                status TEXT NOT NULL,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                PRIMARY KEY(account_id, id),
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(counterparty_id) REFERENCES counterparty(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Composite index used by the watermark query and the transactions listing.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account_date \
        ON \"transaction\"(account_id, date DESC);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_row_to_transaction(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        counterparty_id: row.get(2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
        description: row.get(5)?,
        status: row.get(6)?,
        transaction_type: row.get(7)?,
        category: row.get(8)?,
    })
}

/// The sync watermark: the most recent transaction date stored for
/// `account_id`, or `None` when the account has no transactions yet.
///
/// The watermark is always derived from the store rather than cached so it
/// cannot go stale.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn latest_transaction_date(
    account_id: &str,
    connection: &Connection,
) -> Result<Option<OffsetDateTime>, Error> {
    let result = connection
        .prepare(
            "SELECT date FROM \"transaction\" WHERE account_id = :account_id \
            ORDER BY date DESC LIMIT 1",
        )?
        .query_row(&[(":account_id", account_id)], |row| row.get(0));

    match result {
        Ok(date) => Ok(Some(date)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Insert `transactions`, leaving existing rows untouched on conflict.
///
/// Returns the number of rows actually inserted; re-submitted rows count
/// zero. This insert-if-absent primitive is what makes re-running a sync
/// after a partial failure safe.
///
/// # Errors
/// Returns a:
/// - [Error::StoreConflict] if a row references a missing account or
///   counterparty,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_or_ignore_transactions(
    transactions: &[Transaction],
    connection: &Connection,
) -> Result<usize, Error> {
    let mut statement = connection.prepare(
        "INSERT INTO \"transaction\" \
            (id, account_id, counterparty_id, amount, date, description, status, type, category) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
        ON CONFLICT(account_id, id) DO NOTHING",
    )?;

    let mut inserted = 0;
    for transaction in transactions {
        inserted += statement.execute(params![
            transaction.id,
            transaction.account_id,
            transaction.counterparty_id,
            transaction.amount,
            transaction.date,
            transaction.description,
            transaction.status,
            transaction.transaction_type,
            transaction.category,
        ])?;
    }

    Ok(inserted)
}

/// Get a page of transactions for `account_id`, newest first.
///
/// Sorts by date and then id to keep the order stable between requests.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_transactions_for_account(
    account_id: &str,
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, account_id, counterparty_id, amount, date, description, status, type, category \
            FROM \"transaction\" WHERE account_id = ?1 \
            ORDER BY date DESC, id ASC LIMIT ?2 OFFSET ?3",
        )?
        .query_map(
            params![account_id, limit as i64, offset as i64],
            map_row_to_transaction,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the total number of transactions stored for `account_id`.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn count_transactions_for_account(
    account_id: &str,
    connection: &Connection,
) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(*) FROM \"transaction\" WHERE account_id = :account_id",
            &[(":account_id", account_id)],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}
