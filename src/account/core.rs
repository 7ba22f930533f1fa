//! Defines the core data model and database queries for accounts.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{Error, bank::BankId, teller::TellerAccount};

/// Alias for the remote account identifier used as the account's key.
pub type AccountId = String;

/// A bank account mirrored from the aggregator.
///
/// The remote system's identifier is reused as the local primary key; the
/// remote is the source of truth for every field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// The remote id for the account.
    pub id: AccountId,
    /// The bank link this account belongs to.
    pub bank_id: BankId,
    /// The account type, e.g. "depository" or "credit".
    #[serde(rename = "type")]
    pub account_type: String,
    /// The account's display name.
    pub name: String,
    /// The account subtype, e.g. "checking".
    pub subtype: String,
    /// ISO 4217 currency code.
    pub currency: String,
    /// The last four digits of the account number.
    pub last_four: String,
    /// Whether the account is open or closed.
    pub status: String,
}

impl Account {
    /// Map a remote account onto the local shape for `bank_id`.
    pub fn from_remote(remote: TellerAccount, bank_id: &str) -> Self {
        Self {
            id: remote.id,
            bank_id: bank_id.to_owned(),
            account_type: remote.account_type,
            name: remote.name,
            subtype: remote.subtype,
            currency: remote.currency,
            last_four: remote.last_four,
            status: remote.status,
        }
    }
}

/// Create the account table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
                id TEXT PRIMARY KEY,
                bank_id TEXT NOT NULL,
                type TEXT NOT NULL,
                name TEXT NOT NULL,
                subtype TEXT NOT NULL,
                currency TEXT NOT NULL,
                last_four TEXT NOT NULL,
                status TEXT NOT NULL,
                FOREIGN KEY(bank_id) REFERENCES bank(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Account].
pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        bank_id: row.get(1)?,
        account_type: row.get(2)?,
        name: row.get(3)?,
        subtype: row.get(4)?,
        currency: row.get(5)?,
        last_four: row.get(6)?,
        status: row.get(7)?,
    })
}

/// Upsert `accounts` wholesale inside one SQL transaction.
///
/// On conflict every column is overwritten with the freshly fetched value.
/// Rows absent from `accounts` are left untouched.
///
/// # Errors
/// Returns [Error::StoreConflict] if an account references a missing bank,
/// or [Error::SqlError] if there is some other SQL error.
pub fn upsert_accounts(accounts: &[Account], connection: &mut Connection) -> Result<usize, Error> {
    let transaction = connection.transaction()?;

    {
        let mut statement = transaction.prepare(
            "INSERT INTO account (id, bank_id, type, name, subtype, currency, last_four, status) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
            ON CONFLICT(id) DO UPDATE SET \
                bank_id = excluded.bank_id, \
                type = excluded.type, \
                name = excluded.name, \
                subtype = excluded.subtype, \
                currency = excluded.currency, \
                last_four = excluded.last_four, \
                status = excluded.status",
        )?;

        for account in accounts {
            statement.execute((
                &account.id,
                &account.bank_id,
                &account.account_type,
                &account.name,
                &account.subtype,
                &account.currency,
                &account.last_four,
                &account.status,
            ))?;
        }
    }

    transaction.commit()?;

    Ok(accounts.len())
}

/// Get all accounts belonging to `user_id`'s linked bank.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_accounts_for_user(
    user_id: &str,
    connection: &Connection,
) -> Result<Vec<Account>, Error> {
    connection
        .prepare(
            "SELECT account.id, account.bank_id, account.type, account.name, account.subtype, \
                account.currency, account.last_four, account.status \
            FROM account \
            INNER JOIN bank ON account.bank_id = bank.id \
            WHERE bank.user_id = :user_id \
            ORDER BY account.name ASC",
        )?
        .query_map(&[(":user_id", user_id)], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}
