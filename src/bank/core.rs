//! Defines the core data model and database queries for banks.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{Error, user::UserId};

/// Alias for the remote enrollment identifier used as the bank's key.
pub type BankId = String;

/// A user's link to their bank via the aggregation API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bank {
    /// The id for the bank link (the remote enrollment id).
    pub id: BankId,
    /// The user the bank belongs to.
    pub user_id: UserId,
    /// The secret token authenticating all remote calls for this enrollment.
    ///
    /// Never serialized into API responses.
    #[serde(skip_serializing)]
    pub access_token: String,
    /// The user's identity within the remote system.
    pub bank_user_id: String,
    /// The remote enrollment id.
    pub enrollment_id: String,
    /// The institution's display name, e.g. "Chase".
    pub institution_name: String,
}

/// Create the bank table in the database.
///
/// `user_id` is UNIQUE: one bank per user.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_bank_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS bank (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL UNIQUE,
                access_token TEXT NOT NULL,
                bank_user_id TEXT NOT NULL,
                enrollment_id TEXT NOT NULL,
                institution_name TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Bank].
pub fn map_row_to_bank(row: &Row) -> Result<Bank, rusqlite::Error> {
    Ok(Bank {
        id: row.get(0)?,
        user_id: row.get(1)?,
        access_token: row.get(2)?,
        bank_user_id: row.get(3)?,
        enrollment_id: row.get(4)?,
        institution_name: row.get(5)?,
    })
}

/// Get the bank linked for `user_id`.
///
/// # Errors
/// Returns [Error::BankNotLinked] if the user has no bank record, or
/// [Error::SqlError] if there is some other SQL error.
pub fn get_bank_for_user(user_id: &str, connection: &Connection) -> Result<Bank, Error> {
    connection
        .prepare(
            "SELECT id, user_id, access_token, bank_user_id, enrollment_id, institution_name \
            FROM bank WHERE user_id = :user_id",
        )?
        .query_row(&[(":user_id", user_id)], map_row_to_bank)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::BankNotLinked,
            error => error.into(),
        })
}
