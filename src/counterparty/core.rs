//! Defines the core data model and database queries for counterparties.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{Error, user::UserId};

/// Alias for the generated counterparty identifier.
pub type CounterpartyId = String;

/// The other party in a transaction, deduplicated by name per user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Counterparty {
    /// The generated id for the counterparty.
    pub id: CounterpartyId,
    /// The user the counterparty belongs to.
    pub user_id: UserId,
    /// The counterparty's name as reported by the aggregator.
    pub name: String,
    /// The kind of counterparty, e.g. "organization" or "person".
    #[serde(rename = "type")]
    pub counterparty_type: String,
}

/// Create the counterparty table in the database.
///
/// The UNIQUE(user_id, name) constraint is what makes concurrent sync runs
/// safe: two runs that both decide a name is new race on the insert, and the
/// loser's insert-or-ignore is a no-op.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_counterparty_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS counterparty (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                type TEXT NOT NULL,
                UNIQUE(user_id, name)
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Counterparty].
pub fn map_row_to_counterparty(row: &Row) -> Result<Counterparty, rusqlite::Error> {
    Ok(Counterparty {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        counterparty_type: row.get(3)?,
    })
}

/// Get all counterparties for `user_id`.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_counterparties_for_user(
    user_id: &str,
    connection: &Connection,
) -> Result<Vec<Counterparty>, Error> {
    connection
        .prepare("SELECT id, user_id, name, type FROM counterparty WHERE user_id = :user_id")?
        .query_map(&[(":user_id", user_id)], map_row_to_counterparty)?
        .map(|maybe_counterparty| maybe_counterparty.map_err(Error::from))
        .collect()
}

/// Insert `counterparties`, leaving existing rows untouched on conflict.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn insert_or_ignore_counterparties(
    counterparties: &[Counterparty],
    connection: &Connection,
) -> Result<(), Error> {
    let mut statement = connection.prepare(
        "INSERT INTO counterparty (id, user_id, name, type) VALUES (?1, ?2, ?3, ?4) \
        ON CONFLICT DO NOTHING",
    )?;

    for counterparty in counterparties {
        statement.execute((
            &counterparty.id,
            &counterparty.user_id,
            &counterparty.name,
            &counterparty.counterparty_type,
        ))?;
    }

    Ok(())
}
