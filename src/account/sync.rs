//! The account sync operation.
//!
//! A much simpler sibling of transaction sync: fetch the full account list
//! for the linked bank and upsert it wholesale. There is no incremental
//! diffing, and accounts the remote stops returning are never deleted.

use std::sync::Mutex;

use rusqlite::Connection;

use crate::{Error, bank::get_bank_for_user, teller::BankingClient};

use super::core::{Account, upsert_accounts};

/// Fetch all remote accounts for `user_id`'s linked bank and upsert them.
///
/// Returns the number of accounts written.
///
/// # Errors
/// Returns a:
/// - [Error::BankNotLinked] if the user has no linked bank,
/// - [Error::RemoteTransport] or [Error::RemoteValidation] if the remote
///   call fails,
/// - or [Error::SqlError] if the store rejects the batch.
pub async fn sync_accounts(
    user_id: &str,
    client: &dyn BankingClient,
    db_connection: &Mutex<Connection>,
) -> Result<usize, Error> {
    let bank = {
        let connection = db_connection.lock().map_err(|_| Error::DatabaseLock)?;
        get_bank_for_user(user_id, &connection)?
    };

    let remote_accounts = client.list_accounts(&bank.access_token).await?;

    let accounts: Vec<Account> = remote_accounts
        .into_iter()
        .map(|remote| Account::from_remote(remote, &bank.id))
        .collect();

    let mut connection = db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let count = upsert_accounts(&accounts, &mut connection)?;

    tracing::info!("Upserted {count} accounts for bank {}", bank.id);

    Ok(count)
}
