//! The incremental transaction ingestion engine.
//!
//! Syncing an account's transactions reconciles the remote, newest-first,
//! cursor-paged feed against the local store. The engine runs as a small
//! state machine: determine-mode, then either a bounded first-time backfill
//! or an incremental catch-up that pages until it reaches a transaction
//! dated strictly before the stored watermark. Every page is committed with
//! insert-or-ignore semantics, so an interrupted run can simply be re-run.

use std::sync::Mutex;

use rusqlite::Connection;
use time::{Date, OffsetDateTime, macros::format_description};

use crate::{
    Error,
    bank::{Bank, get_bank_for_user},
    counterparty::CounterpartyResolver,
    teller::{BankingClient, ListTransactionsOptions, TellerTransaction},
};

use super::core::{Transaction, insert_or_ignore_transactions, latest_transaction_date};

/// Tuning knobs for the ingestion engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How many transactions to request per page during incremental
    /// catch-up.
    pub page_size: u32,
    /// How many transactions a first-time backfill ingests at most.
    pub backfill_limit: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            backfill_limit: 2000,
        }
    }
}

/// Sync the remote transaction feed for `account_id` into the local store.
///
/// Returns the number of transactions ingested. Running the sync twice over
/// stable remote data stores the same rows as running it once.
///
/// # Errors
/// Returns a:
/// - [Error::BankNotLinked] if the user has no linked bank,
/// - [Error::RemoteTransport] or [Error::RemoteValidation] if the first
///   remote call fails,
/// - [Error::SyncIncomplete] if a later remote call fails mid catch-up
///   (pages committed so far are kept),
/// - or [Error::StoreConflict]/[Error::SqlError] if the store rejects a
///   batch.
pub async fn sync_transactions(
    user_id: &str,
    account_id: &str,
    client: &dyn BankingClient,
    config: &SyncConfig,
    db_connection: &Mutex<Connection>,
) -> Result<usize, Error> {
    let (bank, watermark, mut resolver) = {
        let connection = db_connection.lock().map_err(|_| Error::DatabaseLock)?;
        let bank = get_bank_for_user(user_id, &connection)?;
        let watermark = latest_transaction_date(account_id, &connection)?;
        let resolver = CounterpartyResolver::load(user_id, &connection)?;
        (bank, watermark, resolver)
    };

    match watermark {
        Some(watermark) => {
            catch_up(
                &bank,
                account_id,
                watermark,
                client,
                config,
                &mut resolver,
                db_connection,
            )
            .await
        }
        None => backfill(&bank, account_id, client, config, &mut resolver, db_connection).await,
    }
}

/// First-time pull for an account with no local transactions: a single
/// bounded page of history, all treated as new.
async fn backfill(
    bank: &Bank,
    account_id: &str,
    client: &dyn BankingClient,
    config: &SyncConfig,
    resolver: &mut CounterpartyResolver,
    db_connection: &Mutex<Connection>,
) -> Result<usize, Error> {
    let options = ListTransactionsOptions {
        count: Some(config.backfill_limit),
        from_id: None,
    };
    let page = client
        .list_transactions(&bank.access_token, account_id, &options)
        .await?;

    let mut rows = Vec::with_capacity(page.len());
    for remote in page {
        let date = parse_remote_date(&remote.date)?;
        rows.push(map_remote_transaction(remote, date, resolver)?);
    }

    let mut connection = db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let ingested = flush_page(&rows, resolver, &mut connection)?;

    tracing::info!("Backfilled {ingested} transactions for account {account_id}");

    Ok(ingested)
}

/// Incremental catch-up: walk remote pages until reaching data the store
/// already has.
async fn catch_up(
    bank: &Bank,
    account_id: &str,
    watermark: OffsetDateTime,
    client: &dyn BankingClient,
    config: &SyncConfig,
    resolver: &mut CounterpartyResolver,
    db_connection: &Mutex<Connection>,
) -> Result<usize, Error> {
    let mut ingested = 0;
    let mut pages_committed = 0;
    let mut options = ListTransactionsOptions {
        count: Some(config.page_size),
        from_id: None,
    };
    let mut has_more = true;

    while has_more {
        let page = client
            .list_transactions(&bank.access_token, account_id, &options)
            .await
            .map_err(|error| Error::SyncIncomplete {
                pages_committed,
                source: Box::new(error),
            })?;

        if page.is_empty() {
            break;
        }

        let mut rows = Vec::with_capacity(page.len());
        for remote in page {
            let date = parse_remote_date(&remote.date)?;

            // The feed is newest-first, so the first transaction dated
            // strictly before the watermark means everything from here on is
            // already stored; discard the rest of the page. A transaction
            // dated exactly at the watermark is re-submitted and absorbed by
            // insert-or-ignore.
            if date < watermark {
                has_more = false;
                break;
            }

            options.from_id = Some(remote.id.clone());
            rows.push(map_remote_transaction(remote, date, resolver)?);
        }

        let mut connection = db_connection.lock().map_err(|_| Error::DatabaseLock)?;
        ingested += flush_page(&rows, resolver, &mut connection)?;
        pages_committed += 1;
    }

    tracing::info!("Ingested {ingested} new transactions for account {account_id}");

    Ok(ingested)
}

/// Commit one page's worth of new transactions.
///
/// Counterparties minted while mapping the page are written first, inside
/// the same SQL transaction, so the rows referencing them never dangle.
fn flush_page(
    rows: &[Transaction],
    resolver: &mut CounterpartyResolver,
    connection: &mut Connection,
) -> Result<usize, Error> {
    let transaction = connection.transaction()?;

    resolver.flush_pending(&transaction)?;
    let inserted = insert_or_ignore_transactions(rows, &transaction)?;

    transaction.commit()?;

    Ok(inserted)
}

/// Map a remote transaction onto the local shape.
fn map_remote_transaction(
    remote: TellerTransaction,
    date: OffsetDateTime,
    resolver: &mut CounterpartyResolver,
) -> Result<Transaction, Error> {
    let amount: f64 = remote.amount.parse().map_err(|_| {
        Error::RemoteValidation(format!(
            "transaction {} has a non-numeric amount {:?}",
            remote.id, remote.amount
        ))
    })?;

    let (name, counterparty_type) = match remote.details.counterparty {
        Some(counterparty) => (counterparty.name, counterparty.counterparty_type),
        None => (None, None),
    };
    let counterparty_id = resolver.resolve(name, counterparty_type);

    Ok(Transaction {
        id: remote.id,
        account_id: remote.account_id,
        counterparty_id,
        amount,
        date,
        description: remote.description,
        status: remote.status,
        transaction_type: remote.transaction_type,
        category: remote
            .details
            .category
            .unwrap_or_else(|| "unknown".to_string()),
    })
}

/// Parse the aggregator's calendar date, pinning it to midnight UTC.
///
/// Keeping every stored instant in UTC means the watermark comparison cannot
/// drift across timezone boundaries.
fn parse_remote_date(raw: &str) -> Result<OffsetDateTime, Error> {
    let format = format_description!("[year]-[month]-[day]");

    Date::parse(raw, &format)
        .map(|date| date.midnight().assume_utc())
        .map_err(|error| {
            Error::RemoteValidation(format!("invalid transaction date {raw:?}: {error}"))
        })
}
