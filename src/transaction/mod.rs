//! Transaction storage and synchronization.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model mirrored from the aggregator
//! - Database functions for storing and querying transactions, including the
//!   derived sync watermark
//! - The incremental ingestion engine that reconciles the remote feed
//!   against the local store
//! - Route handlers for listing and syncing transactions

mod core;
mod list_endpoint;
mod sync;
mod sync_endpoint;

pub use core::{
    Transaction, TransactionId, create_transaction_table, get_transactions_for_account,
    insert_or_ignore_transactions, latest_transaction_date, map_row_to_transaction,
};
pub use list_endpoint::list_transactions_endpoint;
pub use sync::{SyncConfig, sync_transactions};
pub use sync_endpoint::sync_transactions_endpoint;

#[cfg(test)]
pub use core::count_transactions_for_account;
