//! Bank account management.
//!
//! Accounts are mirrored from the aggregator: the remote id is the local
//! primary key, and each account sync upserts the full account list
//! wholesale. Accounts the remote stops returning are kept as-is.

mod core;
mod list_endpoint;
mod sync;
mod sync_endpoint;

pub use core::{
    Account, AccountId, create_account_table, get_accounts_for_user, map_row_to_account,
    upsert_accounts,
};
pub use list_endpoint::list_accounts_endpoint;
pub use sync::sync_accounts;
pub use sync_endpoint::sync_accounts_endpoint;
