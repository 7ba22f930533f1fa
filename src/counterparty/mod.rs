//! Counterparty management.
//!
//! A counterparty is the other party in a transaction (merchant or payee),
//! deduplicated by name per user: at most one counterparty row exists per
//! distinct name per user. The resolver maps free-text names observed during
//! a sync run to stable counterparty identities.

mod core;
mod resolver;

pub use core::{
    Counterparty, CounterpartyId, create_counterparty_table, get_counterparties_for_user,
    insert_or_ignore_counterparties, map_row_to_counterparty,
};
pub use resolver::CounterpartyResolver;

/// The sentinel used when a transaction has no counterparty name or type.
pub const UNKNOWN_COUNTERPARTY: &str = "unknown";
