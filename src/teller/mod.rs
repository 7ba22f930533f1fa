//! The typed client for the Teller banking aggregation API.
//!
//! This module contains:
//! - Response models mirroring the remote schema, validated strictly
//! - The [BankingClient] trait that the sync engines call through
//! - [TellerClient], the production implementation using mutual TLS

mod client;
mod models;

pub use client::{BankingClient, ListTransactionsOptions, TellerClient};
pub use models::{
    TellerAccount, TellerAccountLinks, TellerCounterparty, TellerInstitution, TellerTransaction,
    TellerTransactionDetails, TellerTransactionLinks,
};
