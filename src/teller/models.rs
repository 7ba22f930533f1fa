//! Typed models for Teller API responses.
//!
//! Deserialization is strict: `deny_unknown_fields` makes an unexpected field
//! fail the call rather than silently passing through, and a missing or
//! mistyped field fails the same way.

use serde::Deserialize;

/// A bank account as reported by the aggregator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TellerAccount {
    /// The remote identifier for the account.
    pub id: String,
    /// The enrollment this account was discovered through.
    pub enrollment_id: String,
    /// API links related to this account.
    pub links: TellerAccountLinks,
    /// The institution holding the account.
    pub institution: TellerInstitution,
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

/// API links attached to an account.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TellerAccountLinks {
    /// The balances endpoint for the account.
    pub balances: String,
    /// The account itself.
    #[serde(rename = "self")]
    pub self_link: String,
    /// The transactions endpoint for the account.
    pub transactions: String,
}

/// The institution an account belongs to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TellerInstitution {
    /// The institution's display name.
    pub name: String,
    /// The remote identifier for the institution.
    pub id: String,
}

/// A transaction as reported by the aggregator.
///
/// Amounts and dates arrive as strings and are parsed during ingestion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TellerTransaction {
    /// The remote identifier for the transaction.
    pub id: String,
    /// The remote identifier of the account the transaction belongs to.
    pub account_id: String,
    /// The signed decimal amount as a string, e.g. "-45.99".
    pub amount: String,
    /// The calendar date of the transaction, e.g. "2024-01-15".
    pub date: String,
    /// The bank's description of the transaction.
    pub description: String,
    /// Enrichment details for the transaction.
    pub details: TellerTransactionDetails,
    /// Whether the transaction is pending or posted.
    pub status: String,
    /// API links related to this transaction.
    pub links: TellerTransactionLinks,
    /// The account's running balance after this transaction, if known.
    pub running_balance: Option<String>,
    /// The transaction type, e.g. "card_payment".
    #[serde(rename = "type")]
    pub transaction_type: String,
}

/// Enrichment details attached to a transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TellerTransactionDetails {
    /// How far enrichment has progressed for this transaction.
    pub processing_status: String,
    /// The spending category, if the aggregator could classify it.
    pub category: Option<String>,
    /// The other party in the transaction, if known.
    pub counterparty: Option<TellerCounterparty>,
}

/// The merchant or payee on the other side of a transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TellerCounterparty {
    /// The counterparty's name, if known.
    pub name: Option<String>,
    /// The kind of counterparty, e.g. "organization" or "person".
    #[serde(rename = "type")]
    pub counterparty_type: Option<String>,
}

/// API links attached to a transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TellerTransactionLinks {
    /// The transaction itself.
    #[serde(rename = "self")]
    pub self_link: String,
    /// The account the transaction belongs to.
    pub account: String,
}
