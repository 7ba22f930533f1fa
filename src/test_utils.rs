#![allow(missing_docs)]

//! Shared helpers for tests: a fake banking client that serves a canned
//! newest-first feed with Teller's paging semantics, plus fixture builders
//! and database seed helpers.

use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    account::Account,
    bank::{LinkBankRequest, link_bank},
    teller::{
        BankingClient, ListTransactionsOptions, TellerAccount, TellerAccountLinks,
        TellerCounterparty, TellerInstitution, TellerTransaction, TellerTransactionDetails,
        TellerTransactionLinks,
    },
    transaction::Transaction,
};

/// A [BankingClient] backed by an in-memory feed.
///
/// The transaction feed is newest-first, like the real API, and pages are
/// served with the same cursor semantics: `from_id` starts the page after
/// that transaction, `count` caps the page length.
pub(crate) struct FakeBankingClient {
    accounts: Vec<TellerAccount>,
    feed: Vec<TellerTransaction>,
    fail_after_pages: Option<usize>,
    pages_served: Mutex<usize>,
}

impl FakeBankingClient {
    pub(crate) fn new() -> Self {
        Self {
            accounts: Vec::new(),
            feed: Vec::new(),
            fail_after_pages: None,
            pages_served: Mutex::new(0),
        }
    }

    pub(crate) fn with_accounts(mut self, accounts: Vec<TellerAccount>) -> Self {
        self.accounts = accounts;
        self
    }

    /// Set the transaction feed. Must be ordered newest-first.
    pub(crate) fn with_feed(mut self, feed: Vec<TellerTransaction>) -> Self {
        self.feed = feed;
        self
    }

    /// Make `list_transactions` fail once it has served this many pages.
    pub(crate) fn fail_after_pages(mut self, pages: usize) -> Self {
        self.fail_after_pages = Some(pages);
        self
    }

    /// How many transaction pages have been served so far.
    pub(crate) fn pages_served(&self) -> usize {
        *self.pages_served.lock().unwrap()
    }
}

#[async_trait]
impl BankingClient for FakeBankingClient {
    async fn list_accounts(&self, _access_token: &str) -> Result<Vec<TellerAccount>, Error> {
        Ok(self.accounts.clone())
    }

    async fn list_transactions(
        &self,
        _access_token: &str,
        account_id: &str,
        options: &ListTransactionsOptions,
    ) -> Result<Vec<TellerTransaction>, Error> {
        let mut pages_served = self.pages_served.lock().unwrap();

        if let Some(limit) = self.fail_after_pages {
            if *pages_served >= limit {
                return Err(Error::RemoteTransport(
                    "simulated connection reset".to_string(),
                ));
            }
        }

        *pages_served += 1;

        let feed: Vec<&TellerTransaction> = self
            .feed
            .iter()
            .filter(|transaction| transaction.account_id == account_id)
            .collect();

        let start = match &options.from_id {
            Some(from_id) => feed
                .iter()
                .position(|transaction| &transaction.id == from_id)
                .map(|index| index + 1)
                .unwrap_or(feed.len()),
            None => 0,
        };
        let count = options.count.unwrap_or(100) as usize;

        Ok(feed
            .into_iter()
            .skip(start)
            .take(count)
            .cloned()
            .collect())
    }
}

pub(crate) fn remote_account(id: &str, name: &str) -> TellerAccount {
    TellerAccount {
        id: id.to_string(),
        enrollment_id: "enr_123".to_string(),
        links: TellerAccountLinks {
            balances: format!("https://api.teller.io/accounts/{id}/balances"),
            self_link: format!("https://api.teller.io/accounts/{id}"),
            transactions: format!("https://api.teller.io/accounts/{id}/transactions"),
        },
        institution: TellerInstitution {
            name: "Chase".to_string(),
            id: "chase".to_string(),
        },
        account_type: "depository".to_string(),
        name: name.to_string(),
        subtype: "checking".to_string(),
        currency: "USD".to_string(),
        last_four: "1771".to_string(),
        status: "open".to_string(),
    }
}

pub(crate) fn remote_transaction(
    id: &str,
    account_id: &str,
    date: &str,
    amount: &str,
) -> TellerTransaction {
    remote_transaction_with_counterparty(
        id,
        account_id,
        date,
        amount,
        Some(("ACME STORE", "organization")),
    )
}

pub(crate) fn remote_transaction_with_counterparty(
    id: &str,
    account_id: &str,
    date: &str,
    amount: &str,
    counterparty: Option<(&str, &str)>,
) -> TellerTransaction {
    TellerTransaction {
        id: id.to_string(),
        account_id: account_id.to_string(),
        amount: amount.to_string(),
        date: date.to_string(),
        description: format!("test transaction {id}"),
        details: TellerTransactionDetails {
            processing_status: "complete".to_string(),
            category: Some("general".to_string()),
            counterparty: counterparty.map(|(name, counterparty_type)| TellerCounterparty {
                name: Some(name.to_string()),
                counterparty_type: Some(counterparty_type.to_string()),
            }),
        },
        status: "posted".to_string(),
        links: TellerTransactionLinks {
            self_link: format!("https://api.teller.io/accounts/{account_id}/transactions/{id}"),
            account: format!("https://api.teller.io/accounts/{account_id}"),
        },
        running_balance: None,
        transaction_type: "card_payment".to_string(),
    }
}

pub(crate) fn local_account(id: &str, name: &str) -> Account {
    Account {
        id: id.to_string(),
        bank_id: "enr_123".to_string(),
        account_type: "depository".to_string(),
        name: name.to_string(),
        subtype: "checking".to_string(),
        currency: "USD".to_string(),
        last_four: "1771".to_string(),
        status: "open".to_string(),
    }
}

/// A stored transaction referencing the `cp-1` counterparty created by
/// [seed_counterparty].
pub(crate) fn local_transaction(id: &str, account_id: &str, date: OffsetDateTime) -> Transaction {
    Transaction {
        id: id.to_string(),
        account_id: account_id.to_string(),
        counterparty_id: "cp-1".to_string(),
        amount: -12.34,
        date,
        description: format!("stored transaction {id}"),
        status: "posted".to_string(),
        transaction_type: "card_payment".to_string(),
        category: "general".to_string(),
    }
}

/// Link the test bank `enr_123` with access token `token_abc` for `user_id`.
pub(crate) fn seed_bank(connection: &Connection, user_id: &str) {
    link_bank(
        &LinkBankRequest {
            access_token: "token_abc".to_string(),
            user_id: "usr_remote".to_string(),
            enrollment_id: "enr_123".to_string(),
            institution_name: "Chase".to_string(),
        },
        user_id,
        connection,
    )
    .expect("Could not seed bank");
}

/// Insert an account row belonging to the seeded bank `enr_123`.
pub(crate) fn seed_account(connection: &Connection, id: &str) {
    connection
        .execute(
            "INSERT INTO account (id, bank_id, type, name, subtype, currency, last_four, status) \
            VALUES (?1, 'enr_123', 'depository', 'Test Account', 'checking', 'USD', '1771', 'open')",
            [id],
        )
        .expect("Could not seed account");
}

pub(crate) fn seed_counterparty(connection: &Connection, id: &str, user_id: &str, name: &str) {
    connection
        .execute(
            "INSERT OR IGNORE INTO counterparty (id, user_id, name, type) \
            VALUES (?1, ?2, ?3, 'organization')",
            [id, user_id, name],
        )
        .expect("Could not seed counterparty");
}
