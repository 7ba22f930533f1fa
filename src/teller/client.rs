//! The HTTP client for the Teller API.
//!
//! Teller authenticates clients with mutual TLS plus HTTP Basic auth where
//! the enrollment's access token is the username and the password is empty.
//! Pagination is cursor-based: `from_id` names the last transaction seen and
//! the server returns the next page of the newest-first feed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::Error;

use super::models::{TellerAccount, TellerTransaction};

/// Options for paging through an account's transaction feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListTransactionsOptions {
    /// The maximum number of transactions the server should return.
    pub count: Option<u32>,
    /// The identifier of the last transaction already seen; the server
    /// returns the page that chronologically follows it.
    pub from_id: Option<String>,
}

/// A client for the remote banking aggregation API.
///
/// The sync engines call through this trait so they can be exercised against
/// a fake feed in tests. There is no retry or backoff behind these calls;
/// a failure surfaces directly to the caller.
#[async_trait]
pub trait BankingClient: Send + Sync {
    /// List all accounts visible to the enrollment behind `access_token`.
    ///
    /// # Errors
    /// Returns [Error::RemoteTransport] on a network, TLS, or HTTP failure
    /// and [Error::RemoteValidation] if the response fails schema validation.
    async fn list_accounts(&self, access_token: &str) -> Result<Vec<TellerAccount>, Error>;

    /// List a page of the newest-first transaction feed for `account_id`.
    ///
    /// # Errors
    /// Returns [Error::RemoteTransport] on a network, TLS, or HTTP failure
    /// and [Error::RemoteValidation] if the response fails schema validation.
    async fn list_transactions(
        &self,
        access_token: &str,
        account_id: &str,
        options: &ListTransactionsOptions,
    ) -> Result<Vec<TellerTransaction>, Error>;
}

/// The production [BankingClient] backed by the Teller REST API.
#[derive(Debug, Clone)]
pub struct TellerClient {
    client: Client,
    base_url: String,
}

impl TellerClient {
    /// Create a client for the Teller API at `base_url`.
    ///
    /// `certificate_pem` and `private_key_pem` are the PEM-encoded client
    /// certificate and key issued by Teller for mutual TLS.
    ///
    /// # Errors
    /// Returns [Error::RemoteTransport] if the client identity cannot be
    /// loaded or the underlying HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        certificate_pem: &[u8],
        private_key_pem: &[u8],
    ) -> Result<Self, Error> {
        let identity_pem = [certificate_pem, private_key_pem].concat();
        let identity = reqwest::Identity::from_pem(&identity_pem)
            .map_err(|error| Error::RemoteTransport(format!("invalid client identity: {error}")))?;

        let client = Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|error| {
                Error::RemoteTransport(format!("could not build HTTP client: {error}"))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        access_token: &str,
        path_and_query: &str,
    ) -> Result<T, Error> {
        let url = format!("{}{}", self.base_url, path_and_query);

        let response = self
            .client
            .get(&url)
            .basic_auth(access_token, Some(""))
            .send()
            .await
            .map_err(|error| Error::RemoteTransport(error.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| Error::RemoteTransport(error.to_string()))?;

        if !status.is_success() {
            return Err(Error::RemoteTransport(format!(
                "GET {url} returned {status}: {body}"
            )));
        }

        serde_json::from_str(&body).map_err(|error| {
            Error::RemoteValidation(format!("GET {url} returned an unexpected shape: {error}"))
        })
    }
}

/// Build the path and query string for a transactions page request.
fn transactions_path(account_id: &str, options: &ListTransactionsOptions) -> String {
    let mut path = format!("/accounts/{account_id}/transactions");

    let mut query = Vec::new();
    if let Some(count) = options.count {
        query.push(format!("count={count}"));
    }
    if let Some(from_id) = &options.from_id {
        query.push(format!("from_id={from_id}"));
    }

    if !query.is_empty() {
        path.push('?');
        path.push_str(&query.join("&"));
    }

    path
}

#[async_trait]
impl BankingClient for TellerClient {
    async fn list_accounts(&self, access_token: &str) -> Result<Vec<TellerAccount>, Error> {
        self.get_json(access_token, "/accounts").await
    }

    async fn list_transactions(
        &self,
        access_token: &str,
        account_id: &str,
        options: &ListTransactionsOptions,
    ) -> Result<Vec<TellerTransaction>, Error> {
        self.get_json(access_token, &transactions_path(account_id, options))
            .await
    }
}
