//! Ledgersync is a web app backend for pulling your bank accounts and
//! transactions into a local database.
//!
//! A user links their bank through the Teller aggregation API, after which
//! the app can sync the account list and incrementally sync each account's
//! transaction feed. This library provides a JSON REST API plus the sync
//! engine behind it.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod account;
mod app_state;
mod bank;
mod counterparty;
mod db;
mod endpoints;
mod pagination;
mod routing;
mod teller;
#[cfg(test)]
mod test_utils;
mod transaction;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use teller::{BankingClient, TellerClient};
pub use transaction::SyncConfig;
pub use user::{AuthenticatedUser, UserId};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// No bank has been linked for the requesting user.
    ///
    /// Every sync operation needs the bank's access token, so this error is
    /// terminal for the request and surfaced to the caller.
    #[error("no bank is linked for this user")]
    BankNotLinked,

    /// The user tried to link a bank while one is already linked.
    ///
    /// The current design is single-bank-per-user; the existing link must be
    /// removed out of band before a new one can be created.
    #[error("a bank is already linked for this user")]
    BankAlreadyLinked,

    /// The request did not carry the authenticated user header.
    ///
    /// Authentication is handled by an upstream identity-aware proxy which
    /// forwards the user id; a request without it cannot be served.
    #[error("the request is missing the authenticated user header")]
    Unauthenticated,

    /// A response from the remote banking API failed schema validation.
    ///
    /// Unknown or malformed fields fail the call rather than silently
    /// passing through.
    #[error("the remote response failed validation: {0}")]
    RemoteValidation(String),

    /// A network, TLS, or HTTP-level failure while calling the remote
    /// banking API. There is no built-in retry; the caller may re-invoke
    /// sync, which is safe because ingestion is idempotent.
    #[error("could not reach the remote API: {0}")]
    RemoteTransport(String),

    /// Transaction sync failed partway through paging.
    ///
    /// Pages committed before the failure are kept; re-running the sync
    /// re-fetches them as harmless no-ops and continues past the failure
    /// point.
    #[error("transaction sync stopped after committing {pages_committed} pages: {source}")]
    SyncIncomplete {
        /// How many pages were committed before the remote call failed.
        pages_committed: usize,
        /// The remote client error that aborted the page loop.
        source: Box<Error>,
    },

    /// A constraint violation that insert-or-ignore could not absorb.
    #[error("the store rejected the write: {0}")]
    StoreConflict(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                ref description,
            ) => Error::StoreConflict(
                description
                    .clone()
                    .unwrap_or_else(|| "foreign key constraint failed".to_string()),
            ),
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::BankNotLinked | Error::NotFound => StatusCode::NOT_FOUND,
            Error::BankAlreadyLinked => StatusCode::CONFLICT,
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::RemoteValidation(_)
            | Error::RemoteTransport(_)
            | Error::SyncIncomplete { .. } => StatusCode::BAD_GATEWAY,
            Error::StoreConflict(_) | Error::DatabaseLock | Error::SqlError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Internal errors are not intended to be shown to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
