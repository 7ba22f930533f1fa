//! Defines the endpoint that triggers a transaction sync for an account.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{AppState, AuthenticatedUser, Error, teller::BankingClient};

use super::sync::{SyncConfig, sync_transactions};

/// The state needed to sync an account's transactions.
#[derive(Clone)]
pub struct SyncTransactionsState {
    /// The client for the remote banking API.
    pub banking_client: Arc<dyn BankingClient>,
    /// Tuning knobs for the ingestion engine.
    pub sync_config: SyncConfig,
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SyncTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            banking_client: state.banking_client.clone(),
            sync_config: state.sync_config.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The response body for a completed sync.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    /// How many transactions the sync ingested.
    pub synced: usize,
}

/// A route handler that syncs the remote transaction feed for an account
/// into the local store. Synchronous to the caller: the response is sent
/// once the sync finishes or fails, and a failed sync can simply be
/// re-requested.
pub async fn sync_transactions_endpoint(
    State(state): State<SyncTransactionsState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(account_id): Path<String>,
) -> Result<Json<SyncResponse>, Error> {
    let synced = sync_transactions(
        &user_id,
        &account_id,
        state.banking_client.as_ref(),
        &state.sync_config,
        &state.db_connection,
    )
    .await?;

    Ok(Json(SyncResponse { synced }))
}
