//! Defines the endpoint that triggers an account sync.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{AppState, AuthenticatedUser, Error, teller::BankingClient};

use super::sync::sync_accounts;

/// The state needed to sync accounts.
#[derive(Clone)]
pub struct SyncAccountsState {
    /// The client for the remote banking API.
    pub banking_client: Arc<dyn BankingClient>,
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SyncAccountsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            banking_client: state.banking_client.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The response body for a completed sync.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    /// How many rows the sync wrote.
    pub synced: usize,
}

/// A route handler that fetches the linked bank's account list and upserts
/// it wholesale. Synchronous to the caller: the response is sent once the
/// sync finishes or fails.
pub async fn sync_accounts_endpoint(
    State(state): State<SyncAccountsState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<SyncResponse>, Error> {
    let synced = sync_accounts(&user_id, state.banking_client.as_ref(), &state.db_connection).await?;

    Ok(Json(SyncResponse { synced }))
}
