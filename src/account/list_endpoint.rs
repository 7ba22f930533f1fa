//! Defines the endpoint for listing the user's accounts.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{AppState, AuthenticatedUser, Error};

use super::core::{Account, get_accounts_for_user};

/// The state needed to list accounts.
#[derive(Clone)]
pub struct ListAccountsState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListAccountsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler returning the accounts of the user's linked bank.
///
/// Returns an empty list when no accounts have been synced yet.
pub async fn list_accounts_endpoint(
    State(state): State<ListAccountsState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Vec<Account>>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    let accounts = get_accounts_for_user(&user_id, &connection)?;

    Ok(Json(accounts))
}
