//! Defines the endpoint for listing an account's stored transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, AuthenticatedUser, Error,
    pagination::{PaginationConfig, resolve_page},
};

use super::core::{Transaction, get_transactions_for_account};

/// The state needed to list transactions.
#[derive(Clone)]
pub struct ListTransactionsState {
    /// The config that controls how data is paged.
    pub pagination_config: PaginationConfig,
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            pagination_config: state.pagination_config.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The paging query parameters for the transactions listing.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionListQuery {
    /// The 1-based page number.
    pub page: Option<u64>,
    /// How many transactions to return per page.
    pub page_size: Option<u64>,
}

/// A route handler returning a page of an account's stored transactions,
/// newest first.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    AuthenticatedUser(_user_id): AuthenticatedUser,
    Path(account_id): Path<String>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let (limit, offset) = resolve_page(query.page, query.page_size, &state.pagination_config);

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    let transactions = get_transactions_for_account(&account_id, limit, offset, &connection)?;

    Ok(Json(transactions))
}
