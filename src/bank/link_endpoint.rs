//! Defines the endpoint for linking a bank.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, AuthenticatedUser, Error, bank::Bank};

/// The state needed to link a bank.
#[derive(Clone)]
pub struct LinkBankState {
    /// The database connection for managing banks.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LinkBankState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The payload produced by a successful enrollment with the aggregator.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkBankRequest {
    /// The secret access token for the enrollment.
    pub access_token: String,
    /// The user's identity within the remote system.
    pub user_id: String,
    /// The remote enrollment id.
    pub enrollment_id: String,
    /// The institution's display name.
    pub institution_name: String,
}

/// A route handler for linking the authenticated user's bank.
///
/// Responds 201 with the created bank record (access token omitted), or 409
/// if the user already has a linked bank.
pub async fn link_bank_endpoint(
    State(state): State<LinkBankState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(request): Json<LinkBankRequest>,
) -> Result<(StatusCode, Json<Bank>), Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    let bank = link_bank(&request, &user_id, &connection)?;

    Ok((StatusCode::CREATED, Json(bank)))
}

/// Create the bank record for `user_id` from an enrollment payload.
///
/// The enrollment id doubles as the record's primary key, matching the
/// remote system's identity for the link.
///
/// # Errors
/// Returns [Error::BankAlreadyLinked] if the user already has a bank, or
/// [Error::SqlError] if there is some other SQL error.
pub fn link_bank(
    request: &LinkBankRequest,
    user_id: &str,
    connection: &Connection,
) -> Result<Bank, Error> {
    connection
        .execute(
            "INSERT INTO bank (id, user_id, access_token, bank_user_id, enrollment_id, institution_name) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &request.enrollment_id,
                user_id,
                &request.access_token,
                &request.user_id,
                &request.enrollment_id,
                &request.institution_name,
            ),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::BankAlreadyLinked,
            error => error.into(),
        })?;

    Ok(Bank {
        id: request.enrollment_id.clone(),
        user_id: user_id.to_owned(),
        access_token: request.access_token.clone(),
        bank_user_id: request.user_id.clone(),
        enrollment_id: request.enrollment_id.clone(),
        institution_name: request.institution_name.clone(),
    })
}
