//! Defines the endpoint for fetching the linked bank.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{AppState, AuthenticatedUser, Error, bank::Bank};

use super::core::get_bank_for_user;

/// The state needed to fetch the linked bank.
#[derive(Clone)]
pub struct GetBankState {
    /// The database connection for managing banks.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetBankState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler returning the authenticated user's linked bank, 404 if
/// no bank is linked. The access token is omitted from the response.
pub async fn get_bank_endpoint(
    State(state): State<GetBankState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Bank>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    let bank = get_bank_for_user(&user_id, &connection)?;

    Ok(Json(bank))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};
    use rusqlite::Connection;

    use crate::{
        AuthenticatedUser, Error,
        bank::{LinkBankRequest, link_bank},
        db::initialize,
    };

    use super::{GetBankState, get_bank_endpoint};

    fn get_test_state() -> GetBankState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        GetBankState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn returns_bank_not_linked_when_absent() {
        let state = get_test_state();

        let result =
            get_bank_endpoint(State(state), AuthenticatedUser("user-1".to_string())).await;

        assert!(matches!(result, Err(Error::BankNotLinked)));
    }

    #[tokio::test]
    async fn returns_linked_bank() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            link_bank(
                &LinkBankRequest {
                    access_token: "token_abc".to_string(),
                    user_id: "usr_remote".to_string(),
                    enrollment_id: "enr_123".to_string(),
                    institution_name: "Chase".to_string(),
                },
                "user-1",
                &connection,
            )
            .unwrap();
        }

        let Json(bank) = get_bank_endpoint(State(state), AuthenticatedUser("user-1".to_string()))
            .await
            .expect("Could not get bank");

        assert_eq!(bank.id, "enr_123");
        assert_eq!(bank.institution_name, "Chase");
    }
}
