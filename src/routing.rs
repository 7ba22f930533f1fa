//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    AppState,
    account::{list_accounts_endpoint, sync_accounts_endpoint},
    bank::{get_bank_endpoint, link_bank_endpoint},
    endpoints,
    transaction::{list_transactions_endpoint, sync_transactions_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(
            endpoints::BANK_API,
            get(get_bank_endpoint).post(link_bank_endpoint),
        )
        .route(endpoints::ACCOUNTS_API, get(list_accounts_endpoint))
        .route(endpoints::SYNC_ACCOUNTS_API, post(sync_accounts_endpoint))
        .route(
            endpoints::ACCOUNT_TRANSACTIONS_API,
            get(list_transactions_endpoint),
        )
        .route(
            endpoints::SYNC_ACCOUNT_TRANSACTIONS_API,
            post(sync_transactions_endpoint),
        )
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot").into_response()
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState, PaginationConfig, SyncConfig, endpoints,
        test_utils::{FakeBankingClient, remote_account, remote_transaction},
        user::USER_ID_HEADER,
    };

    use super::build_router;

    fn get_test_server(client: FakeBankingClient) -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(
            connection,
            Arc::new(client),
            SyncConfig::default(),
            PaginationConfig::default(),
        )
        .expect("Could not create app state");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn can_get_coffee() {
        let server = get_test_server(FakeBankingClient::new());

        let response = server.get(endpoints::COFFEE).await;

        assert_eq!(response.status_code(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn rejects_requests_without_user_header() {
        let server = get_test_server(FakeBankingClient::new());

        let response = server.get(endpoints::BANK_API).await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn link_sync_and_list_flow() {
        let client = FakeBankingClient::new()
            .with_accounts(vec![remote_account("acc_1", "Everyday Checking")])
            .with_feed(vec![
                remote_transaction("txn_2", "acc_1", "2024-01-16", "-2.00"),
                remote_transaction("txn_1", "acc_1", "2024-01-15", "-1.00"),
            ]);
        let server = get_test_server(client);

        let response = server
            .post(endpoints::BANK_API)
            .add_header(USER_ID_HEADER, "user-1")
            .json(&json!({
                "access_token": "token_abc",
                "user_id": "usr_remote",
                "enrollment_id": "enr_123",
                "institution_name": "Chase",
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        let response = server
            .post(endpoints::SYNC_ACCOUNTS_API)
            .add_header(USER_ID_HEADER, "user-1")
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>(), json!({ "synced": 1 }));

        let response = server
            .post("/api/accounts/acc_1/transactions/sync")
            .add_header(USER_ID_HEADER, "user-1")
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>(), json!({ "synced": 2 }));

        let response = server
            .get("/api/accounts/acc_1/transactions")
            .add_header(USER_ID_HEADER, "user-1")
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let transactions = response.json::<Value>();
        let transactions = transactions.as_array().expect("want a JSON array");
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0]["id"], "txn_2");
        assert_eq!(transactions[1]["id"], "txn_1");
    }

    #[tokio::test]
    async fn sync_without_linked_bank_is_not_found() {
        let server = get_test_server(FakeBankingClient::new());

        let response = server
            .post(endpoints::SYNC_ACCOUNTS_API)
            .add_header(USER_ID_HEADER, "user-1")
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_bank_omits_access_token() {
        let server = get_test_server(FakeBankingClient::new());

        server
            .post(endpoints::BANK_API)
            .add_header(USER_ID_HEADER, "user-1")
            .json(&json!({
                "access_token": "token_abc",
                "user_id": "usr_remote",
                "enrollment_id": "enr_123",
                "institution_name": "Chase",
            }))
            .await;

        let response = server
            .get(endpoints::BANK_API)
            .add_header(USER_ID_HEADER, "user-1")
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let bank = response.json::<Value>();
        assert_eq!(bank["institution_name"], "Chase");
        assert!(
            bank.get("access_token").is_none(),
            "access token must not be serialized, got {bank}"
        );
    }
}
