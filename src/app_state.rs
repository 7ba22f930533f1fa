//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error, db::initialize, pagination::PaginationConfig, teller::BankingClient,
    transaction::SyncConfig,
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The client for the remote banking API.
    pub banking_client: Arc<dyn BankingClient>,

    /// Tuning knobs for the transaction ingestion engine.
    pub sync_config: SyncConfig,

    /// The config that controls how pages of data are returned.
    pub pagination_config: PaginationConfig,

    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        banking_client: Arc<dyn BankingClient>,
        sync_config: SyncConfig,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            banking_client,
            sync_config,
            pagination_config,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
