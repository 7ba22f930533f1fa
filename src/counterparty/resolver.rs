//! Maps counterparty names observed during a sync run to stable identities.

use std::collections::HashMap;

use rusqlite::Connection;
use uuid::Uuid;

use crate::Error;

use super::{
    UNKNOWN_COUNTERPARTY,
    core::{Counterparty, CounterpartyId, get_counterparties_for_user, insert_or_ignore_counterparties},
};

/// Resolves free-text counterparty names to stable counterparty ids.
///
/// The resolver is scoped to a single sync invocation: it bulk-loads the
/// user's existing counterparties once, memoizes every name it mints during
/// the run, and never creates a second record for a name already seen, either
/// pre-existing in the store or created earlier in the same run.
#[derive(Debug)]
pub struct CounterpartyResolver {
    user_id: String,
    known: HashMap<String, CounterpartyId>,
    pending: Vec<Counterparty>,
}

impl CounterpartyResolver {
    /// Create a resolver for `user_id`, pre-loaded with the user's existing
    /// counterparties.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the bulk load fails.
    pub fn load(user_id: &str, connection: &Connection) -> Result<Self, Error> {
        let known = get_counterparties_for_user(user_id, connection)?
            .into_iter()
            .map(|counterparty| (counterparty.name, counterparty.id))
            .collect();

        Ok(Self {
            user_id: user_id.to_owned(),
            known,
            pending: Vec::new(),
        })
    }

    /// Return the stable counterparty id for a `(name, type)` pair observed
    /// on a transaction, minting and memoizing a new record the first time a
    /// name is seen in the session.
    ///
    /// Missing name/type map to the `"unknown"` sentinel, so every
    /// counterparty-less transaction for a user shares a single row.
    pub fn resolve(
        &mut self,
        name: Option<String>,
        counterparty_type: Option<String>,
    ) -> CounterpartyId {
        let name = name.unwrap_or_else(|| UNKNOWN_COUNTERPARTY.to_string());
        let counterparty_type =
            counterparty_type.unwrap_or_else(|| UNKNOWN_COUNTERPARTY.to_string());

        if let Some(id) = self.known.get(&name) {
            return id.clone();
        }

        let id = Uuid::new_v4().to_string();
        self.known.insert(name.clone(), id.clone());
        self.pending.push(Counterparty {
            id: id.clone(),
            user_id: self.user_id.clone(),
            name,
            counterparty_type,
        });

        id
    }

    /// Write all counterparties minted since the last flush as one
    /// insert-or-ignore batch.
    ///
    /// The ingestion engine calls this before committing a page's
    /// transactions so the rows they reference exist first.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the batch insert fails.
    pub fn flush_pending(&mut self, connection: &Connection) -> Result<(), Error> {
        insert_or_ignore_counterparties(&self.pending, connection)?;
        self.pending.clear();

        Ok(())
    }
}

#[cfg(test)]
mod resolver_tests {
    use rusqlite::Connection;

    use crate::{
        counterparty::core::{get_counterparties_for_user, insert_or_ignore_counterparties},
        counterparty::Counterparty,
        db::initialize,
    };

    use super::CounterpartyResolver;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn reuses_existing_row_from_store() {
        let conn = get_test_connection();
        insert_or_ignore_counterparties(
            &[Counterparty {
                id: "cp-existing".to_string(),
                user_id: "user-1".to_string(),
                name: "THE COFFEE BAR".to_string(),
                counterparty_type: "organization".to_string(),
            }],
            &conn,
        )
        .unwrap();

        let mut resolver = CounterpartyResolver::load("user-1", &conn).unwrap();

        let id = resolver.resolve(
            Some("THE COFFEE BAR".to_string()),
            Some("organization".to_string()),
        );

        assert_eq!(id, "cp-existing");
    }

    #[test]
    fn memoizes_new_names_within_a_run() {
        let conn = get_test_connection();
        let mut resolver = CounterpartyResolver::load("user-1", &conn).unwrap();

        let first = resolver.resolve(
            Some("ACME PAYROLL".to_string()),
            Some("organization".to_string()),
        );
        let second = resolver.resolve(
            Some("ACME PAYROLL".to_string()),
            Some("organization".to_string()),
        );

        assert_eq!(first, second);

        resolver.flush_pending(&conn).unwrap();

        let stored = get_counterparties_for_user("user-1", &conn).unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn defaults_missing_fields_to_unknown() {
        let conn = get_test_connection();
        let mut resolver = CounterpartyResolver::load("user-1", &conn).unwrap();

        let first = resolver.resolve(None, None);
        let second = resolver.resolve(None, None);

        assert_eq!(first, second, "want a single shared unknown counterparty");

        resolver.flush_pending(&conn).unwrap();

        let stored = get_counterparties_for_user("user-1", &conn).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "unknown");
        assert_eq!(stored[0].counterparty_type, "unknown");
    }

    #[test]
    fn flush_pending_clears_the_batch() {
        let conn = get_test_connection();
        let mut resolver = CounterpartyResolver::load("user-1", &conn).unwrap();

        resolver.resolve(Some("ACME PAYROLL".to_string()), None);
        resolver.flush_pending(&conn).unwrap();

        // A second flush with nothing new must be a no-op.
        resolver.flush_pending(&conn).unwrap();

        let stored = get_counterparties_for_user("user-1", &conn).unwrap();
        assert_eq!(stored.len(), 1);
    }
}
