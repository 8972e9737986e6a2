//! RedbPersister — redb-backed broker state persistence.
//!
//! The full broker state is JSON-serialized into a single value of the
//! `broker_state` table. Each save is one write transaction, so readers
//! see either the previous or the new state, never a mix.

use std::path::Path;
use std::sync::Arc;

use dbbroker_core::BrokerState;
use redb::{Database, ReadableDatabase};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::persister::{StatePersister, check_unique_ids};
use crate::tables::{BROKER_STATE, CURRENT_KEY};

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe persister backed by redb.
#[derive(Clone)]
pub struct RedbPersister {
    db: Arc<Database>,
}

impl RedbPersister {
    /// Open (or create) a persistent state database at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "broker state database opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory database (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory broker state database opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(BROKER_STATE).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }
}

impl StatePersister for RedbPersister {
    fn load(&self) -> StateResult<BrokerState> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(BROKER_STATE).map_err(map_err!(Table))?;
        let state: BrokerState = match table.get(CURRENT_KEY).map_err(map_err!(Read))? {
            Some(guard) => serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?,
            None => BrokerState::default(),
        };
        debug!(instances = state.len(), "broker state loaded");
        Ok(state)
    }

    fn save(&self, state: &BrokerState) -> StateResult<()> {
        check_unique_ids(state)?;
        let value = serde_json::to_vec(state).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(BROKER_STATE).map_err(map_err!(Table))?;
            table
                .insert(CURRENT_KEY, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(instances = state.len(), "broker state saved");
        Ok(())
    }
}
