//! In-process persister.

use std::sync::{Arc, Mutex};

use dbbroker_core::BrokerState;
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::persister::{StatePersister, check_unique_ids};

/// Keeps the broker state in memory. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersister {
    state: Arc<Mutex<BrokerState>>,
}

impl MemoryPersister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing state.
    pub fn with_state(state: BrokerState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Copy of the currently stored state.
    pub fn snapshot(&self) -> StateResult<BrokerState> {
        self.load()
    }
}

impl StatePersister for MemoryPersister {
    fn load(&self) -> StateResult<BrokerState> {
        let state = self.state.lock().map_err(|_| StateError::Poisoned)?;
        Ok(state.clone())
    }

    fn save(&self, state: &BrokerState) -> StateResult<()> {
        check_unique_ids(state)?;
        let mut current = self.state.lock().map_err(|_| StateError::Poisoned)?;
        *current = state.clone();
        debug!(instances = state.len(), "broker state stored in memory");
        Ok(())
    }
}
