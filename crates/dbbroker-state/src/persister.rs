//! The persister interface consumed by the coordinator.

use std::sync::Arc;

use dbbroker_core::BrokerState;

use crate::error::{StateError, StateResult};

/// Loads and saves the broker state as a whole.
///
/// `load` hands out an owned snapshot the caller may mutate freely;
/// `save` persists exactly the structure passed, atomically from the
/// caller's point of view. Implementations do not coordinate concurrent
/// load/save sequences; that is the caller's job.
pub trait StatePersister: Send + Sync {
    fn load(&self) -> StateResult<BrokerState>;

    fn save(&self, state: &BrokerState) -> StateResult<()>;
}

impl<P: StatePersister + ?Sized> StatePersister for Arc<P> {
    fn load(&self) -> StateResult<BrokerState> {
        (**self).load()
    }

    fn save(&self, state: &BrokerState) -> StateResult<()> {
        (**self).save(state)
    }
}

impl<P: StatePersister + ?Sized> StatePersister for &P {
    fn load(&self) -> StateResult<BrokerState> {
        (**self).load()
    }

    fn save(&self, state: &BrokerState) -> StateResult<()> {
        (**self).save(state)
    }
}

/// Reject states that break the unique-ID invariant.
pub(crate) fn check_unique_ids(state: &BrokerState) -> StateResult<()> {
    match state.duplicate_id() {
        Some(id) => Err(StateError::DuplicateInstance(id.to_string())),
        None => Ok(()),
    }
}
