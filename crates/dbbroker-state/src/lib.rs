//! dbbroker-state — durable record of the instances the broker owns.
//!
//! The coordinator only ever sees the [`StatePersister`] trait: load a
//! snapshot, mutate it, save it back. Two backends are provided:
//!
//! - [`MemoryPersister`] keeps the state in process (tests, embedding).
//! - [`RedbPersister`] stores the JSON-serialized state in a single
//!   [redb](https://docs.rs/redb) table, either on disk or in memory.

pub mod error;
pub mod memory;
pub mod persister;
pub mod store;
pub mod tables;

pub use error::{StateError, StateResult};
pub use memory::MemoryPersister;
pub use persister::StatePersister;
pub use store::RedbPersister;
