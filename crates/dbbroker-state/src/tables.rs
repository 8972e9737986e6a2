//! redb table definitions for the broker state.

use redb::TableDefinition;

/// The whole broker state as one JSON document, keyed by [`CURRENT_KEY`].
pub const BROKER_STATE: TableDefinition<&str, &[u8]> = TableDefinition::new("broker_state");

/// Key of the live broker state document.
pub const CURRENT_KEY: &str = "current";
