//! dbbroker-core — shared types for the managed-database broker.
//!
//! Everything that more than one dbbroker crate needs to agree on lives
//! here: the persisted broker state model and the `broker.toml` parser.

pub mod config;
pub mod types;

pub use config::{BrokerConfig, ConfigError, CoordinatorConfig, StateConfig};
pub use types::*;
