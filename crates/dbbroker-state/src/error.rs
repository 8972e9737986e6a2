//! Error types for broker state persistence.

use thiserror::Error;

/// Result type alias for state persistence operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur while loading or saving the broker state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to open database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),

    #[error("state lock poisoned")]
    Poisoned,

    #[error("refusing to save state with duplicate instance id: {0}")]
    DuplicateInstance(String),
}
