//! Coordinator error types.

use std::time::Duration;

use thiserror::Error;

use crate::client::ProvisioningError;

/// Errors returned by instance lifecycle operations.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("instance already exists: {0}")]
    InstanceExists(String),

    #[error("instance does not exist: {0}")]
    InstanceDoesNotExist(String),

    #[error("failed to load the broker state")]
    FailedToLoadState(#[source] dbbroker_state::StateError),

    #[error("failed to save the broker state")]
    FailedToSaveState(#[source] dbbroker_state::StateError),

    #[error("timed out after {timeout:?} waiting for the database of instance {instance_id}")]
    CreateDatabaseTimeoutExpired {
        instance_id: String,
        timeout: Duration,
    },

    #[error("cluster abandoned database creation for instance {0}")]
    ProvisioningAbandoned(String),

    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),
}

impl CoordinatorError {
    /// Whether the cluster may still hold a database for this request.
    ///
    /// True for timeouts and abandoned creations: the caller cannot know
    /// if the resource materialized and should reconcile.
    pub fn is_outcome_unknown(&self) -> bool {
        matches!(
            self,
            CoordinatorError::CreateDatabaseTimeoutExpired { .. }
                | CoordinatorError::ProvisioningAbandoned(_)
        )
    }
}

pub type CoordinatorResult<T> = Result<T, CoordinatorError>;
