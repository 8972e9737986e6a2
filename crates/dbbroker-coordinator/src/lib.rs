//! dbbroker-coordinator — instance lifecycle against a remote cluster.
//!
//! Sits between the broker API and the cluster. For every request the
//! coordinator:
//!
//! - Loads the broker state from a [`StatePersister`](dbbroker_state::StatePersister)
//! - Validates the request against the recorded instances
//! - Delegates the provisioning action to a [`ProvisioningClient`]
//! - Waits, for creation, on the completion signal with a bounded timeout
//! - Saves the updated state once the cluster has confirmed the change
//!
//! # Architecture
//!
//! ```text
//! InstanceCoordinator
//!   ├── RwLock (create/destroy exclusive, update/exists shared)
//!   ├── ProvisioningClient (create → completion signal, update, delete, list)
//!   └── StatePersister (passed per call: load → mutate → save)
//! ```

pub mod client;
pub mod coordinator;
pub mod error;

pub use client::{
    CompletionReceiver, CompletionSender, ProvisioningClient, ProvisioningError,
    ProvisioningResult, completion_channel,
};
pub use coordinator::InstanceCoordinator;
pub use error::{CoordinatorError, CoordinatorResult};
