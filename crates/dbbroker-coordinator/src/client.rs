//! Provisioning client interface.
//!
//! The coordinator drives a remote cluster through this trait. Creation is
//! asynchronous: `create_database` returns as soon as the cluster accepts
//! the request and hands back a one-shot receiver that later yields the
//! new database's credentials.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;

use dbbroker_core::{Credentials, DatabaseUid, Settings};

/// Receiving half of a creation's completion signal.
///
/// The coordinator drops it when it stops waiting; implementations can
/// observe that through [`oneshot::Sender::is_closed`] or
/// [`oneshot::Sender::closed`] and clean up.
pub type CompletionReceiver = oneshot::Receiver<Credentials>;

/// Sending half of a creation's completion signal.
pub type CompletionSender = oneshot::Sender<Credentials>;

/// Create a completion signal pair.
pub fn completion_channel() -> (CompletionSender, CompletionReceiver) {
    oneshot::channel()
}

/// Errors reported by the cluster API.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("cluster unavailable: {0}")]
    Unavailable(String),

    #[error("database not found on cluster: {0}")]
    DatabaseNotFound(DatabaseUid),

    #[error("cluster API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type ProvisioningResult<T> = Result<T, ProvisioningError>;

/// Operations the coordinator needs from the remote cluster.
#[async_trait]
pub trait ProvisioningClient: Send + Sync {
    /// Begin creating a database. The receiver yields exactly one
    /// `Credentials` once the cluster finishes; it is never written to if
    /// this call returns an error.
    async fn create_database(&self, settings: Settings) -> ProvisioningResult<CompletionReceiver>;

    async fn update_database(&self, uid: DatabaseUid, params: Settings) -> ProvisioningResult<()>;

    async fn delete_database(&self, uid: DatabaseUid) -> ProvisioningResult<()>;

    /// UIDs of every database currently on the cluster.
    async fn list_databases(&self) -> ProvisioningResult<Vec<DatabaseUid>>;
}
