//! InstanceCoordinator — lifecycle operations for database instances.
//!
//! Every operation follows the same shape: load the broker state, check the
//! request against it, ask the cluster to act, and persist the new state
//! only once the cluster has confirmed. A record is therefore never added
//! before its database exists, and never removed before its database is
//! gone.
//!
//! A single reader/writer lock spans each operation's load-to-save window.
//! `create` and `destroy` hold it exclusively, so at most one creation is
//! in flight and no two mutations interleave. `update`, `exists`, and
//! `orphaned_databases` only read the state and share the lock.

use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use dbbroker_core::{BrokerState, CoordinatorConfig, Credentials, DatabaseUid, InstanceRecord, Settings};
use dbbroker_state::StatePersister;

use crate::client::ProvisioningClient;
use crate::error::{CoordinatorError, CoordinatorResult};

/// Coordinates instance lifecycle between the broker state and the cluster.
pub struct InstanceCoordinator<C> {
    /// Client for the remote cluster API.
    client: C,
    /// How long `create` waits for the completion signal.
    create_timeout: Duration,
    /// Guards the load → mutate → save span of every operation.
    state_lock: RwLock<()>,
}

impl<C: ProvisioningClient> InstanceCoordinator<C> {
    /// Create a new coordinator.
    pub fn new(client: C, config: &CoordinatorConfig) -> Self {
        Self {
            client,
            create_timeout: config.create_timeout(),
            state_lock: RwLock::new(()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn create_timeout(&self) -> Duration {
        self.create_timeout
    }

    /// Provision a database for a new instance and record it.
    ///
    /// Fails with `InstanceExists` if the ID is already recorded. If the
    /// cluster does not report completion within the configured timeout the
    /// call fails with `CreateDatabaseTimeoutExpired`, leaves the state
    /// untouched, and drops the completion receiver. The cluster may still
    /// finish the database later; [`orphaned_databases`](Self::orphaned_databases)
    /// finds such leftovers.
    pub async fn create<P>(
        &self,
        instance_id: &str,
        settings: Settings,
        store: &P,
    ) -> CoordinatorResult<()>
    where
        P: StatePersister + ?Sized,
    {
        let _guard = self.state_lock.write().await;

        info!(%instance_id, "loading the broker state");
        let mut state = load_state(store)?;

        if state.contains(instance_id) {
            warn!(%instance_id, "received a request to create an instance that already exists");
            return Err(CoordinatorError::InstanceExists(instance_id.to_string()));
        }

        info!(%instance_id, "creating a database");
        let credentials = self.create_database(instance_id, settings).await?;

        state
            .available_instances
            .push(InstanceRecord::new(instance_id, credentials));

        info!(%instance_id, "saving the broker state");
        save_state(store, &state)?;

        info!(%instance_id, instances = state.len(), "instance created");
        Ok(())
    }

    /// Forward new parameters to the database backing an instance.
    pub async fn update<P>(
        &self,
        instance_id: &str,
        params: Settings,
        store: &P,
    ) -> CoordinatorResult<()>
    where
        P: StatePersister + ?Sized,
    {
        let _guard = self.state_lock.read().await;

        let state = load_state(store)?;
        let uid = state
            .find(instance_id)
            .map(InstanceRecord::uid)
            .ok_or_else(|| CoordinatorError::InstanceDoesNotExist(instance_id.to_string()))?;

        self.client.update_database(uid, params).await?;
        info!(%instance_id, uid, "instance updated");
        Ok(())
    }

    /// Delete the database backing an instance and drop its record.
    ///
    /// If the cluster refuses the delete, the record stays in place.
    pub async fn destroy<P>(&self, instance_id: &str, store: &P) -> CoordinatorResult<()>
    where
        P: StatePersister + ?Sized,
    {
        let _guard = self.state_lock.write().await;

        let state = load_state(store)?;
        let (removed, remaining): (Vec<_>, Vec<_>) = state
            .available_instances
            .into_iter()
            .partition(|record| record.id == instance_id);

        if removed.is_empty() {
            warn!(%instance_id, "received a request to destroy an instance that does not exist");
            return Err(CoordinatorError::InstanceDoesNotExist(instance_id.to_string()));
        }

        // More than one match only happens with a store that let duplicates
        // in. A failure part way leaves earlier databases deleted while the
        // state still records them.
        let mut deleted = Vec::with_capacity(removed.len());
        for record in &removed {
            if let Err(e) = self.client.delete_database(record.uid()).await {
                error!(
                    %instance_id,
                    uid = record.uid(),
                    ?deleted,
                    error = %e,
                    "failed to delete the database"
                );
                return Err(e.into());
            }
            deleted.push(record.uid());
        }

        let state = BrokerState::new(remaining);
        save_state(store, &state)?;

        info!(%instance_id, instances = state.len(), "instance destroyed");
        Ok(())
    }

    /// Whether an instance with this ID is recorded.
    pub async fn exists<P>(&self, instance_id: &str, store: &P) -> CoordinatorResult<bool>
    where
        P: StatePersister + ?Sized,
    {
        let _guard = self.state_lock.read().await;
        let state = load_state(store)?;
        Ok(state.contains(instance_id))
    }

    /// Always reports that the instance does not exist.
    #[deprecated(note = "does not consult the broker state; use `exists`")]
    pub async fn exists_unchecked<P>(&self, _instance_id: &str, _store: &P) -> CoordinatorResult<bool>
    where
        P: StatePersister + ?Sized,
    {
        Ok(false)
    }

    /// Cluster databases that no recorded instance refers to.
    ///
    /// These are typically left behind by creations that timed out. The
    /// coordinator reports them and leaves the cleanup to the caller.
    pub async fn orphaned_databases<P>(&self, store: &P) -> CoordinatorResult<Vec<DatabaseUid>>
    where
        P: StatePersister + ?Sized,
    {
        let _guard = self.state_lock.read().await;

        let on_cluster = self.client.list_databases().await?;
        let known = load_state(store)?.uids();

        let orphaned: Vec<_> = on_cluster
            .into_iter()
            .filter(|uid| !known.contains(uid))
            .collect();
        if !orphaned.is_empty() {
            warn!(count = orphaned.len(), ?orphaned, "found databases missing from the broker state");
        }
        Ok(orphaned)
    }

    // ── Internal helpers ────────────────────────────────────────────

    /// Start a creation on the cluster and wait for its completion signal.
    async fn create_database(
        &self,
        instance_id: &str,
        settings: Settings,
    ) -> CoordinatorResult<Credentials> {
        let completion = self.client.create_database(settings).await?;

        match tokio::time::timeout(self.create_timeout, completion).await {
            Ok(Ok(credentials)) => {
                debug!(%instance_id, uid = credentials.uid, "database ready");
                Ok(credentials)
            }
            Ok(Err(_)) => {
                error!(%instance_id, "cluster dropped the completion signal");
                Err(CoordinatorError::ProvisioningAbandoned(
                    instance_id.to_string(),
                ))
            }
            Err(_) => {
                error!(
                    %instance_id,
                    timeout = ?self.create_timeout,
                    "waiting for the database timed out; it may still appear on the cluster"
                );
                Err(CoordinatorError::CreateDatabaseTimeoutExpired {
                    instance_id: instance_id.to_string(),
                    timeout: self.create_timeout,
                })
            }
        }
    }
}

fn load_state<P: StatePersister + ?Sized>(store: &P) -> CoordinatorResult<BrokerState> {
    store.load().map_err(|e| {
        error!(error = %e, "failed to load the broker state");
        CoordinatorError::FailedToLoadState(e)
    })
}

fn save_state<P: StatePersister + ?Sized>(store: &P, state: &BrokerState) -> CoordinatorResult<()> {
    store.save(state).map_err(|e| {
        error!(error = %e, "failed to save the broker state");
        CoordinatorError::FailedToSaveState(e)
    })
}
