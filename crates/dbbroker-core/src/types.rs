//! Domain types for the broker state.
//!
//! These types describe what the broker believes exists on the remote
//! cluster. All of them serialize to/from JSON so any persister can store
//! them verbatim.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Externally assigned identifier of a service instance.
pub type InstanceId = String;

/// Cluster-assigned identifier of a provisioned database.
pub type DatabaseUid = u64;

/// Free-form provisioning settings or update parameters.
///
/// Opaque to the broker and forwarded verbatim to the cluster.
pub type Settings = HashMap<String, serde_json::Value>;

// ── Credentials ───────────────────────────────────────────────────

/// Connection details for a database, as reported by the cluster once
/// provisioning completes.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Credentials {
    /// Cluster-side database identifier, used for update/delete calls.
    pub uid: DatabaseUid,
    #[serde(default)]
    pub port: u16,
    /// Endpoint addresses the database is reachable on.
    #[serde(default)]
    pub ip_list: Vec<String>,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    /// Credentials carrying only a cluster UID.
    pub fn with_uid(uid: DatabaseUid) -> Self {
        Self {
            uid,
            ..Self::default()
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("uid", &self.uid)
            .field("port", &self.port)
            .field("ip_list", &self.ip_list)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ── Instances ─────────────────────────────────────────────────────

/// A service instance the broker has provisioned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceRecord {
    pub id: InstanceId,
    pub credentials: Credentials,
}

impl InstanceRecord {
    pub fn new(id: impl Into<InstanceId>, credentials: Credentials) -> Self {
        Self {
            id: id.into(),
            credentials,
        }
    }

    /// The cluster UID backing this instance.
    pub fn uid(&self) -> DatabaseUid {
        self.credentials.uid
    }
}

/// The registry of every instance the broker believes exists.
///
/// Records keep insertion order. Instance IDs are unique; persisters
/// check [`BrokerState::duplicate_id`] before writing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BrokerState {
    #[serde(default)]
    pub available_instances: Vec<InstanceRecord>,
}

impl BrokerState {
    pub fn new(available_instances: Vec<InstanceRecord>) -> Self {
        Self {
            available_instances,
        }
    }

    /// Look up a record by instance ID.
    pub fn find(&self, instance_id: &str) -> Option<&InstanceRecord> {
        self.available_instances
            .iter()
            .find(|record| record.id == instance_id)
    }

    pub fn contains(&self, instance_id: &str) -> bool {
        self.find(instance_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.available_instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available_instances.is_empty()
    }

    /// Cluster UIDs referenced by any record.
    pub fn uids(&self) -> HashSet<DatabaseUid> {
        self.available_instances.iter().map(InstanceRecord::uid).collect()
    }

    /// First instance ID that appears more than once, if any.
    pub fn duplicate_id(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.available_instances
            .iter()
            .find(|record| !seen.insert(record.id.as_str()))
            .map(|record| record.id.as_str())
    }
}
