//! broker.toml configuration parser.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a create waits for the cluster when nothing is configured.
pub const DEFAULT_CREATE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokerConfig {
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
    #[serde(default)]
    pub state: StateConfig,
}

/// Settings for the instance coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Upper bound on waiting for a new database to finish provisioning.
    /// Fractional seconds are accepted.
    #[serde(
        rename = "create_timeout_secs",
        default = "default_create_timeout",
        with = "duration_secs"
    )]
    pub create_timeout: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateConfig {
    /// On-disk location of the broker state database.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("create timeout must be greater than zero")]
    ZeroCreateTimeout,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            create_timeout: DEFAULT_CREATE_TIMEOUT,
        }
    }
}

impl CoordinatorConfig {
    pub fn with_create_timeout(mut self, timeout: Duration) -> Self {
        self.create_timeout = timeout;
        self
    }

    pub fn create_timeout(&self) -> Duration {
        self.create_timeout
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.create_timeout.is_zero() {
            return Err(ConfigError::ZeroCreateTimeout);
        }
        Ok(())
    }
}

impl BrokerConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a configuration document.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: BrokerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.coordinator.validate()
    }
}

fn default_create_timeout() -> Duration {
    DEFAULT_CREATE_TIMEOUT
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        if value.subsec_nanos() == 0 {
            serializer.serialize_u64(value.as_secs())
        } else {
            serializer.serialize_f64(value.as_secs_f64())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
    }
}
