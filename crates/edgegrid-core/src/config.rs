//! edgegrid.toml configuration parser.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Origin tag stamped on peer notifications from this replica.
    pub replica_id: String,
    pub store: StoreConfig,
    pub notify: NotifyConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
    /// Deadline applied to every single-key store call.
    pub timeout_ms: u64,
    /// Deadline applied to the startup scan of each entity type.
    pub init_timeout_ms: u64,
    /// Objects read per store call during a scan.
    pub scan_page: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Broadcast buffer length per channel.
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub listen: SocketAddr,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            replica_id: "controller-0".to_string(),
            store: StoreConfig::default(),
            notify: NotifyConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/var/lib/edgegrid/edgegrid.redb"),
            timeout_ms: 3_000,
            init_timeout_ms: 10_000,
            scan_page: 256,
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8443)),
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn init_timeout(&self) -> Duration {
        Duration::from_millis(self.init_timeout_ms)
    }
}

impl GridConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GridConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
