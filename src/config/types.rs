use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Save throttling and local storage key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Minimum spacing between remote writes in milliseconds (default: 5000).
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    /// Delay of the trailing write scheduled inside the throttle window
    /// in milliseconds (default: 5001).
    #[serde(default = "default_deferred_delay_ms")]
    pub deferred_delay_ms: u64,
    /// Key the library is stored under locally (default: "library").
    #[serde(default = "default_local_key")]
    pub local_key: String,
}

/// Account server connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the account server (e.g., "https://lighterpack.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Where local data lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<String>,
}

fn default_throttle_ms() -> u64 {
    5000
}

fn default_deferred_delay_ms() -> u64 {
    5001
}

fn default_local_key() -> String {
    "library".to_string()
}

fn default_base_url() -> String {
    "https://lighterpack.com".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

impl SyncConfig {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn deferred_delay(&self) -> Duration {
        Duration::from_millis(self.deferred_delay_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
            deferred_delay_ms: default_deferred_delay_ms(),
            local_key: default_local_key(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}
