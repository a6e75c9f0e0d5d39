use std::time::Duration;

use thiserror::Error;

use crate::config::SyncConfig;
use crate::model::ModelError;
use crate::persistence::{RemoteError, StorageError};

/// Where snapshots are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Local,
    Remote,
}

/// Observable engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing loaded yet, or signed out: no save target.
    Uninitialized,
    /// Snapshots go to device storage.
    LocalOnly,
    /// Remote target, nothing scheduled and the throttle window is open.
    RemoteSyncing,
    /// A trailing remote write is scheduled but not yet sent.
    RemotePending,
    /// A remote write went out less than one throttle window ago.
    RemoteThrottledWait,
}

/// What the engine did with one mutation notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveDecision {
    /// Non-persisting mutation, or no library loaded.
    Ignored,
    /// Snapshot identical to the last saved one.
    Unchanged,
    /// No save target chosen yet.
    NoTarget,
    WroteLocal,
    /// Remote write started immediately.
    SentRemote,
    /// Trailing remote write scheduled.
    Deferred,
    /// A trailing write was already scheduled; it will carry this snapshot.
    Coalesced,
    Failed,
}

/// Signals broadcast to the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Saved { target: SaveTarget },
    /// A save failed; show `message` once. No automatic retry.
    SaveFailed { message: String },
    /// The remote session is no longer valid; force a sign-out.
    Unauthorized { message: String },
}

/// Timing and storage key of the engine.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub throttle: Duration,
    pub deferred_delay: Duration,
    pub local_key: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from(&SyncConfig::default())
    }
}

impl From<&SyncConfig> for SyncSettings {
    fn from(config: &SyncConfig) -> Self {
        Self {
            throttle: config.throttle(),
            deferred_delay: config.deferred_delay(),
            local_key: config.local_key.clone(),
        }
    }
}

/// Errors surfaced by engine entry points.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}
