//! Persistence collaborators used by the sync engine.
//!
//! - [`LocalStore`]: synchronous key-value storage on the device.
//! - [`SessionStore`]: the remote session marker.
//! - [`RemoteApi`]: the account server.

mod local;
mod remote;
mod session;

use std::path::PathBuf;

use thiserror::Error;

pub use local::{is_valid_key, FileStore, LocalStore, MemoryStore};
pub use remote::{HttpRemote, RemoteApi, RemoteError, SignInResponse};
pub use session::{FileSession, MemorySession, SessionStore};

/// Errors raised by local storage and the session marker.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}
