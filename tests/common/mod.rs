//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_server;

use packlist::model::{Library, WeightUnit};
use packlist::persistence::{
    LocalStore, MemorySession, MemoryStore, RemoteApi, RemoteError, SignInResponse,
};
use packlist::store::{Edit, Mutation, Store};
use packlist::sync::{SyncEngine, SyncSettings};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const LOCAL_KEY: &str = "library";

/// Write `content` as `config.toml` inside a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Let spawned tasks run without moving the clock.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Move the paused clock forward and let woken tasks run.
pub async fn advance_ms(ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
    settle().await;
}

// -- Remote mock --------------------------------------------------------------

/// In-process [`RemoteApi`] recording every save.
#[derive(Clone, Default)]
pub struct MockRemote {
    saves: Arc<Mutex<Vec<String>>>,
    save_results: Arc<Mutex<VecDeque<Result<(), RemoteError>>>>,
    sign_in_result: Arc<Mutex<Option<Result<SignInResponse, RemoteError>>>>,
    save_delay: Arc<Mutex<Duration>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign-in succeeds with `library` for `username`.
    pub fn with_account(username: &str, library: &Library) -> Self {
        let remote = Self::new();
        *remote.sign_in_result.lock() = Some(Ok(SignInResponse {
            library: library.save().unwrap(),
            username: username.to_string(),
        }));
        remote
    }

    pub fn fail_sign_in(&self, err: RemoteError) {
        *self.sign_in_result.lock() = Some(Err(err));
    }

    /// Result for the next save. Unqueued saves succeed.
    pub fn enqueue_save_result(&self, result: Result<(), RemoteError>) {
        self.save_results.lock().push_back(result);
    }

    pub fn set_save_delay(&self, delay: Duration) {
        *self.save_delay.lock() = delay;
    }

    pub fn saves(&self) -> Vec<String> {
        self.saves.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().len()
    }
}

impl RemoteApi for MockRemote {
    async fn sign_in(&self) -> Result<SignInResponse, RemoteError> {
        self.sign_in_result.lock().clone().unwrap_or_else(|| {
            Err(RemoteError::Unauthorized {
                message: "Please log in.".to_string(),
            })
        })
    }

    async fn save_library(&self, data: String) -> Result<(), RemoteError> {
        self.saves.lock().push(data);
        let delay = *self.save_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.save_results.lock().pop_front().unwrap_or(Ok(()))
    }
}

pub fn server_error(message: &str) -> RemoteError {
    RemoteError::Other {
        status: Some(500),
        message: message.to_string(),
    }
}

pub fn unauthorized(message: &str) -> RemoteError {
    RemoteError::Unauthorized {
        message: message.to_string(),
    }
}

// -- Composite builders -------------------------------------------------------

/// A library with one seeded list.
pub fn sample_library() -> Library {
    let mut library = Library::new();
    library.new_list();
    library
}

pub struct Harness {
    pub store: Store,
    pub engine: SyncEngine<MockRemote>,
    pub remote: MockRemote,
    pub local: Arc<MemoryStore>,
    pub session: Arc<MemorySession>,
}

impl Harness {
    pub fn new(local: MemoryStore, session_token: Option<&str>, remote: MockRemote) -> Self {
        let local = Arc::new(local);
        let session = Arc::new(MemorySession::new(session_token));
        let engine = SyncEngine::new(
            SyncSettings::default(),
            local.clone(),
            session.clone(),
            remote.clone(),
        );
        let mut store = Store::new();
        store.subscribe(Arc::new(engine.clone()));
        Self {
            store,
            engine,
            remote,
            local,
            session,
        }
    }

    /// Signed in, library loaded from the mock server.
    pub async fn remote() -> Self {
        let remote = MockRemote::with_account("alice", &sample_library());
        let mut harness = Self::new(MemoryStore::new(), Some("token"), remote);
        harness.init().await;
        harness
    }

    /// Library loaded from local storage.
    pub async fn local() -> Self {
        let data = sample_library().save().unwrap();
        let mut harness = Self::new(
            MemoryStore::with_entry(LOCAL_KEY, &data),
            None,
            MockRemote::new(),
        );
        harness.init().await;
        harness
    }

    pub async fn init(&mut self) {
        self.engine.init(&mut self.store).await.unwrap();
    }

    pub fn library(&self) -> &Library {
        self.store.library().expect("no library loaded")
    }

    pub fn snapshot(&self) -> String {
        self.library().save().unwrap()
    }

    pub fn default_list(&self) -> uuid::Uuid {
        self.library().default_list_id().unwrap()
    }

    /// Issue a persisting edit that always changes the snapshot.
    pub fn edit(&mut self, name: &str) {
        let list_id = self.default_list();
        self.store
            .dispatch(Edit::UpdateListName {
                list_id,
                name: name.to_string(),
            })
            .unwrap();
    }
}
