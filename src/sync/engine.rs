//! Save synchronization.
//!
//! The engine subscribes to the store and turns every persisting mutation
//! into at most one write:
//!
//! - identical snapshots are skipped;
//! - local targets are written synchronously;
//! - remote targets get one write per throttle window. Inside the window a
//!   single trailing write is scheduled and carries whatever snapshot is
//!   latest when it fires.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::state::{SaveDecision, SaveTarget, SyncError, SyncEvent, SyncSettings, SyncStatus};
use crate::model::Library;
use crate::persistence::{LocalStore, RemoteApi, RemoteError, SessionStore};
use crate::store::{Mutation, MutationEvent, Store, Subscriber};

const EVENT_CAPACITY: usize = 32;

/// Sync engine handle. Cheap to clone; clones share state.
pub struct SyncEngine<R: RemoteApi> {
    inner: Arc<EngineInner<R>>,
}

impl<R: RemoteApi> Clone for SyncEngine<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct EngineInner<R> {
    settings: SyncSettings,
    local: Arc<dyn LocalStore>,
    session: Arc<dyn SessionStore>,
    remote: R,
    events: broadcast::Sender<SyncEvent>,
    state: Mutex<SyncState>,
}

struct PendingWrite {
    id: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct SyncState {
    target: Option<SaveTarget>,
    /// Snapshot most recently written (or being written).
    last_saved: Option<String>,
    /// Snapshot of the most recent persisting mutation.
    latest: Option<String>,
    /// When the last remote write started.
    last_write: Option<Instant>,
    pending: Option<PendingWrite>,
    next_timer_id: u64,
    in_flight: Vec<JoinHandle<()>>,
    /// Bumped on sign-out; outcomes of older writes are dropped.
    epoch: u64,
}

impl SyncState {
    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }

    /// Record `data` as being written remotely now.
    fn begin_remote_write(&mut self, data: &str) -> u64 {
        self.last_write = Some(Instant::now());
        self.last_saved = Some(data.to_string());
        self.epoch
    }
}

impl<R: RemoteApi> SyncEngine<R> {
    pub fn new(
        settings: SyncSettings,
        local: Arc<dyn LocalStore>,
        session: Arc<dyn SessionStore>,
        remote: R,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(EngineInner {
                settings,
                local,
                session,
                remote,
                events,
                state: Mutex::new(SyncState::default()),
            }),
        }
    }

    /// Receive engine events from now on.
    pub fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.events.subscribe()
    }

    pub fn target(&self) -> Option<SaveTarget> {
        self.inner.state.lock().target
    }

    pub fn status(&self) -> SyncStatus {
        let state = self.inner.state.lock();
        match state.target {
            None => SyncStatus::Uninitialized,
            Some(SaveTarget::Local) => SyncStatus::LocalOnly,
            Some(SaveTarget::Remote) => {
                if state.pending.is_some() {
                    SyncStatus::RemotePending
                } else if state
                    .last_write
                    .is_some_and(|t| t.elapsed() < self.inner.settings.throttle)
                {
                    SyncStatus::RemoteThrottledWait
                } else {
                    SyncStatus::RemoteSyncing
                }
            }
        }
    }

    /// Load the initial library.
    ///
    /// With a session marker the library comes from the server; otherwise
    /// from local storage; otherwise the store is left empty and signed out.
    /// A rejected session broadcasts [`SyncEvent::Unauthorized`] and leaves
    /// the engine uninitialized.
    pub async fn init(&self, store: &mut Store) -> Result<SyncStatus, SyncError> {
        if self.inner.session.has_session() {
            match self.inner.remote.sign_in().await {
                Ok(response) => {
                    let library = Library::load(&response.library)?;
                    tracing::info!(username = %response.username, "Signed in, library loaded from server");
                    self.adopt(store, library, SaveTarget::Remote, Some(response.username))?;
                }
                Err(RemoteError::Unauthorized { message }) => {
                    tracing::warn!("Session rejected by server");
                    self.emit(SyncEvent::Unauthorized { message });
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load library from server");
                    return Err(e.into());
                }
            }
        } else if let Some(data) = self.inner.local.get(&self.inner.settings.local_key)? {
            let library = Library::load(&data)?;
            tracing::info!("Library loaded from local storage");
            self.adopt(store, library, SaveTarget::Local, None)?;
        } else {
            tracing::info!("No saved library, starting signed out");
            store.dispatch(Mutation::SetLoggedIn { username: None })?;
            store.dispatch(Mutation::ClearLibrary)?;
        }
        Ok(self.status())
    }

    /// Switch to saving on this device.
    ///
    /// A library already stored locally is loaded; an empty one is started
    /// only when nothing is stored.
    pub fn start_local(&self, store: &mut Store) -> Result<(), SyncError> {
        let library = match self.inner.local.get(&self.inner.settings.local_key)? {
            Some(data) => {
                tracing::info!("Resuming library from local storage");
                Library::load(&data)?
            }
            None => Library::new(),
        };
        self.adopt(store, library, SaveTarget::Local, None)
    }

    fn adopt(
        &self,
        store: &mut Store,
        library: Library,
        target: SaveTarget,
        username: Option<String>,
    ) -> Result<(), SyncError> {
        let baseline = library.save()?;
        store.dispatch(Mutation::LoadLibrary(Box::new(library)))?;
        store.dispatch(Mutation::SetLoggedIn { username })?;

        let mut state = self.inner.state.lock();
        state.cancel_pending();
        state.target = Some(target);
        state.latest = Some(baseline.clone());
        state.last_saved = Some(baseline);
        state.last_write = None;
        Ok(())
    }

    /// Clear the session marker and the in-memory library.
    ///
    /// A scheduled trailing write is cancelled. Writes already in flight are
    /// left alone but their outcome is ignored.
    pub fn sign_out(&self, store: &mut Store) -> Result<(), SyncError> {
        self.inner.session.clear()?;
        {
            let mut state = self.inner.state.lock();
            state.cancel_pending();
            state.epoch += 1;
            state.target = None;
            state.last_saved = None;
            state.latest = None;
            state.last_write = None;
        }
        store.dispatch(Mutation::SignOut)?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Decide whether and how to persist the result of one mutation.
    pub fn observe(&self, event: &MutationEvent<'_>) -> SaveDecision {
        if !event.persists {
            return SaveDecision::Ignored;
        }
        let Some(library) = event.library else {
            return SaveDecision::Ignored;
        };
        match library.save() {
            Ok(data) => self.persist(data),
            Err(e) => {
                tracing::error!(mutation = event.name, error = %e, "Failed to serialize library");
                SaveDecision::Failed
            }
        }
    }

    fn persist(&self, data: String) -> SaveDecision {
        let mut state = self.inner.state.lock();
        state.latest = Some(data.clone());

        if state.last_saved.as_deref() == Some(data.as_str()) {
            return SaveDecision::Unchanged;
        }

        match state.target {
            None => SaveDecision::NoTarget,
            Some(SaveTarget::Local) => {
                match self.inner.local.set(&self.inner.settings.local_key, &data) {
                    Ok(()) => {
                        state.last_saved = Some(data);
                        self.emit(SyncEvent::Saved {
                            target: SaveTarget::Local,
                        });
                        SaveDecision::WroteLocal
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to write library locally");
                        self.emit(SyncEvent::SaveFailed {
                            message: e.to_string(),
                        });
                        SaveDecision::Failed
                    }
                }
            }
            Some(SaveTarget::Remote) => {
                let window_open = state
                    .last_write
                    .map_or(true, |last| last.elapsed() >= self.inner.settings.throttle);

                if window_open {
                    state.cancel_pending();
                    let epoch = state.begin_remote_write(&data);
                    let engine = self.clone();
                    let handle = tokio::spawn(async move { engine.send(data, epoch).await });
                    state.in_flight.retain(|h| !h.is_finished());
                    state.in_flight.push(handle);
                    SaveDecision::SentRemote
                } else if state.pending.is_some() {
                    SaveDecision::Coalesced
                } else {
                    let id = state.next_timer_id;
                    state.next_timer_id += 1;
                    let engine = self.clone();
                    let delay = self.inner.settings.deferred_delay;
                    let handle = tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        engine.fire_deferred(id).await;
                    });
                    state.pending = Some(PendingWrite { id, handle });
                    tracing::debug!(delay_ms = delay.as_millis() as u64, "Remote save deferred");
                    SaveDecision::Deferred
                }
            }
        }
    }

    async fn fire_deferred(&self, timer_id: u64) {
        let (data, epoch) = {
            let mut state = self.inner.state.lock();
            if state.pending.as_ref().map(|p| p.id) != Some(timer_id) {
                return;
            }
            // Detach our own handle; dropping it does not cancel this task.
            state.pending = None;
            if state.target != Some(SaveTarget::Remote) {
                return;
            }
            let Some(latest) = state.latest.clone() else {
                return;
            };
            if state.last_saved.as_ref() == Some(&latest) {
                return;
            }
            let epoch = state.begin_remote_write(&latest);
            (latest, epoch)
        };
        self.send(data, epoch).await;
    }

    async fn send(&self, data: String, epoch: u64) {
        let result = self.inner.remote.save_library(data.clone()).await;

        let mut state = self.inner.state.lock();
        if state.epoch != epoch {
            tracing::debug!("Ignoring save outcome from a previous session");
            return;
        }
        match result {
            Ok(()) => {
                drop(state);
                tracing::info!(bytes = data.len(), "Library saved to server");
                self.emit(SyncEvent::Saved {
                    target: SaveTarget::Remote,
                });
            }
            Err(err) => {
                // Let the next mutation retry this snapshot.
                if state.last_saved.as_deref() == Some(data.as_str()) {
                    state.last_saved = None;
                }
                drop(state);
                self.report_remote_failure(err);
            }
        }
    }

    fn report_remote_failure(&self, err: RemoteError) {
        match err {
            RemoteError::Unauthorized { message } => {
                tracing::warn!(message = %message, "Save rejected, session expired");
                self.emit(SyncEvent::Unauthorized { message });
            }
            RemoteError::Other { status, message } => {
                tracing::error!(status = ?status, message = %message, "Save failed");
                self.emit(SyncEvent::SaveFailed { message });
            }
        }
    }

    /// Write out anything not yet saved, now.
    ///
    /// Waits for in-flight remote writes, cancels the trailing timer and
    /// sends the latest snapshot if it differs from the last saved one.
    pub async fn flush(&self) -> Result<(), SyncError> {
        let in_flight = std::mem::take(&mut self.inner.state.lock().in_flight);
        for handle in in_flight {
            let _ = handle.await;
        }

        let (data, epoch) = {
            let mut state = self.inner.state.lock();
            state.cancel_pending();
            if state.target != Some(SaveTarget::Remote) {
                return Ok(());
            }
            let Some(latest) = state.latest.clone() else {
                return Ok(());
            };
            if state.last_saved.as_ref() == Some(&latest) {
                return Ok(());
            }
            let epoch = state.begin_remote_write(&latest);
            (latest, epoch)
        };

        match self.inner.remote.save_library(data.clone()).await {
            Ok(()) => {
                tracing::info!(bytes = data.len(), "Library flushed to server");
                Ok(())
            }
            Err(err) => {
                let mut state = self.inner.state.lock();
                if state.epoch == epoch && state.last_saved.as_deref() == Some(data.as_str()) {
                    state.last_saved = None;
                }
                Err(err.into())
            }
        }
    }

    fn emit(&self, event: SyncEvent) {
        // No receivers is fine.
        let _ = self.inner.events.send(event);
    }
}

impl<R: RemoteApi> Subscriber for SyncEngine<R> {
    fn on_mutation(&self, event: &MutationEvent<'_>) {
        let decision = self.observe(event);
        tracing::debug!(mutation = event.name, decision = ?decision, "Save decision");
    }
}
