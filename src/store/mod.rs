//! Mutation dispatcher.
//!
//! ```text
//! Mutation ──→ Reducer ──→ StoreState ──→ Subscribers (sync engine)
//! ```
//!
//! Each dispatch reduces a copy of the current state and commits it only
//! when the reducer succeeds, so subscribers never see a half-applied
//! mutation.

mod mutation;
mod reducer;

use std::sync::Arc;

pub use mutation::{Edit, Mutation};
pub use reducer::{apply, Reducer, StoreReducer, StoreState};

use crate::model::{Library, ModelError};

/// What subscribers are told after every committed mutation.
#[derive(Debug, Clone, Copy)]
pub struct MutationEvent<'a> {
    pub name: &'static str,
    pub persists: bool,
    /// The library after the mutation, if one is loaded.
    pub library: Option<&'a Library>,
}

/// Observer of committed mutations.
pub trait Subscriber: Send + Sync {
    fn on_mutation(&self, event: &MutationEvent<'_>);
}

/// Holds the application state and applies mutations in issue order.
#[derive(Default)]
pub struct Store {
    state: StoreState,
    subscribers: Vec<Arc<dyn Subscriber>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn library(&self) -> Option<&Library> {
        self.state.library.as_ref()
    }

    pub fn logged_in(&self) -> Option<&str> {
        self.state.logged_in.as_deref()
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn Subscriber>) {
        self.subscribers.push(subscriber);
    }

    /// Apply `mutation` and notify subscribers.
    ///
    /// # Errors
    /// Returns the reducer's error. State is unchanged on error and no
    /// subscriber is notified.
    pub fn dispatch(&mut self, mutation: impl Into<Mutation>) -> Result<(), ModelError> {
        let mutation = mutation.into();
        let name = mutation.name();
        let persists = mutation.persists();

        let next = match StoreReducer::reduce(self.state.clone(), mutation) {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(mutation = name, error = %e, "Mutation rejected");
                return Err(e);
            }
        };
        self.state = next;
        tracing::debug!(mutation = name, persists, "Mutation applied");

        let event = MutationEvent {
            name,
            persists,
            library: self.state.library.as_ref(),
        };
        for subscriber in &self.subscribers {
            subscriber.on_mutation(&event);
        }
        Ok(())
    }
}
