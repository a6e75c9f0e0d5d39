mod engine;
mod state;

pub use engine::SyncEngine;
pub use state::{SaveDecision, SaveTarget, SyncError, SyncEvent, SyncSettings, SyncStatus};
