//! Packing-list inventory with throttled save synchronization.
//!
//! A [`model::Library`] holds items, categories and lists. Every change goes
//! through [`store::Store::dispatch`]; the [`sync::SyncEngine`] observes the
//! store and writes snapshots to local storage or to an account server.

pub mod cli;
pub mod config;
pub mod import;
pub mod model;
pub mod ordering;
pub mod persistence;
pub mod store;
pub mod sync;

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` overrides `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}
