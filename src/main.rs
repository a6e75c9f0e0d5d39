use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::sync::broadcast;

use packlist::cli::{self, Cli, Command};
use packlist::config::Config;
use packlist::persistence::{FileSession, FileStore, HttpRemote};
use packlist::store::Store;
use packlist::sync::{SyncEngine, SyncEvent, SyncSettings, SyncStatus};

type Engine = SyncEngine<HttpRemote>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    packlist::init_tracing("info");

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load config")?;

    let data_dir = config.data_dir();
    let local = Arc::new(FileStore::open(data_dir.clone())?);
    let session = Arc::new(FileSession::new(data_dir.join("session")));
    if let Command::Login { token } = &cli.command {
        session.store(token)?;
    }
    let remote = HttpRemote::new(&config.remote, session.clone())?;
    let engine = SyncEngine::new(SyncSettings::from(&config.sync), local, session, remote);
    let mut events = engine.subscribe_events();

    let mut store = Store::new();
    store.subscribe(Arc::new(engine.clone()));

    if let Command::Signout = cli.command {
        engine.sign_out(&mut store)?;
        println!("Signed out");
        return Ok(());
    }

    let status = engine.init(&mut store).await?;
    drain_events(&engine, &mut store, &mut events)?;
    tracing::debug!(?status, "Initialized");

    match &cli.command {
        Command::Login { .. } => match store.logged_in() {
            Some(username) => println!("Signed in as {username}"),
            None => bail!("sign-in failed"),
        },
        Command::Status => print_status(&engine, &store),
        command => {
            if store.library().is_none() {
                engine.start_local(&mut store)?;
                let empty = store.library().map_or(true, |l| l.lists().is_empty());
                if empty && !command.edits() {
                    bail!("no library yet; create one with `new-list` or `import`");
                }
            }
            let output = cli::execute(&mut store, command)?;
            print!("{output}");
        }
    }

    let flushed = engine.flush().await;
    drain_events(&engine, &mut store, &mut events)?;
    flushed?;
    Ok(())
}

/// Report queued engine events; an expired session signs out.
fn drain_events(
    engine: &Engine,
    store: &mut Store,
    events: &mut broadcast::Receiver<SyncEvent>,
) -> Result<()> {
    while let Ok(event) = events.try_recv() {
        match event {
            SyncEvent::Saved { target } => tracing::debug!(?target, "Saved"),
            SyncEvent::SaveFailed { message } => eprintln!("Save failed: {message}"),
            SyncEvent::Unauthorized { message } => {
                eprintln!("{message}");
                engine.sign_out(store)?;
            }
        }
    }
    Ok(())
}

fn print_status(engine: &Engine, store: &Store) {
    let target = match engine.status() {
        SyncStatus::Uninitialized => "nothing loaded",
        SyncStatus::LocalOnly => "saved on this device",
        SyncStatus::RemoteSyncing => "synced to server",
        SyncStatus::RemotePending => "server save pending",
        SyncStatus::RemoteThrottledWait => "server save throttled",
    };
    match store.logged_in() {
        Some(username) => println!("{username}: {target}"),
        None => println!("{target}"),
    }
}
