// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod watch;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::validate::compile_excludes;
use crate::engine::{Engine, EngineEvent};
use crate::watch::TreeWatcher;

/// Buffer for the merged engine event stream. While a rebuild is in
/// progress, incoming filesystem events queue up here instead of being
/// processed concurrently.
const EVENT_BUFFER: usize = 1024;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI flags over optional `Hotswap.toml`)
/// - the recursive directory watcher (sync setup before anything runs)
/// - the engine event loop
/// - Ctrl-C handling
///
/// Errors returned from here are fatal startup errors; everything after
/// startup is handled inside the engine loop.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = config::resolve(&args)?;
    info!(root = ?cfg.root, program = %cfg.program, "starting hotswap");

    let (event_tx, event_rx) = mpsc::channel::<EngineEvent>(EVENT_BUFFER);

    // Watcher creation is the one piece of machinery nothing can work
    // without; failure here aborts startup.
    let excludes = compile_excludes(&cfg.exclude)?;
    let mut watcher = TreeWatcher::new(cfg.root.clone(), excludes, event_tx.clone())?;
    let registered = watcher.watch_tree(cfg.root.clone());
    info!(directories = registered, "watch registration complete");

    // Ctrl-C → shutdown event → exit code 0.
    {
        let tx = event_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(EngineEvent::Shutdown).await;
        });
    }

    // The main task parks here; the engine's worker drains the merged event
    // stream until shutdown.
    let engine = Engine::new(cfg, watcher, event_rx);
    engine.run().await
}
