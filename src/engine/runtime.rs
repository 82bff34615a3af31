// src/engine/runtime.rs

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use notify::event::{EventKind, ModifyKind};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::{ArtifactPaths, Config};
use crate::exec::{builder, Supervisor};
use crate::watch::{DebounceGate, TreeWatcher};

/// Events drained by the engine's single event-loop worker.
///
/// One inbound stream merges all producers:
/// - the notify callback sends `Fs` and `WatchError`
/// - the Ctrl-C handler sends `Shutdown`
#[derive(Debug)]
pub enum EngineEvent {
    Fs(notify::Event),
    WatchError(notify::Error),
    Shutdown,
}

/// The watch-debounce-rebuild-swap control loop.
///
/// Runs as one logical single-threaded reactor: the restart cycle (build,
/// kill old child, spawn new child) executes synchronously *inside* the
/// loop, so cycles serialize by construction and a rebuild in progress can
/// never race another rebuild. Events arriving during a cycle queue up in
/// the channel buffer.
pub struct Engine {
    config: Config,
    paths: ArtifactPaths,
    watcher: TreeWatcher,
    gate: DebounceGate,
    supervisor: Supervisor,
    events_rx: mpsc::Receiver<EngineEvent>,
}

impl Engine {
    /// `watcher` must already have the root tree registered; the engine only
    /// adds directories created after startup.
    pub fn new(
        config: Config,
        watcher: TreeWatcher,
        events_rx: mpsc::Receiver<EngineEvent>,
    ) -> Self {
        let paths = config.artifact_paths();
        let supervisor = Supervisor::new(config.kill_timeout);
        Self {
            config,
            paths,
            watcher,
            gate: DebounceGate::new(Instant::now()),
            supervisor,
            events_rx,
        }
    }

    /// Perform the initial build+run cycle, calibrate the debounce tolerance
    /// from its duration, then drain events until shutdown.
    ///
    /// Recoverable failures (watch errors, build errors, swap errors) never
    /// unwind past a loop iteration; the session keeps watching.
    pub async fn run(mut self) -> Result<()> {
        info!("hotswap engine started");

        let started = Instant::now();
        if let Err(err) = self.restart_cycle().await {
            error!(error = %err, "startup cycle failed; waiting for the next edit");
        }
        self.gate.calibrate(started.elapsed());
        info!(
            tolerance_secs = self.gate.tolerance().as_secs_f64(),
            "debounce tolerance set from first cycle"
        );

        while let Some(event) = self.events_rx.recv().await {
            match event {
                EngineEvent::Fs(event) => self.handle_fs_event(event).await,
                EngineEvent::WatchError(err) => {
                    warn!(error = %err, "filesystem watcher error")
                }
                EngineEvent::Shutdown => {
                    info!("shutdown requested, stopping engine");
                    break;
                }
            }
        }

        info!("hotswap engine exiting");
        Ok(())
    }

    async fn handle_fs_event(&mut self, event: notify::Event) {
        debug!(?event, "received notify event");

        match event.kind {
            EventKind::Create(_) => {
                for path in &event.paths {
                    self.register_if_dir(path);
                }
            }
            EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => {
                for path in &event.paths {
                    self.handle_write(path).await;
                }
            }
            _ => {}
        }
    }

    /// A create anywhere in the tree may be a new directory; register its
    /// subtree so files later added inside it are observed too.
    fn register_if_dir(&mut self, path: &Path) {
        if self.watcher.is_excluded(path) || !path.is_dir() {
            return;
        }
        let added = self.watcher.watch_tree(path);
        if added > 0 {
            debug!(path = ?path, added, "registered newly created directories");
        }
    }

    /// Debounce gate first, extension filter second: an accepted trigger for
    /// an unrecognized file still consumes the acceptance, exactly like a
    /// burst of artifact-churn writes would.
    async fn handle_write(&mut self, path: &Path) {
        if self.watcher.is_excluded(path) {
            return;
        }

        let now = Instant::now();
        if self.config.verbose {
            debug!(
                elapsed_secs = self.gate.elapsed_since_accepted(now).as_secs_f64(),
                path = ?path,
                "write event"
            );
        }

        if !self.gate.should_trigger(now) {
            return;
        }
        if !self.config.is_recognized_ext(path) {
            debug!(path = ?path, "unrecognized extension; not rebuilding");
            return;
        }

        info!(path = ?path, "change accepted; restarting");
        let started = Instant::now();
        match self.restart_cycle().await {
            Ok(()) => info!(
                took_secs = started.elapsed().as_secs_f64(),
                "restart cycle finished"
            ),
            Err(err) => {
                error!(error = %err, "restart cycle failed; watching continues")
            }
        }
    }

    /// Build into the temporary path, then hand over to the supervisor for
    /// the kill-rename-spawn sequence. A build failure aborts before the
    /// supervisor is touched, leaving the previous child running.
    async fn restart_cycle(&mut self) -> crate::errors::Result<()> {
        builder::remove_stale_artifact(&self.paths, self.config.verbose);
        builder::compile(&self.config, &self.paths).await?;
        self.supervisor.swap(&self.paths, &self.config).await?;
        Ok(())
    }
}
