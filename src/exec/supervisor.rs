// src/exec/supervisor.rs

use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::{ArtifactPaths, Config};
use crate::errors::{HotswapError, Result};

/// Owns the lifecycle of the single running child process.
///
/// The child slot moves between three states: *Absent* (no child), *Running*
/// (a handle is held), and transiently *Terminating* while
/// [`Supervisor::terminate_current`] awaits the old child's exit. At most one
/// live handle exists at any time; the handle is mutated only from the
/// engine's event-loop worker.
#[derive(Debug)]
pub struct Supervisor {
    child: Option<Child>,
    kill_timeout: Option<Duration>,
}

impl Supervisor {
    /// `kill_timeout` bounds the wait for an old child to exit after being
    /// killed; `None` waits forever.
    pub fn new(kill_timeout: Option<Duration>) -> Self {
        Self {
            child: None,
            kill_timeout,
        }
    }

    /// Whether a child handle is currently held.
    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    /// OS pid of the current child, if one is running.
    pub fn child_id(&self) -> Option<u32> {
        self.child.as_ref().and_then(|c| c.id())
    }

    /// Terminate the current child, if any, and wait for it to exit.
    ///
    /// Best-effort throughout: a kill or wait failure is logged and the slot
    /// still moves to Absent, so a wedged or already-dead child can never
    /// block a swap. The wait is bounded by the configured kill timeout so
    /// it cannot wedge the event loop either.
    pub async fn terminate_current(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        info!(pid = ?child.id(), "terminating current child");
        if let Err(err) = child.start_kill() {
            warn!(error = %err, "failed to signal child; continuing");
        }

        match self.kill_timeout {
            Some(limit) => match timeout(limit, child.wait()).await {
                Ok(Ok(status)) => debug!(?status, "old child exited"),
                Ok(Err(err)) => warn!(error = %err, "failed waiting for old child"),
                Err(_) => {
                    // kill_on_drop delivers a second kill when the handle is
                    // dropped here.
                    warn!(timeout = ?limit, "old child did not exit in time; abandoning wait");
                }
            },
            None => match child.wait().await {
                Ok(status) => debug!(?status, "old child exited"),
                Err(err) => warn!(error = %err, "failed waiting for old child"),
            },
        }
    }

    /// Replace the running instance with the freshly built artifact.
    ///
    /// Terminates the old child, deletes any existing canonical executable,
    /// renames the temporary artifact into the canonical path (atomic on a
    /// same-filesystem rename), then spawns the new child and records its
    /// handle.
    ///
    /// On a delete/rename/spawn failure the swap is abandoned with the slot
    /// Absent; the next successful build self-heals.
    pub async fn swap(&mut self, paths: &ArtifactPaths, config: &Config) -> Result<()> {
        self.terminate_current().await;

        if paths.canonical.exists() {
            if config.verbose {
                info!(path = ?paths.canonical, "removing old executable");
            }
            std::fs::remove_file(&paths.canonical).map_err(|err| {
                HotswapError::Swap(format!(
                    "removing old executable {:?}: {err}",
                    paths.canonical
                ))
            })?;
        }

        std::fs::rename(&paths.tmp, &paths.canonical).map_err(|err| {
            HotswapError::Swap(format!(
                "renaming {:?} -> {:?}: {err}",
                paths.tmp, paths.canonical
            ))
        })?;

        let child = self.spawn_child(paths, config)?;
        info!(pid = ?child.id(), program = %config.program, "child started");
        self.child = Some(child);
        Ok(())
    }

    fn spawn_child(&self, paths: &ArtifactPaths, config: &Config) -> Result<Child> {
        let mut cmd = Command::new(&paths.canonical);
        cmd.args(&config.run_args)
            .current_dir(&config.root)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        cmd.spawn().map_err(|err| {
            HotswapError::Swap(format!("spawning {:?}: {err}", paths.canonical))
        })
    }
}
