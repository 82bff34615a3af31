// src/watch/watcher.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use globset::GlobSet;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::EngineEvent;

/// Recursive directory registration on top of a non-recursive `notify`
/// watcher.
///
/// `notify` is used in non-recursive mode on purpose: the engine has to know
/// which directories are registered so it can register newly created ones
/// from the event loop. The registration set only grows during a session;
/// deleted directories are never unregistered and their watches simply go
/// inert.
///
/// Owned by the engine's event-loop worker; the registration set is only ever
/// touched from there, so no synchronization is needed.
pub struct TreeWatcher {
    inner: RecommendedWatcher,
    root: PathBuf,
    registered: HashSet<PathBuf>,
    excludes: GlobSet,
}

impl std::fmt::Debug for TreeWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWatcher")
            .field("root", &self.root)
            .field("registered", &self.registered.len())
            .finish()
    }
}

impl TreeWatcher {
    /// Create the underlying OS watcher and wire its callback into the
    /// engine's event channel.
    ///
    /// Failure here is fatal to the caller: without a notification facility
    /// the whole tool is inoperable.
    pub fn new(
        root: impl Into<PathBuf>,
        excludes: GlobSet,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Result<Self> {
        let root = root.into();

        // Closure called synchronously by notify whenever an event arrives.
        // `try_send` keeps it non-blocking; while a rebuild is in progress
        // events queue up in the channel's buffer instead.
        let inner = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| {
                let event = match res {
                    Ok(event) => EngineEvent::Fs(event),
                    Err(err) => EngineEvent::WatchError(err),
                };
                if let Err(err) = event_tx.try_send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("hotswap: dropping filesystem event: {err}");
                }
            },
            Config::default(),
        )?;

        Ok(Self {
            inner,
            root,
            registered: HashSet::new(),
            excludes,
        })
    }

    /// Register `dir` and every directory reachable from it, depth-first via
    /// an explicit worklist (directory trees are acyclic, but very deep trees
    /// should not grow the call stack).
    ///
    /// Returns how many directories were newly registered. Failing to watch
    /// or list a directory is logged and that subtree is skipped; this is a
    /// developer tool, not a production service.
    pub fn watch_tree(&mut self, dir: impl Into<PathBuf>) -> usize {
        let mut added = 0;
        let mut pending = vec![dir.into()];

        while let Some(dir) = pending.pop() {
            if self.registered.contains(&dir) || self.is_excluded(&dir) {
                continue;
            }

            if let Err(err) = self.inner.watch(&dir, RecursiveMode::NonRecursive) {
                warn!(path = ?dir, error = %err, "failed to watch directory; skipping subtree");
                continue;
            }
            debug!(path = ?dir, "watching directory");
            self.registered.insert(dir.clone());
            added += 1;

            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = ?dir, error = %err, "failed to list directory; skipping children");
                    continue;
                }
            };

            for entry in entries {
                match entry {
                    // file_type() does not follow symlinks, which also keeps
                    // the traversal acyclic.
                    Ok(entry) => match entry.file_type() {
                        Ok(ft) if ft.is_dir() => pending.push(entry.path()),
                        Ok(_) => {}
                        Err(err) => {
                            warn!(path = ?entry.path(), error = %err, "failed to stat directory entry")
                        }
                    },
                    Err(err) => warn!(path = ?dir, error = %err, "failed to read directory entry"),
                }
            }
        }

        added
    }

    /// Whether `path` matches one of the exclude globs, evaluated relative to
    /// the watch root.
    pub fn is_excluded(&self, path: &Path) -> bool {
        match relative_str(&self.root, path) {
            Some(rel) => self.excludes.is_match(&rel),
            None => false,
        }
    }

    pub fn is_watched(&self, dir: &Path) -> bool {
        self.registered.contains(dir)
    }

    pub fn watched_count(&self) -> usize {
        self.registered.len()
    }
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root` and cannot be relativized.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let s = rel.to_string_lossy().replace('\\', "/");
    Some(s)
}
