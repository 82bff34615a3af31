// src/config/model.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Extension recognized even when the user configures nothing.
///
/// User-supplied extensions are *added* to the set; the primary source
/// extension of the default toolchain is always present.
pub const DEFAULT_EXTENSION: &str = ".go";

/// Excludes applied to every session, before user-configured ones.
pub const DEFAULT_EXCLUDES: &[&str] = &[".git", ".git/**"];

/// Resolved runtime settings, immutable after construction.
///
/// Built once at startup by [`crate::config::resolve`] from CLI flags merged
/// over an optional `Hotswap.toml` merged over defaults. The engine and its
/// collaborators only ever read from this.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the watched tree (canonicalized).
    pub root: PathBuf,

    /// Recognized source extensions, each dot-prefixed (e.g. `".go"`).
    pub extensions: BTreeSet<String>,

    /// Build toolchain command (e.g. `go`).
    pub build_cmd: String,

    /// Flags passed through to the build command, in order, after
    /// `build -o <tmp>`.
    pub build_flags: Vec<String>,

    /// Source path handed to the build command as its final argument.
    pub source: String,

    /// Arguments passed to the rebuilt program when it is launched.
    pub run_args: Vec<String>,

    /// Program base name; the canonical executable is `<program><suffix>`.
    pub program: String,

    /// Platform executable suffix (empty on POSIX, `.exe` on Windows).
    pub exe_suffix: String,

    /// Glob patterns for paths excluded from watching, relative to `root`.
    pub exclude: Vec<String>,

    /// How long the supervisor waits for the old child to exit after killing
    /// it. `None` waits forever.
    pub kill_timeout: Option<Duration>,

    /// Verbose per-event diagnostics.
    pub verbose: bool,
}

impl Config {
    /// Temporary and canonical executable paths for this session.
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            tmp: self
                .root
                .join(format!("tmp_{}{}", self.program, self.exe_suffix)),
            canonical: self.root.join(format!("{}{}", self.program, self.exe_suffix)),
        }
    }

    /// Whether `path` carries one of the recognized source extensions.
    pub fn is_recognized_ext(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.contains(&format!(".{ext}")),
            None => false,
        }
    }
}

/// Where the build artifact lives during and after a restart cycle.
///
/// The builder writes to `tmp`; the supervisor renames `tmp` into `canonical`
/// (atomic on a same-filesystem rename) and launches `canonical`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub tmp: PathBuf,
    pub canonical: PathBuf,
}

/// Top-level configuration as read from a `Hotswap.toml` file.
///
/// ```toml
/// program = "server"
///
/// [watch]
/// ext = ["tmpl"]
/// exclude = ["vendor/**"]
///
/// [build]
/// command = "go"
/// flags = ["-tags", "dev"]
///
/// [run]
/// args = ["--port", "8080"]
/// kill_timeout = "5s"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    /// Program base name; defaults to the watch root's directory name.
    #[serde(default)]
    pub program: Option<String>,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub run: RunSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WatchSection {
    /// Directory to watch; defaults to the current working directory.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Extensions added to the built-in default set.
    #[serde(default)]
    pub ext: Vec<String>,

    /// Globs for paths excluded from watching.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BuildSection {
    /// Build toolchain command; defaults to `go`.
    #[serde(default)]
    pub command: Option<String>,

    /// Flags passed through to the build command.
    #[serde(default)]
    pub flags: Vec<String>,

    /// Source path handed to the build command; defaults to `.`.
    #[serde(default)]
    pub source: Option<String>,
}

/// `[run]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RunSection {
    /// Arguments for the launched program.
    #[serde(default)]
    pub args: Vec<String>,

    /// Duration string (e.g. `"5s"`), or `"none"` to wait forever.
    #[serde(default)]
    pub kill_timeout: Option<String>,
}

/// Normalize a user-supplied extension to its dot-prefixed form.
///
/// `"go"`, `".go"` and `" .go "` all become `".go"`. Returns `None` when
/// nothing is left after trimming.
pub fn normalize_ext(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!(".{trimmed}"))
    }
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}

/// Parse a kill-timeout value: a duration string, or `"none"` for an
/// unbounded wait.
pub fn parse_kill_timeout(s: &str) -> Result<Option<Duration>, String> {
    match s.trim().to_lowercase().as_str() {
        "none" | "off" => Ok(None),
        _ => parse_duration(s).map(Some),
    }
}
