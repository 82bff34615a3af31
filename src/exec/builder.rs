// src/exec/builder.rs

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::config::{ArtifactPaths, Config};
use crate::errors::{HotswapError, Result};

/// Remove a leftover temporary artifact from a previous failed or
/// interrupted build, so a stale binary can never be mistaken for a fresh
/// one. Called by the engine before every build.
pub fn remove_stale_artifact(paths: &ArtifactPaths, verbose: bool) {
    if paths.tmp.exists() {
        if verbose {
            info!(path = ?paths.tmp, "cleaning residue from previous build");
        }
        if let Err(err) = std::fs::remove_file(&paths.tmp) {
            tracing::warn!(path = ?paths.tmp, error = %err, "failed to remove stale artifact");
        }
    }
}

/// Invoke the external toolchain as `<build_cmd> build -o <tmp> [flags...]
/// <source>`, blocking until it exits.
///
/// The subprocess inherits our stdout/stderr so compiler diagnostics land in
/// the developer's console unmodified.
///
/// Errors if the subprocess exits non-zero, or if no artifact exists at the
/// temporary path afterward (a toolchain can report success and still produce
/// nothing, e.g. on a no-op build).
pub async fn compile(config: &Config, paths: &ArtifactPaths) -> Result<()> {
    let mut cmd = Command::new(&config.build_cmd);
    cmd.arg("build")
        .arg("-o")
        .arg(&paths.tmp)
        .args(&config.build_flags)
        .arg(&config.source)
        .current_dir(&config.root)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    debug!(
        cmd = %config.build_cmd,
        flags = ?config.build_flags,
        out = ?paths.tmp,
        "invoking build toolchain"
    );

    let status = cmd.status().await?;
    if !status.success() {
        return Err(HotswapError::BuildFailed(status.code().unwrap_or(-1)));
    }

    if !paths.tmp.exists() {
        return Err(HotswapError::MissingArtifact(paths.tmp.clone()));
    }

    if config.verbose {
        info!(artifact = ?paths.tmp, "build OK");
    }
    Ok(())
}
