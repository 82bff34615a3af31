// src/config/validate.rs

use anyhow::{anyhow, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::model::Config;

/// Run basic semantic validation against a resolved configuration.
///
/// This checks:
/// - the watch root is an existing directory
/// - there is at least one recognized extension, each dot-prefixed
/// - the program name is a plain file name (no separators)
/// - the build command and source path are non-empty
/// - all exclude globs compile
pub fn validate_config(cfg: &Config) -> Result<()> {
    ensure_root_is_dir(cfg)?;
    validate_extensions(cfg)?;
    validate_program(cfg)?;
    validate_build(cfg)?;
    compile_excludes(&cfg.exclude).map(|_| ())
}

/// Compile exclude patterns into a matcher.
///
/// Used both here (to reject bad globs at startup) and by the watcher.
pub fn compile_excludes(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .with_context(|| format!("invalid exclude glob {:?}", pattern))?;
        builder.add(glob);
    }
    builder.build().context("compiling exclude globs")
}

fn ensure_root_is_dir(cfg: &Config) -> Result<()> {
    if !cfg.root.is_dir() {
        return Err(anyhow!("watch root {:?} is not a directory", cfg.root));
    }
    Ok(())
}

fn validate_extensions(cfg: &Config) -> Result<()> {
    if cfg.extensions.is_empty() {
        return Err(anyhow!("at least one recognized extension is required"));
    }
    for ext in &cfg.extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(anyhow!(
                "extension {:?} must be dot-prefixed and non-empty",
                ext
            ));
        }
    }
    Ok(())
}

fn validate_program(cfg: &Config) -> Result<()> {
    if cfg.program.is_empty() {
        return Err(anyhow!("program name must not be empty"));
    }
    if cfg.program.contains('/') || cfg.program.contains('\\') {
        return Err(anyhow!(
            "program name {:?} must not contain path separators",
            cfg.program
        ));
    }
    Ok(())
}

fn validate_build(cfg: &Config) -> Result<()> {
    if cfg.build_cmd.trim().is_empty() {
        return Err(anyhow!("build command must not be empty"));
    }
    if cfg.source.trim().is_empty() {
        return Err(anyhow!("build source path must not be empty"));
    }
    Ok(())
}
