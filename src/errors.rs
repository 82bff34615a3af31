// src/errors.rs

//! Crate-wide error types.
//!
//! Everything that can go wrong inside a restart cycle is recoverable: the
//! engine logs it and keeps watching. Only startup wiring (watcher creation,
//! config resolution) is allowed to abort the process.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HotswapError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("build command failed with exit code {0}")]
    BuildFailed(i32),

    #[error("build reported success but produced no artifact at {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("swap failed: {0}")]
    Swap(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, HotswapError>;
