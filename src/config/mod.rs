// src/config/mod.rs

//! Configuration resolution and validation for hotswap.
//!
//! Responsibilities:
//! - Define the resolved runtime settings and the TOML-backed file model
//!   (`model.rs`).
//! - Merge CLI flags over an optional `Hotswap.toml` over defaults
//!   (`loader.rs`).
//! - Validate basic invariants like extension shape and glob syntax
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_path, resolve};
pub use model::{ArtifactPaths, Config, ConfigFile, DEFAULT_EXTENSION};
pub use validate::validate_config;
