// src/engine/mod.rs

//! Orchestration engine for hotswap.
//!
//! This module ties together:
//! - the directory watcher (registration of newly created directories)
//! - the debounce gate (burst suppression and tolerance calibration)
//! - the builder and the process supervisor (the restart cycle)
//! into one single-consumer event loop that reacts to:
//!   - filesystem change notifications
//!   - filesystem watcher errors
//!   - shutdown signals

pub mod runtime;

pub use runtime::{Engine, EngineEvent};
