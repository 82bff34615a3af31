// src/watch/mod.rs

//! File watching and change-burst suppression.
//!
//! This module is responsible for:
//! - Registering the watch root and every subdirectory with the OS
//!   notification facility (`notify`), and growing that registration as new
//!   directories appear.
//! - Collapsing the burst of write events a single editor save produces into
//!   one rebuild trigger (`debounce`).
//!
//! It does **not** know about builds or child processes; it only turns
//! filesystem changes into engine events.

pub mod debounce;
pub mod watcher;

pub use debounce::DebounceGate;
pub use watcher::TreeWatcher;
