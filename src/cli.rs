// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! The CLI layer only *configures* the engine; everything it produces ends up
//! in a [`crate::config::Config`] via `config::resolve`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `hotswap`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hotswap",
    version,
    about = "Watch a source tree, rebuild on change, and hot-swap the running binary.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `Hotswap.toml` in the watch root is used when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to watch. Defaults to the current working directory.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Add a recognized source extension (e.g. `go` or `.go`).
    ///
    /// Extensions given here are added to the built-in default set; they do
    /// not replace it.
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    pub ext: Vec<String>,

    /// Build toolchain command. Defaults to `go`.
    #[arg(long = "build-cmd", value_name = "CMD")]
    pub build_cmd: Option<String>,

    /// Extra flag passed through to the build command (repeatable).
    #[arg(short = 'p', long = "build-flag", value_name = "FLAG")]
    pub build_flags: Vec<String>,

    /// Source path handed to the build command. Defaults to `.`.
    #[arg(long, value_name = "PATH")]
    pub source: Option<String>,

    /// Argument passed to the rebuilt program when it is launched (repeatable).
    #[arg(long = "run-arg", value_name = "ARG")]
    pub run_args: Vec<String>,

    /// Program base name. Defaults to the watch root's directory name.
    #[arg(long, value_name = "NAME")]
    pub program: Option<String>,

    /// Glob for paths to exclude from watching (repeatable, e.g. `target/**`).
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// How long to wait for the old child to exit before giving up
    /// (e.g. `5s`, `500ms`). `none` waits forever.
    #[arg(long = "kill-timeout", value_name = "DURATION")]
    pub kill_timeout: Option<String>,

    /// Verbose output (shorthand for `--log-level debug`).
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HOTSWAP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            config: None,
            root: None,
            ext: Vec::new(),
            build_cmd: None,
            build_flags: Vec::new(),
            source: None,
            run_args: Vec::new(),
            program: None,
            exclude: Vec::new(),
            kill_timeout: None,
            verbose: false,
            log_level: None,
        }
    }
}
