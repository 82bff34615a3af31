// src/config/loader.rs

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::cli::CliArgs;
use crate::config::model::{
    normalize_ext, parse_kill_timeout, Config, ConfigFile, DEFAULT_EXCLUDES, DEFAULT_EXTENSION,
};
use crate::config::validate::validate_config;

const CONFIG_FILE_NAME: &str = "Hotswap.toml";
const DEFAULT_BUILD_CMD: &str = "go";
const DEFAULT_SOURCE: &str = ".";
const DEFAULT_KILL_TIMEOUT: Duration = Duration::from_secs(5);

/// Load a configuration file from a given path and return the raw
/// `ConfigFile`.
///
/// This only performs TOML deserialization; semantic validation happens after
/// merging, against the resolved [`Config`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {:?}", path))?;

    Ok(config)
}

/// Resolve the final runtime [`Config`] from CLI flags, an optional
/// `Hotswap.toml`, and built-in defaults.
///
/// Precedence is CLI > file > default, except for *additive* fields:
/// extensions and excludes accumulate from all three layers, because the
/// default extension set and the default excludes always apply.
///
/// Failures here are fatal: without a resolvable root and a sane config none
/// of the machinery can operate.
pub fn resolve(args: &CliArgs) -> Result<Config> {
    let file = match &args.config {
        Some(path) => load_from_path(path)?,
        None => {
            // Look for Hotswap.toml next to the watch root (or cwd).
            let base = args.root.clone().unwrap_or_else(|| PathBuf::from("."));
            let candidate = base.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                load_from_path(&candidate)?
            } else {
                ConfigFile::default()
            }
        }
    };

    let root = args
        .root
        .clone()
        .or_else(|| file.watch.root.clone())
        .map_or_else(std::env::current_dir, Ok)
        .context("resolving working directory")?;
    let root = root
        .canonicalize()
        .with_context(|| format!("resolving watch root {:?}", root))?;

    let program = match args.program.clone().or_else(|| file.program.clone()) {
        Some(name) => name,
        None => root
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .ok_or_else(|| anyhow!("cannot derive a program name from {:?}", root))?,
    };

    let mut extensions: BTreeSet<String> = BTreeSet::new();
    extensions.insert(DEFAULT_EXTENSION.to_string());
    for raw in file.watch.ext.iter().chain(args.ext.iter()) {
        match normalize_ext(raw) {
            Some(ext) => {
                extensions.insert(ext);
            }
            None => return Err(anyhow!("invalid extension {:?}", raw)),
        }
    }

    let mut exclude: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
    exclude.extend(file.watch.exclude.iter().cloned());
    exclude.extend(args.exclude.iter().cloned());

    let kill_timeout = match args
        .kill_timeout
        .as_deref()
        .or(file.run.kill_timeout.as_deref())
    {
        Some(raw) => parse_kill_timeout(raw)
            .map_err(|e| anyhow!("invalid kill timeout {:?}: {}", raw, e))?,
        None => Some(DEFAULT_KILL_TIMEOUT),
    };

    let config = Config {
        root,
        extensions,
        build_cmd: args
            .build_cmd
            .clone()
            .or_else(|| file.build.command.clone())
            .unwrap_or_else(|| DEFAULT_BUILD_CMD.to_string()),
        build_flags: if args.build_flags.is_empty() {
            file.build.flags.clone()
        } else {
            args.build_flags.clone()
        },
        source: args
            .source
            .clone()
            .or_else(|| file.build.source.clone())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        run_args: if args.run_args.is_empty() {
            file.run.args.clone()
        } else {
            args.run_args.clone()
        },
        program,
        exe_suffix: std::env::consts::EXE_SUFFIX.to_string(),
        exclude,
        kill_timeout,
        verbose: args.verbose,
    };

    validate_config(&config)?;
    Ok(config)
}
