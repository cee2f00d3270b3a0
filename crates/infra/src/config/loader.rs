//! Configuration loader
//!
//! Settings come from the environment when fully specified there, otherwise
//! from a JSON or TOML file discovered by probing well-known locations.
//!
//! Environment variables:
//! - `MEDMATCH_DB_PATH`: database file path
//! - `MEDMATCH_DB_POOL_SIZE`: connection pool size
//!
//! File probing covers `config.{json,toml}` and `medmatch.{json,toml}` in the
//! working directory, its two nearest ancestors, and the same set relative to
//! the executable.

use std::path::{Path, PathBuf};

use medmatch_domain::{Config, DatabaseConfig, MedMatchError, Result};

/// File stems and extensions considered during probing, in priority order.
const CONFIG_STEMS: [&str; 2] = ["config", "medmatch"];
const CONFIG_EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Load configuration, preferring the environment over files
///
/// # Errors
/// Returns `MedMatchError::Config` when neither source yields a complete,
/// well-formed configuration.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment");
            Ok(config)
        }
        Err(err) => {
            tracing::debug!(error = ?err, "environment incomplete, probing for config file");
            load_from_file(None)
        }
    }
}

/// Assemble configuration from environment variables alone
///
/// Every variable must be present; a partial environment is an error so the
/// caller can fall back to file loading.
///
/// # Errors
/// Returns `MedMatchError::Config` for missing or malformed variables.
pub fn load_from_env() -> Result<Config> {
    let path = env_var("MEDMATCH_DB_PATH")?;
    let pool_size = env_var("MEDMATCH_DB_POOL_SIZE")?.parse::<u32>().map_err(|err| {
        MedMatchError::Config(format!("MEDMATCH_DB_POOL_SIZE is not a number: {err}"))
    })?;

    Ok(Config { database: DatabaseConfig { path, pool_size } })
}

/// Load configuration from a specific file, or probe when `path` is `None`
///
/// The format is chosen by extension; files without one are treated as JSON.
///
/// # Errors
/// Returns `MedMatchError::Config` when the file is absent, unreadable, or
/// fails to parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(explicit) if explicit.exists() => explicit,
        Some(explicit) => {
            return Err(MedMatchError::Config(format!(
                "config file not found: {}",
                explicit.display()
            )));
        }
        None => probe_config_paths().ok_or_else(|| {
            MedMatchError::Config("no config file found in any probed location".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|err| MedMatchError::Config(format!("failed to read config file: {err}")))?;

    parse_config(&contents, &config_path)
}

/// Find the first existing config file among the probed locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut bases: Vec<PathBuf> = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        bases.push(cwd.clone());
        bases.push(cwd.join(".."));
        bases.push(cwd.join("../.."));
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            bases.push(dir.to_path_buf());
            bases.push(dir.join(".."));
            bases.push(dir.join("../.."));
        }
    }

    for base in &bases {
        for stem in CONFIG_STEMS {
            for ext in CONFIG_EXTENSIONS {
                let candidate = base.join(format!("{stem}.{ext}"));
                if candidate.exists() {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    match path.extension().and_then(|ext| ext.to_str()).unwrap_or("json") {
        "toml" => toml::from_str(contents)
            .map_err(|err| MedMatchError::Config(format!("invalid TOML config: {err}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|err| MedMatchError::Config(format!("invalid JSON config: {err}"))),
        other => Err(MedMatchError::Config(format!("unsupported config format: {other}"))),
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| MedMatchError::Config(format!("missing environment variable: {key}")))
}
