//! Configuration file loading with precedence handling.

use crate::model::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "VENTURE_CONFIG";

/// Environment variable overriding the page size.
pub const PAGE_SIZE_ENV: &str = "VENTURE_PAGE_SIZE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path is empty or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (permissions, not a regular file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional. Corresponds to `~/.config/venture/config.toml`:
///
/// ```toml
/// page_size = 50
/// log_file_path = "/tmp/venture.log"
/// hidden_columns = ["SourceFile", "Event.xmlns"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Records per page.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Columns deselected after every file load.
    #[serde(default)]
    pub hidden_columns: Option<Vec<String>>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Records per page, at least 1.
    pub page_size: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Columns deselected after every file load.
    pub hidden_columns: Vec<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            log_file_path: default_log_path(),
            hidden_columns: Vec::new(),
        }
    }
}

/// Resolve default log file path.
///
/// `~/.local/state/venture/venture.log` on Linux, the platform state
/// directory elsewhere, `./venture.log` when there is none.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("venture").join("venture.log"),
        None => PathBuf::from("venture.log"),
    }
}

/// Resolve default config file path.
///
/// Returns `None` if the config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("venture").join("config.toml"))
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist (not an error, use defaults).
///
/// # Errors
///
/// [`ConfigError::ReadError`] or [`ConfigError::ParseError`] if the file
/// exists but cannot be read or parsed.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `VENTURE_CONFIG` environment variable
/// 3. Default path `~/.config/venture/config.toml`
///
/// # Errors
///
/// [`ConfigError::InvalidPath`] if `VENTURE_CONFIG` is set but empty;
/// otherwise only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        if env_path.trim().is_empty() {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV} is empty")));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
///
/// A `page_size` of 0 in the file is treated as 1.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        page_size: config.page_size.map_or(defaults.page_size, |n| n.max(1)),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        hidden_columns: config.hidden_columns.unwrap_or(defaults.hidden_columns),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `VENTURE_PAGE_SIZE`; values that are not a positive integer are
/// ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(page_size) = std::env::var(PAGE_SIZE_ENV)
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
    {
        config.page_size = page_size;
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence. Only flags the user actually
/// passed are applied.
pub fn apply_cli_overrides(mut config: ResolvedConfig, page_size: Option<usize>) -> ResolvedConfig {
    if let Some(page_size) = page_size {
        config.page_size = page_size.max(1);
    }

    config
}

/// Full resolution chain: defaults → config file → env vars → CLI args.
///
/// # Errors
///
/// Propagates [`load_config_with_precedence`] errors.
pub fn resolve(
    config_path: Option<PathBuf>,
    page_size: Option<usize>,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_env_overrides(merge_config(file));
    Ok(apply_cli_overrides(config, page_size))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
