//! Configuration file loading with precedence handling.

use crate::model::{ListError, DEFAULT_KEY_FIELD};
use crate::state::ListConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PAGELIST_CONFIG";
/// Environment variable overriding the page size.
pub const PAGE_SIZE_ENV: &str = "PAGELIST_PAGE_SIZE";
/// Environment variable overriding the auto-refresh interval, in seconds.
pub const REFRESH_SECS_ENV: &str = "PAGELIST_REFRESH_SECS";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An environment override could not be parsed.
    #[error("Invalid value {value:?} for {var}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// Resolved settings cannot drive a list.
    #[error("Invalid list settings: {0}")]
    InvalidList(#[from] ListError),
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/pagelist/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Items requested per page.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Auto-refresh interval in seconds. `0` disables auto-refresh.
    #[serde(default)]
    pub auto_refresh_secs: Option<u64>,

    /// Record field used as the unique key.
    #[serde(default)]
    pub key_field: Option<String>,

    /// Record field shown next to the key in each header line.
    #[serde(default)]
    pub summary_field: Option<String>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Items requested per page.
    pub page_size: usize,
    /// Auto-refresh interval in seconds; `0` means disabled.
    pub auto_refresh_secs: u64,
    /// Record field used as the unique key.
    pub key_field: String,
    /// Record field shown in header lines.
    pub summary_field: Option<String>,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            page_size: ListConfig::DEFAULT_PAGE_SIZE,
            auto_refresh_secs: 0,
            key_field: DEFAULT_KEY_FIELD.to_string(),
            summary_field: None,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Build the list settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidList` when `page_size` is zero.
    pub fn list_config(&self) -> Result<ListConfig, ConfigError> {
        let mut config = ListConfig::new().with_page_size(self.page_size)?;
        if self.auto_refresh_secs > 0 {
            config = config.with_auto_refresh(Duration::from_secs(self.auto_refresh_secs));
        }
        Ok(config)
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/pagelist/pagelist.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("pagelist").join("pagelist.log")
    } else {
        PathBuf::from("pagelist.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
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

/// Resolve default config file path.
///
/// Returns `~/.config/pagelist/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pagelist").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (like CLI `--config`)
/// 2. `PAGELIST_CONFIG` environment variable
/// 3. Default path `~/.config/pagelist/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `PAGELIST_PAGE_SIZE`: Override page size
/// - `PAGELIST_REFRESH_SECS`: Override auto-refresh interval
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnv` when a variable is set but not a number.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Some(page_size) = env_number::<usize>(PAGE_SIZE_ENV)? {
        config.page_size = page_size;
    }

    if let Some(secs) = env_number::<u64>(REFRESH_SECS_ENV)? {
        config.auto_refresh_secs = secs;
    }

    Ok(config)
}

fn env_number<N: std::str::FromStr>(var: &'static str) -> Result<Option<N>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value: raw }),
        Err(_) => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        page_size: config.page_size.unwrap_or(defaults.page_size),
        auto_refresh_secs: config
            .auto_refresh_secs
            .unwrap_or(defaults.auto_refresh_secs),
        key_field: config.key_field.unwrap_or(defaults.key_field),
        summary_field: config.summary_field.or(defaults.summary_field),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Overrides collected from command-line flags.
///
/// Only flags the user actually passed are `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--page-size`
    pub page_size: Option<usize>,
    /// `--refresh`
    pub auto_refresh_secs: Option<u64>,
    /// `--key-field`
    pub key_field: Option<String>,
    /// `--summary-field`
    pub summary_field: Option<String>,
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: CliOverrides) -> ResolvedConfig {
    if let Some(page_size) = overrides.page_size {
        config.page_size = page_size;
    }

    if let Some(secs) = overrides.auto_refresh_secs {
        config.auto_refresh_secs = secs;
    }

    if let Some(key_field) = overrides.key_field {
        config.key_field = key_field;
    }

    if overrides.summary_field.is_some() {
        config.summary_field = overrides.summary_field;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
