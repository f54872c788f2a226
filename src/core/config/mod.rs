//! core::config
//!
//! Configuration schema, loading and resolution.
//!
//! # Overview
//!
//! releasekit reads at most one optional TOML file. Its values are merged
//! with command-line flags and environment variables into a [`RunConfig`]
//! exactly once, in the CLI layer. Nothing below the CLI reads the
//! environment.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. Environment variables (token and base URL only)
//! 4. CLI flags
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `--config <path>` (must exist)
//! 2. `$RELEASEKIT_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/releasekit/config.toml`
//! 4. `~/.releasekit/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use releasekit::core::config::{load, Overrides, RunConfig};
//!
//! let env = |key: &str| std::env::var(key).ok();
//! let loaded = load(None, &env).unwrap();
//! let overrides = Overrides {
//!     repos: vec!["acme/widget".to_string()],
//!     ..Default::default()
//! };
//! let resolved = RunConfig::resolve(&loaded.config, overrides, &env).unwrap();
//! println!("releasing on {}", resolved.config.platform);
//! ```

mod run;
pub mod schema;

pub use run::{Overrides, RepoSource, Resolved, RunConfig};
pub use schema::{FileConfig, ReleaseDefaults};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::forge::Platform;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "RELEASEKIT_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("no {platform} token provided")]
    MissingToken { platform: Platform },

    #[error("no repositories given")]
    NoRepositories,
}

impl ConfigError {
    /// Follow-up guidance printed below the error, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            ConfigError::MissingToken { platform } => Some(format!(
                "Pass --token or set {}.\n{}",
                platform.token_env_var(),
                platform.token_help()
            )),
            ConfigError::NoRepositories => Some(
                "Use --file <FILE>, --repos <REPO>... or set `repositories` in the config file."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

/// Result of loading the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoadResult {
    /// The loaded configuration (defaults if no file was found).
    pub config: FileConfig,
    /// The file it came from, if any.
    pub path: Option<PathBuf>,
}

/// Load the config file from `explicit` or the standard locations.
///
/// `env` looks up environment variables; pass `|k| std::env::var(k).ok()`
/// outside of tests.
///
/// # Errors
///
/// - `NotFound` if `explicit` does not exist
/// - `ReadError` / `ParseError` if a file exists but cannot be used
/// - `InvalidValue` if a value fails validation
pub fn load(
    explicit: Option<&Path>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<ConfigLoadResult, ConfigError> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path.to_path_buf())
        }
        None => candidate_paths(env).into_iter().find(|p| p.exists()),
    };

    let Some(path) = path else {
        return Ok(ConfigLoadResult::default());
    };

    let config = read_config(&path)?;
    config.validate()?;
    tracing::debug!(path = %path.display(), "loaded config file");

    Ok(ConfigLoadResult {
        config,
        path: Some(path),
    })
}

/// Standard config locations in search order.
pub fn candidate_paths(env: &dyn Fn(&str) -> Option<String>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = env(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
        paths.push(PathBuf::from(path));
    }

    if let Some(xdg_home) = env("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        paths.push(PathBuf::from(xdg_home).join("releasekit/config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".releasekit/config.toml"));
    }

    paths
}

/// Read and parse a config file.
pub fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
