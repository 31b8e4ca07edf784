use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::version::error::RangeError;
use crate::version::range::SupportedRange;

// =============================================================================
// Supported range defaults
// =============================================================================

/// Oldest toolchain version that may be recommended
pub const DEFAULT_MIN_VERSION: &str = "1.11";

/// Newest toolchain version that may be recommended
pub const DEFAULT_MAX_VERSION: &str = "1.21";

/// Key used in the environment json output
pub const DEFAULT_TOOLCHAIN: &str = "go";

pub const MIN_VERSION_ENV: &str = "TOOLCHAIN_ADVISOR_MIN_VERSION";
pub const MAX_VERSION_ENV: &str = "TOOLCHAIN_ADVISOR_MAX_VERSION";
pub const DIAGNOSTIC_DIR_ENV: &str = "CODEQL_EXTRACTOR_GO_DIAGNOSTIC_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Range(#[from] RangeError),
}

/// Advisor configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AdvisorConfig {
    /// Top-level key of the environment json
    pub toolchain: String,
    pub min_version: String,
    pub max_version: String,
    /// Binary queried for the installed version
    pub go_binary: String,
    /// Directory receiving JSON diagnostic records
    pub diagnostic_dir: Option<PathBuf>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            toolchain: DEFAULT_TOOLCHAIN.to_string(),
            min_version: DEFAULT_MIN_VERSION.to_string(),
            max_version: DEFAULT_MAX_VERSION.to_string(),
            go_binary: "go".to_string(),
            diagnostic_dir: None,
        }
    }
}

impl AdvisorConfig {
    /// Load from an optional JSON file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(min) = var(MIN_VERSION_ENV) {
            self.min_version = min;
        }
        if let Some(max) = var(MAX_VERSION_ENV) {
            self.max_version = max;
        }
        if let Some(dir) = var(DIAGNOSTIC_DIR_ENV).filter(|d| !d.is_empty()) {
            self.diagnostic_dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn supported_range(&self) -> Result<SupportedRange, ConfigError> {
        Ok(SupportedRange::new(&self.min_version, &self.max_version)?)
    }
}

/// Returns the path to the data directory for toolchain-advisor.
/// Uses $XDG_DATA_HOME/toolchain-advisor if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/toolchain-advisor,
/// or ./toolchain-advisor if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("toolchain-advisor.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("toolchain-advisor")
}
