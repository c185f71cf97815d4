//! Configuration module for arrayflow
//!
//! This module handles engine configuration:
//! - Locality layout (how many localities, worker threads per locality)
//! - Logging (filter directives, optional rolling log files)
//!
//! # Config Location
//!
//! The default configuration file lives in the platform config directory:
//! - **Linux**: `~/.config/arrayflow/engine.toml`
//! - **macOS**: `~/Library/Application Support/arrayflow/engine.toml`
//! - **Windows**: `%APPDATA%\arrayflow\engine.toml`
//!
//! Files ending in `.json` are read and written as JSON, everything else as
//! TOML.
//!
//! # Example
//!
//! ```ignore
//! use arrayflow::config::EngineConfig;
//!
//! let config = EngineConfig::load_or_default_location();
//! config.validate()?;
//! config.save("engine.json")?;
//! ```

use crate::error::{ArrayFlowError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "arrayflow";

/// Default config filename
pub const CONFIG_FILE: &str = "engine.toml";

/// Default number of localities
pub const DEFAULT_LOCALITIES: usize = 1;

/// Default worker threads per locality
pub const DEFAULT_WORKER_THREADS: usize = 2;

/// Default log filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info,arrayflow=debug";

// ==================== Config Directory ====================

/// Get the application config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the default config file
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Serialization format, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

// ==================== Engine Config ====================

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of localities (one runtime each)
    #[serde(default = "default_localities")]
    pub localities: usize,

    /// Worker threads per locality
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Worker threads are named `<prefix>-<locality>`
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_localities() -> usize {
    DEFAULT_LOCALITIES
}

fn default_worker_threads() -> usize {
    DEFAULT_WORKER_THREADS
}

fn default_thread_name_prefix() -> String {
    "locality".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            localities: DEFAULT_LOCALITIES,
            worker_threads: DEFAULT_WORKER_THREADS,
            thread_name_prefix: default_thread_name_prefix(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a `.toml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ArrayFlowError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        match ConfigFormat::from_path(path) {
            ConfigFormat::Json => serde_json::from_str(&content).map_err(|e| {
                ArrayFlowError::Config(format!("Failed to parse {}: {}", path.display(), e))
            }),
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| {
                ArrayFlowError::Config(format!("Failed to parse {}: {}", path.display(), e))
            }),
        }
    }

    /// Load configuration, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load engine config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Load from the default location; a missing file silently yields defaults
    pub fn load_or_default_location() -> Self {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_or_default(path),
            _ => Self::default(),
        }
    }

    /// Save configuration in the format implied by the extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path) {
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ArrayFlowError::Serialization(e.to_string()))?,
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| ArrayFlowError::Serialization(e.to_string()))?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            ArrayFlowError::Config(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    /// Reject layouts the engine can't start with
    pub fn validate(&self) -> Result<()> {
        if self.localities == 0 {
            return Err(ArrayFlowError::Config(
                "localities must be at least 1".to_string(),
            ));
        }
        if self.worker_threads == 0 {
            return Err(ArrayFlowError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.thread_name_prefix.is_empty() {
            return Err(ArrayFlowError::Config(
                "thread_name_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ==================== Logging Config ====================

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Directory for daily rolling log files; console only when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Log file name prefix
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_file_prefix() -> String {
    "arrayflow.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            directory: None,
            file_prefix: default_file_prefix(),
        }
    }
}
