//! Configuration file support for claimscope.
//!
//! Engine tunables (tax rate, drawing thresholds, fraud policies, log level)
//! are kept in a versioned JSON document that can be exported, imported and
//! auto-loaded from a per-user location.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TAX_RATE, MANUAL_BOX_SIZE, MIN_DRAFT_SIZE};
use crate::fraud::FraudPolicy;
use crate::persistence::{KeyValueBackend, StoreError};

/// Verbosity the demo binary installs its logger with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    /// Checkpoints such as finishing an analysis or submitting an estimate
    #[default]
    Info,
    /// Every state transition and store mutation
    Debug,
    /// Also events ignored in the current state
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Format version written by this build. Files with a higher version are
/// rejected.
pub const CONFIG_VERSION: u32 = 1;

/// Fraud policies for each screen that shows a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FraudPolicies {
    /// Annotation detail panel
    #[serde(default = "FraudPolicy::detail")]
    pub detail: FraudPolicy,
    /// Analysis summary card
    #[serde(default = "FraudPolicy::summary")]
    pub summary: FraudPolicy,
    /// Estimate screen
    #[serde(default = "FraudPolicy::estimate")]
    pub estimate: FraudPolicy,
}

impl Default for FraudPolicies {
    fn default() -> Self {
        Self {
            detail: FraudPolicy::detail(),
            summary: FraudPolicy::summary(),
            estimate: FraudPolicy::estimate(),
        }
    }
}

/// Engine tunables, stored as a versioned JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Tax rate applied to estimate subtotals
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,

    /// Drawn boxes must exceed this size (percent) on both axes
    #[serde(default = "default_min_draft_size")]
    pub min_draft_size: f32,

    /// Side length (percent) of boxes placed by manual entry
    #[serde(default = "default_manual_box_size")]
    pub manual_box_size: f32,

    /// Fraud scoring policies
    #[serde(default)]
    pub fraud: FraudPolicies,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_tax_rate() -> f64 {
    DEFAULT_TAX_RATE
}

fn default_min_draft_size() -> f32 {
    MIN_DRAFT_SIZE
}

fn default_manual_box_size() -> f32 {
    MANUAL_BOX_SIZE
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            tax_rate: default_tax_rate(),
            min_draft_size: default_min_draft_size(),
            manual_box_size: default_manual_box_size(),
            fraud: FraudPolicies::default(),
            log_level: LogLevel::default(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a config document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    pub fn default_filename() -> &'static str {
        "claimscope-config.json"
    }

    /// `<config dir>/claimscope/claimscope-config.json`, or the same below
    /// `~/.config` when the platform has no config directory.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        let base = dirs::config_dir().or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(base.join("claimscope").join(Self::default_filename()))
    }

    /// Parse a stored document, logging why it was rejected.
    fn parse_logged(json: &str, source: &str) -> Option<Self> {
        Self::from_json(json)
            .inspect(|_| log::info!("Loaded configuration from {}", source))
            .inspect_err(|e| log::warn!("Ignoring configuration in {}: {}", source, e))
            .ok()
    }

    /// Read a config file. Missing, unreadable or invalid files give `None`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Option<Self> {
        let source = path.display().to_string();
        match std::fs::read_to_string(path) {
            Ok(json) => Self::parse_logged(&json, &source),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No configuration at {}", source);
                None
            }
            Err(e) => {
                log::warn!("Failed to read configuration {}: {}", source, e);
                None
            }
        }
    }

    /// Write the config file, creating its directory.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved configuration to {}", path.display());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        Self::load_from_path(&Self::default_path()?)
    }

    /// Read the config record from a key-value backend, such as browser
    /// localStorage on wasm32.
    pub fn load_from_backend<B: KeyValueBackend + ?Sized>(backend: &B) -> Option<Self> {
        match backend.get(CONFIG_KEY) {
            Ok(Some(json)) => Self::parse_logged(&json, CONFIG_KEY),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to read configuration: {}", e);
                None
            }
        }
    }

    pub fn save_to_backend<B: KeyValueBackend + ?Sized>(
        &self,
        backend: &mut B,
    ) -> Result<(), ConfigError> {
        backend.set(CONFIG_KEY, &self.to_json()?)?;
        log::info!("Saved configuration to '{}'", CONFIG_KEY);
        Ok(())
    }
}

/// Backend key of the config record.
const CONFIG_KEY: &str = "config";

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a configuration could not be read or written.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Configuration version {file_version} is newer than {supported_version}")]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    #[error("Configuration file error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration storage error: {0}")]
    StorageError(#[from] StoreError),
}
