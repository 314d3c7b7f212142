//! Configuration for Stylo.
//!
//! Config priority: STYLO_CONFIG (explicit file) > user (~/.config/stylo/config.toml) > defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

// ============================================================================
// Clustering Configuration
// ============================================================================

/// Clustering defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
  /// Distance below which a text joins its nearest cluster (default: 3.0)
  pub threshold: f64,

  /// Whether classification registers unseen n-grams into the vocabulary (default: true)
  pub classify_grows_vocabulary: bool,
}

impl Default for ClusteringConfig {
  fn default() -> Self {
    Self {
      threshold: 3.0,
      classify_grows_vocabulary: true,
    }
  }
}

// ============================================================================
// Storage Configuration
// ============================================================================

/// Model storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
  /// Directory for saved models (default: <data_dir>/models)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub models_dir: Option<PathBuf>,
}

impl StorageConfig {
  pub fn models_dir(&self) -> PathBuf {
    self.models_dir.clone().unwrap_or_else(crate::dirs::default_models_dir)
  }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
  /// Log level: "off", "error", "warn", "info", "debug", "trace" (default: "info")
  pub level: String,

  /// Log file rotation: "daily", "hourly", "never" (default: "daily")
  pub rotation: String,

  /// Log to stderr instead of the log file (default: false)
  pub console: bool,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
      rotation: "daily".to_string(),
      console: false,
    }
  }
}

// ============================================================================
// Main Configuration
// ============================================================================

/// Stylo configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  #[serde(default)]
  pub clustering: ClusteringConfig,

  #[serde(default)]
  pub storage: StorageConfig,

  #[serde(default)]
  pub logging: LoggingConfig,
}

impl Config {
  /// Load the effective config, falling back to defaults when no file exists or it fails to parse
  pub fn load() -> Self {
    match Self::config_path() {
      Some(path) => Self::load_from(&path).unwrap_or_default(),
      None => Self::default(),
    }
  }

  /// Parse a config file
  pub fn load_from(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
  }

  /// The config file that [`Config::load`] would read, if any exists
  pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("STYLO_CONFIG") {
      let path = PathBuf::from(path);
      return path.is_file().then_some(path);
    }

    let user = Self::user_config_path();
    user.is_file().then_some(user)
  }

  /// Get the user-level config path
  pub fn user_config_path() -> PathBuf {
    crate::dirs::default_config_dir().join("config.toml")
  }

  /// Generate a default config file as a string
  pub fn generate_template() -> String {
    let defaults = Self::default();
    format!(
      r#"# Stylo Configuration
# Place in ~/.config/stylo/config.toml, or point STYLO_CONFIG at a file

# ============================================================================
# Clustering
# ============================================================================

[clustering]
# Euclidean distance below which a text joins its nearest cluster.
# Smaller values create more clusters; must be greater than zero.
threshold = {threshold:?}

# Register unseen n-grams into the vocabulary when classifying.
# Distances are the same either way; disabling keeps saved models smaller.
classify_grows_vocabulary = {grows}

# ============================================================================
# Storage
# ============================================================================

[storage]
# Directory for saved models (default: <data dir>/models)
# models_dir = "/path/to/models"

# ============================================================================
# Logging
# ============================================================================

[logging]
# Log level: off, error, warn, info, debug, trace (RUST_LOG overrides)
level = "{level}"

# Log file rotation: daily, hourly, never
rotation = "{rotation}"

# Log to stderr instead of <data dir>/stylo.log
console = {console}
"#,
      threshold = defaults.clustering.threshold,
      grows = defaults.clustering.classify_grows_vocabulary,
      level = defaults.logging.level,
      rotation = defaults.logging.rotation,
      console = defaults.logging.console,
    )
  }
}
