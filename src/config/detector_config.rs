//! Detector tuning support
//!
//! Loads thresholds from `chardetect.toml` or `.chardetectrc.json` in a
//! directory, falling back to the calibrated defaults.
//!
//! # Configuration Format
//!
//! ```toml
//! # chardetect.toml
//! minimum_threshold = 0.20
//! early_stop_threshold = 0.95
//! early_stop_margin = 0.25
//! early_stop_min_bytes = 1024
//! min_scored_bigrams = 16
//! max_bytes = 1048576
//! languages = ["Russian", "Greek"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while loading or validating a config
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Unknown language in allow-list: {0}")]
    UnknownLanguage(String),

    #[error("Unsupported config file extension: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Thresholds used by the detection coordinator and the statistical probers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Results below this confidence are reported as undetermined
    pub minimum_threshold: f32,
    /// A candidate at or above this confidence may end scanning early
    pub early_stop_threshold: f32,
    /// Every rival must trail the leader by at least this much to stop early
    pub early_stop_margin: f32,
    /// Early stop is evaluated at every multiple of this byte count
    pub early_stop_min_bytes: usize,
    /// Single-byte probers report a floor confidence until this many bigrams are scored
    pub min_scored_bigrams: u32,
    /// Stop inspecting input after this many bytes
    pub max_bytes: Option<usize>,
    /// Restrict single-byte language models to these names (case-insensitive)
    pub languages: Option<Vec<String>>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            minimum_threshold: 0.20,
            early_stop_threshold: 0.95,
            early_stop_margin: 0.25,
            early_stop_min_bytes: 1024,
            min_scored_bigrams: 16,
            max_bytes: None,
            languages: None,
        }
    }
}

impl DetectorConfig {
    /// Reject values that would make the coordinator misbehave
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("minimum_threshold", self.minimum_threshold)?;
        check_unit("early_stop_threshold", self.early_stop_threshold)?;
        check_unit("early_stop_margin", self.early_stop_margin)?;

        if self.early_stop_min_bytes == 0 {
            return Err(ConfigError::OutOfRange {
                field: "early_stop_min_bytes",
                value: 0.0,
                min: 1.0,
                max: usize::MAX as f64,
            });
        }
        if self.max_bytes == Some(0) {
            return Err(ConfigError::OutOfRange {
                field: "max_bytes",
                value: 0.0,
                min: 1.0,
                max: usize::MAX as f64,
            });
        }

        if let Some(languages) = &self.languages {
            let known = crate::langmodels::language_names();
            for language in languages {
                if !known.iter().any(|k| k.eq_ignore_ascii_case(language)) {
                    return Err(ConfigError::UnknownLanguage(language.clone()));
                }
            }
        }
        Ok(())
    }

    /// Whether single-byte models for `language` should be instantiated
    pub fn allows_language(&self, language: &str) -> bool {
        match &self.languages {
            Some(list) => list.iter().any(|l| l.eq_ignore_ascii_case(language)),
            None => true,
        }
    }
}

fn check_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            min: 0.0,
            max: 1.0,
        })
    }
}

/// Load detector configuration from a directory
///
/// Searches for config files in order:
/// 1. `chardetect.toml`
/// 2. `.chardetectrc.json`
///
/// Returns default configuration if no usable config file is found.
pub fn load_detector_config(dir: &Path) -> DetectorConfig {
    let toml_path = dir.join("chardetect.toml");
    if toml_path.exists() {
        match load_config_file(&toml_path) {
            Ok(config) => {
                debug!("Loaded detector config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = dir.join(".chardetectrc.json");
    if json_path.exists() {
        match load_config_file(&json_path) {
            Ok(config) => {
                debug!("Loaded detector config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No detector config found, using defaults");
    DetectorConfig::default()
}

/// Load and validate one explicit config file, picking the parser by extension
pub fn load_config_file(path: &Path) -> Result<DetectorConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let config: DetectorConfig = match extension.as_str() {
        "toml" => toml::from_str(&content)?,
        "json" => serde_json::from_str(&content)?,
        other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
    };
    config.validate()?;
    Ok(config)
}
