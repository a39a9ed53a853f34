//! Configuration module for chardetect
//!
//! This module handles:
//! - Detector thresholds (chardetect.toml / .chardetectrc.json)
//! - Single-byte language allow-lists

mod detector_config;

pub use detector_config::{load_config_file, load_detector_config, ConfigError, DetectorConfig};
