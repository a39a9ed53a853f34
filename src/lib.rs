//! chardetect - universal character encoding detection
//!
//! Guesses the encoding of a byte sequence without any outside hints by
//! running competing probers over it: byte-order marks, escape sequences,
//! multi-byte bit patterns and per-language letter statistics.
//!
//! ```
//! let result = chardetect::detect(b"plain text");
//! assert_eq!(result.encoding.as_deref(), Some("ASCII"));
//! ```
//!
//! For streams, feed a [`UniversalDetector`] chunk by chunk and stop as
//! soon as [`UniversalDetector::done`] reports true.

pub mod config;
pub mod engine;
pub mod langmodels;
pub mod models;
pub mod probers;

pub use config::{ConfigError, DetectorConfig};
pub use engine::UniversalDetector;
pub use models::{DetectionResult, ProbingState};

/// One-shot detection with default thresholds
pub fn detect(bytes: &[u8]) -> DetectionResult {
    detect_with_config(bytes, &DetectorConfig::default())
}

/// One-shot detection with custom thresholds
pub fn detect_with_config(bytes: &[u8], config: &DetectorConfig) -> DetectionResult {
    let mut detector = UniversalDetector::with_config(config.clone());
    detector.feed(bytes);
    detector.close().clone()
}
