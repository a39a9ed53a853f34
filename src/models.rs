//! Core data models for chardetect
//!
//! These models are shared by every prober, the coordinator, the session
//! wrapper and the CLI reporters.

use serde::{Deserialize, Serialize};

/// Lifecycle of a single prober within one detection session.
///
/// `Eliminated` is terminal: once a prober has seen a byte sequence that is
/// structurally impossible in its encoding it never recovers, even across
/// later feed calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbingState {
    #[default]
    Detecting,
    Eliminated,
    Confirmed,
}

impl ProbingState {
    pub fn is_eliminated(self) -> bool {
        self == ProbingState::Eliminated
    }

    pub fn is_confirmed(self) -> bool {
        self == ProbingState::Confirmed
    }
}

impl std::fmt::Display for ProbingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbingState::Detecting => write!(f, "detecting"),
            ProbingState::Eliminated => write!(f, "eliminated"),
            ProbingState::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// Final answer of a detection run
///
/// `encoding` is `None` when no prober was confident enough; in that case
/// `confidence` is always `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DetectionResult {
    pub encoding: Option<String>,
    pub confidence: f32,
    #[serde(default)]
    pub language: Option<String>,
}

impl DetectionResult {
    /// The "no idea" answer
    pub fn undetermined() -> Self {
        Self::default()
    }

    pub fn new(encoding: &str, confidence: f32, language: Option<&str>) -> Self {
        Self {
            encoding: Some(encoding.to_string()),
            confidence: confidence.clamp(0.0, 1.0),
            language: language.map(str::to_string),
        }
    }

    pub fn is_determined(&self) -> bool {
        self.encoding.is_some()
    }
}

impl std::fmt::Display for DetectionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.encoding {
            Some(encoding) => write!(f, "{} with confidence {:.2}", encoding, self.confidence),
            None => write!(f, "None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undetermined_is_empty() {
        let result = DetectionResult::undetermined();
        assert!(!result.is_determined());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.language, None);
        assert_eq!(result.to_string(), "None");
    }

    #[test]
    fn test_display_and_json() {
        let result = DetectionResult::new("KOI8-R", 0.8612, Some("Russian"));
        assert_eq!(result.to_string(), "KOI8-R with confidence 0.86");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["encoding"], "KOI8-R");
        assert_eq!(json["language"], "Russian");
    }

    #[test]
    fn test_probing_state_helpers() {
        assert!(ProbingState::Eliminated.is_eliminated());
        assert!(!ProbingState::Detecting.is_eliminated());
        assert!(ProbingState::Confirmed.is_confirmed());
        assert_eq!(ProbingState::default(), ProbingState::Detecting);
    }
}
