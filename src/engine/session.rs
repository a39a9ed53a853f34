//! Incremental detection session
//!
//! ```ignore
//! let mut detector = UniversalDetector::new();
//! for line in reader.split(b'\n') {
//!     detector.feed(&line?);
//!     if detector.done() {
//!         break;
//!     }
//! }
//! let result = detector.close();
//! ```

use super::coordinator::Coordinator;
use crate::config::DetectorConfig;
use crate::models::DetectionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    New,
    Feeding,
    Done,
}

/// Feed/close wrapper around one coordinator
pub struct UniversalDetector {
    coordinator: Coordinator,
    phase: SessionPhase,
    result: Option<DetectionResult>,
}

impl UniversalDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::default())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            coordinator: Coordinator::new(config),
            phase: SessionPhase::New,
            result: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Feed the next chunk; ignored once the session is closed
    pub fn feed(&mut self, bytes: &[u8]) {
        if self.phase == SessionPhase::Done {
            return;
        }
        self.phase = SessionPhase::Feeding;
        self.coordinator.consume(bytes);
    }

    /// True when more input cannot change the answer
    pub fn done(&self) -> bool {
        self.phase == SessionPhase::Done || self.coordinator.is_settled()
    }

    /// Finalize and freeze the result; repeated calls return the same value
    pub fn close(&mut self) -> &DetectionResult {
        self.phase = SessionPhase::Done;
        let coordinator = &mut self.coordinator;
        self.result.get_or_insert_with(|| coordinator.finalize())
    }

    /// The frozen result, available only after [`close`](Self::close)
    pub fn result(&self) -> Option<&DetectionResult> {
        self.result.as_ref()
    }

    /// Reuse the detector for another input
    pub fn reset(&mut self) {
        self.coordinator.reset();
        self.phase = SessionPhase::New;
        self.result = None;
    }
}

impl Default for UniversalDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut detector = UniversalDetector::new();
        assert_eq!(detector.phase(), SessionPhase::New);
        assert!(!detector.done());
        assert!(detector.result().is_none());

        detector.feed(b"hello ");
        assert_eq!(detector.phase(), SessionPhase::Feeding);
        detector.feed(b"world");
        assert!(detector.result().is_none());

        let result = detector.close().clone();
        assert_eq!(result.encoding.as_deref(), Some("ASCII"));
        assert!(detector.done());
        assert_eq!(detector.result(), Some(&result));
    }

    #[test]
    fn test_feed_after_close_is_ignored() {
        let mut detector = UniversalDetector::new();
        detector.feed(b"plain");
        let first = detector.close().clone();
        detector.feed("Привет, мир".as_bytes());
        assert_eq!(detector.close(), &first);
    }

    #[test]
    fn test_close_without_feed() {
        let mut detector = UniversalDetector::new();
        assert_eq!(detector.close(), &DetectionResult::undetermined());
    }

    #[test]
    fn test_done_after_bom() {
        let mut detector = UniversalDetector::new();
        detector.feed(b"\xEF\xBB\xBF");
        assert!(detector.done());
        detector.feed(b"\xFF");
        assert_eq!(detector.close().encoding.as_deref(), Some("UTF-8-SIG"));
    }

    #[test]
    fn test_reset_reuses_detector() {
        let mut detector = UniversalDetector::new();
        detector.feed(b"\xEF\xBB\xBFx");
        detector.close();
        detector.reset();
        assert!(detector.result().is_none());
        detector.feed(b"abc");
        assert_eq!(detector.close().encoding.as_deref(), Some("ASCII"));
    }
}
