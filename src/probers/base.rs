//! Base prober trait
//!
//! Every encoding hypothesis in a session is a prober. Probers are fed the
//! same byte stream in order, keep whatever partial state they need across
//! feed calls, and answer three questions at any point: can this still be
//! my encoding, how sure am I, and what would I call it.

use crate::models::ProbingState;

/// Capability shared by all prober variants
///
/// # Example Implementation
///
/// ```ignore
/// pub struct NulProber {
///     seen: usize,
///     state: ProbingState,
/// }
///
/// impl CharsetProber for NulProber {
///     fn charset(&self) -> Option<&'static str> {
///         Some("NUL")
///     }
///
///     fn consume(&mut self, bytes: &[u8]) -> ProbingState {
///         if bytes.iter().any(|&b| b != 0) {
///             self.state = ProbingState::Eliminated;
///         }
///         self.seen += bytes.len();
///         self.state
///     }
///
///     fn state(&self) -> ProbingState {
///         self.state
///     }
///
///     fn confidence(&self) -> f32 {
///         if self.seen > 0 { 0.99 } else { 0.0 }
///     }
///
///     fn reset(&mut self) {
///         *self = NulProber { seen: 0, state: ProbingState::Detecting };
///     }
/// }
/// ```
pub trait CharsetProber {
    /// Canonical encoding name this prober currently stands for
    fn charset(&self) -> Option<&'static str>;

    /// Language implied by the current best guess, when the prober knows one
    fn language(&self) -> Option<&'static str> {
        None
    }

    /// Feed the next chunk; returns the state after the chunk
    ///
    /// Must be a no-op once the prober is eliminated.
    fn consume(&mut self, bytes: &[u8]) -> ProbingState;

    fn state(&self) -> ProbingState;

    /// Confidence in `[0.0, 1.0]`, derived from cumulative statistics only
    fn confidence(&self) -> f32;

    /// Forget everything seen so far
    fn reset(&mut self);
}
