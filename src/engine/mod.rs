//! Detection engine: coordinator plus the session wrapper around it

mod coordinator;
mod session;

pub use coordinator::{Coordinator, CoordinatorState};
pub use session::{SessionPhase, UniversalDetector};
