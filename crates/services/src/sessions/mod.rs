mod controller;
mod progress;
mod task;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{AdvanceOutcome, AnswerFeedback, SessionController, SessionPhase};
pub use progress::SessionProgress;
pub use task::{PendingAdvance, Ticker};
pub use workflow::DrillLoopService;
