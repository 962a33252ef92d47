//! Tokens for work scheduled outside the controller: the delayed advance after
//! an answer and the periodic elapsed-time tick.
//!
//! Every token captures the controller epoch at creation. The epoch moves on
//! each `start` and `back_to_configuring`, so a token from an abandoned
//! session is inert when it finally fires.

/// Monotonic session generation counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Epoch(u64);

impl Epoch {
    #[must_use]
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A deferred `advance()` for the problem at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAdvance {
    pub(crate) epoch: Epoch,
    pub(crate) index: usize,
}

impl PendingAdvance {
    /// Problem index the advance was scheduled for.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Handle for the periodic elapsed-time display tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    pub(crate) epoch: Epoch,
}

impl Ticker {
    /// Recommended interval between ticks.
    pub const INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);
}
