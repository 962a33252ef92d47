use std::sync::Arc;

use rand::Rng;
use rand::rngs::StdRng;

use drill_core::Clock;
use drill_core::model::Record;

use super::controller::{AdvanceOutcome, SessionController};
use super::task::PendingAdvance;
use crate::error::SessionError;
use crate::leaderboard::LeaderboardStore;

/// Orchestrates session progression and persists the record on completion.
#[derive(Clone, Debug)]
pub struct DrillLoopService {
    clock: Clock,
    leaderboard: Arc<LeaderboardStore>,
}

impl DrillLoopService {
    #[must_use]
    pub fn new(clock: Clock, leaderboard: Arc<LeaderboardStore>) -> Self {
        Self { clock, leaderboard }
    }

    #[must_use]
    pub fn leaderboard(&self) -> &LeaderboardStore {
        &self.leaderboard
    }

    /// A fresh controller in `Configuring`, sharing this service's clock.
    #[must_use]
    pub fn controller(&self) -> SessionController<StdRng> {
        SessionController::new(self.clock)
    }

    /// Advance the session and append its record when it completes.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside a running session.
    /// Returns `SessionError::Leaderboard` if the record cannot be persisted;
    /// the session stays completed and [`Self::finalize_record`] may retry.
    pub async fn advance<R: Rng>(
        &self,
        session: &mut SessionController<R>,
    ) -> Result<AdvanceOutcome, SessionError> {
        let outcome = session.advance()?;
        if matches!(outcome, AdvanceOutcome::Completed(_)) {
            self.finalize_record(session).await?;
        }
        Ok(outcome)
    }

    /// Run a deferred advance; stale tokens are a no-op returning `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Leaderboard` if the completing record cannot be persisted.
    pub async fn run_pending<R: Rng>(
        &self,
        session: &mut SessionController<R>,
        pending: PendingAdvance,
    ) -> Result<Option<AdvanceOutcome>, SessionError> {
        let Some(outcome) = session.run_pending(pending) else {
            return Ok(None);
        };
        if matches!(outcome, AdvanceOutcome::Completed(_)) {
            self.finalize_record(session).await?;
        }
        Ok(Some(outcome))
    }

    /// Persist the completed session's record once.
    ///
    /// Calling again after success returns the same record without appending
    /// a duplicate.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` if the session has not completed.
    /// Returns `SessionError::Leaderboard` if persistence fails.
    pub async fn finalize_record<R: Rng>(
        &self,
        session: &mut SessionController<R>,
    ) -> Result<Record, SessionError> {
        let record = session.record()?;
        if session.is_recorded() {
            return Ok(record);
        }
        self.leaderboard.append(record.clone()).await?;
        session.mark_recorded();
        Ok(record)
    }
}
