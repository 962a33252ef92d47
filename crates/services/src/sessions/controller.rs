use chrono::{DateTime, Utc};
use rand::Rng;
use rand::rngs::StdRng;
use std::fmt;

use drill_core::Clock;
use drill_core::generator::ProblemGenerator;
use drill_core::model::{
    Answer, AnswerCheck, DrillConfig, Problem, Record, SessionResults, check_answer,
};
use drill_core::time::millis_between;

use super::progress::SessionProgress;
use super::task::{Epoch, PendingAdvance, Ticker};
use crate::error::SessionError;

//
// ─── PUBLIC RESULTS ────────────────────────────────────────────────────────────
//

/// Coarse lifecycle state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Configuring,
    InProgress,
    Completed,
}

/// Outcome of a submitted answer, with the canonical answer for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub expected: Answer,
}

/// What `advance()` led to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdvanceOutcome {
    /// The problem at `index` is now current.
    Next { index: usize },
    Completed(SessionResults),
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

struct ActiveSession {
    config: DrillConfig,
    problems: Vec<Problem>,
    current_index: usize,
    correct_count: u32,
    started_at: DateTime<Utc>,
    answered_current: bool,
}

struct CompletedSession {
    session: ActiveSession,
    completed_at: DateTime<Utc>,
    results: SessionResults,
    recorded: bool,
}

enum Phase {
    Configuring,
    InProgress(ActiveSession),
    Completed(CompletedSession),
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives one practice session at a time: configure, answer problems in order,
/// then read the results.
///
/// The controller never advances on its own. Callers either `advance()`
/// directly or schedule a [`PendingAdvance`] and run it later; a pending token
/// from an abandoned session does nothing.
pub struct SessionController<R = StdRng> {
    clock: Clock,
    generator: ProblemGenerator<R>,
    epoch: Epoch,
    phase: Phase,
}

impl SessionController<StdRng> {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self::with_generator(clock, ProblemGenerator::new())
    }
}

impl<R: Rng> SessionController<R> {
    #[must_use]
    pub fn with_generator(clock: Clock, generator: ProblemGenerator<R>) -> Self {
        Self {
            clock,
            generator,
            epoch: Epoch::default(),
            phase: Phase::Configuring,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Mutable access to the clock, e.g. to advance a fixed clock in tests.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self.phase {
            Phase::Configuring => SessionPhase::Configuring,
            Phase::InProgress(_) => SessionPhase::InProgress,
            Phase::Completed(_) => SessionPhase::Completed,
        }
    }

    /// Generate every problem for `config` and begin timing.
    ///
    /// Restarting from any phase discards the previous session.
    pub fn start(&mut self, config: DrillConfig) {
        let problems = self.generator.generate_set(&config);
        let started_at = self.clock.now();
        self.epoch = self.epoch.next();
        tracing::info!(
            operation = %config.operation_type(),
            max_digits = config.max_digits(),
            problems = problems.len(),
            "practice session started"
        );
        self.phase = Phase::InProgress(ActiveSession {
            config,
            problems,
            current_index: 0,
            correct_count: 0,
            started_at,
            answered_current: false,
        });
    }

    /// Abandon any session and return to configuration. Always safe.
    ///
    /// Outstanding [`PendingAdvance`] and [`Ticker`] tokens become inert.
    pub fn back_to_configuring(&mut self) {
        self.epoch = self.epoch.next();
        if !matches!(self.phase, Phase::Configuring) {
            tracing::debug!("session discarded");
        }
        self.phase = Phase::Configuring;
    }

    #[must_use]
    pub fn config(&self) -> Option<&DrillConfig> {
        self.session().map(|s| &s.config)
    }

    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        self.session().map_or(&[], |s| s.problems.as_slice())
    }

    /// The problem awaiting an answer, while in progress.
    #[must_use]
    pub fn current_problem(&self) -> Option<&Problem> {
        match &self.phase {
            Phase::InProgress(s) => s.problems.get(s.current_index),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.session().map(|s| s.current_index)
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.session().map_or(0, |s| s.correct_count)
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        let is_complete = matches!(self.phase, Phase::Completed(_));
        self.session()
            .map(|s| SessionProgress::new(s.problems.len(), s.current_index, is_complete))
    }

    /// Milliseconds since the session started; frozen once completed, zero
    /// while configuring.
    #[must_use]
    pub fn elapsed_millis(&self) -> i64 {
        match &self.phase {
            Phase::Configuring => 0,
            Phase::InProgress(s) => self.clock.millis_since(s.started_at),
            Phase::Completed(c) => c.results.elapsed_millis,
        }
    }

    /// Check typed input against the current problem.
    ///
    /// Blank input is ignored and returns `Ok(None)`. Unparsable input counts
    /// as incorrect.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside a running session.
    /// Returns `SessionError::AlreadyAnswered` if the current problem already
    /// received an answer.
    pub fn submit_answer(
        &mut self,
        raw_input: &str,
    ) -> Result<Option<AnswerFeedback>, SessionError> {
        let Phase::InProgress(session) = &mut self.phase else {
            return Err(SessionError::NotInProgress);
        };
        if raw_input.trim().is_empty() {
            return Ok(None);
        }
        if session.answered_current {
            return Err(SessionError::AlreadyAnswered);
        }
        let Some(problem) = session.problems.get(session.current_index) else {
            return Err(SessionError::NotInProgress);
        };

        let expected = problem.answer();
        let correct = match check_answer(&expected, raw_input) {
            AnswerCheck::Blank => return Ok(None),
            AnswerCheck::Correct => true,
            AnswerCheck::Incorrect => false,
        };

        session.answered_current = true;
        if correct {
            session.correct_count += 1;
        }
        tracing::debug!(index = session.current_index, correct, "answer submitted");

        Ok(Some(AnswerFeedback { correct, expected }))
    }

    /// Move to the next problem, completing the session after the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside a running session.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        let Phase::InProgress(session) = &mut self.phase else {
            return Err(SessionError::NotInProgress);
        };

        session.current_index += 1;
        session.answered_current = false;
        if session.current_index < session.problems.len() {
            return Ok(AdvanceOutcome::Next {
                index: session.current_index,
            });
        }

        let completed_at = self.clock.now();
        let Phase::InProgress(session) = std::mem::replace(&mut self.phase, Phase::Configuring)
        else {
            return Err(SessionError::NotInProgress);
        };
        let results = compute_session_results(&session, completed_at);
        tracing::info!(
            correct = results.correct_count,
            total = results.total_problems,
            elapsed_ms = results.elapsed_millis,
            "practice session completed"
        );
        self.phase = Phase::Completed(CompletedSession {
            session,
            completed_at,
            results,
            recorded: false,
        });

        Ok(AdvanceOutcome::Completed(results))
    }

    /// Final statistics of a completed session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` unless the session has completed.
    pub fn compute_results(&self) -> Result<SessionResults, SessionError> {
        match &self.phase {
            Phase::Completed(c) => Ok(c.results),
            _ => Err(SessionError::NotCompleted),
        }
    }

    /// Leaderboard record for the completed session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` unless the session has completed.
    pub fn record(&self) -> Result<Record, SessionError> {
        match &self.phase {
            Phase::Completed(c) => Ok(Record::from_results(
                &c.session.config,
                &c.results,
                c.completed_at,
            )),
            _ => Err(SessionError::NotCompleted),
        }
    }

    #[must_use]
    pub fn is_recorded(&self) -> bool {
        matches!(&self.phase, Phase::Completed(c) if c.recorded)
    }

    pub(crate) fn mark_recorded(&mut self) {
        if let Phase::Completed(c) = &mut self.phase {
            c.recorded = true;
        }
    }

    //
    // ─── DEFERRED WORK ─────────────────────────────────────────────────────────
    //

    /// Token for advancing past the current problem later.
    #[must_use]
    pub fn schedule_advance(&self) -> Option<PendingAdvance> {
        match &self.phase {
            Phase::InProgress(s) => Some(PendingAdvance {
                epoch: self.epoch,
                index: s.current_index,
            }),
            _ => None,
        }
    }

    /// Run a scheduled advance. Returns `None` without touching state when the
    /// token is stale: the session was restarted or abandoned, or the problem
    /// it was scheduled for is no longer current.
    pub fn run_pending(&mut self, pending: PendingAdvance) -> Option<AdvanceOutcome> {
        if pending.epoch != self.epoch || self.current_index_in_progress() != Some(pending.index) {
            tracing::debug!(index = pending.index, "stale pending advance ignored");
            return None;
        }
        self.advance().ok()
    }

    /// Token for the periodic elapsed-time display.
    #[must_use]
    pub fn ticker(&self) -> Option<Ticker> {
        matches!(self.phase, Phase::InProgress(_)).then_some(Ticker { epoch: self.epoch })
    }

    /// Elapsed millis for a live ticker; `None` once its session has left
    /// `InProgress`, which tells the caller to cancel the tick.
    #[must_use]
    pub fn tick(&self, ticker: &Ticker) -> Option<i64> {
        match &self.phase {
            Phase::InProgress(s) if ticker.epoch == self.epoch => {
                Some(self.clock.millis_since(s.started_at))
            }
            _ => None,
        }
    }

    fn current_index_in_progress(&self) -> Option<usize> {
        match &self.phase {
            Phase::InProgress(s) => Some(s.current_index),
            _ => None,
        }
    }

    fn session(&self) -> Option<&ActiveSession> {
        match &self.phase {
            Phase::Configuring => None,
            Phase::InProgress(s) => Some(s),
            Phase::Completed(c) => Some(&c.session),
        }
    }
}

fn compute_session_results(session: &ActiveSession, completed_at: DateTime<Utc>) -> SessionResults {
    let total = u32::try_from(session.problems.len()).unwrap_or(u32::MAX);
    let elapsed = millis_between(session.started_at, completed_at);
    SessionResults::compute(session.correct_count, total, elapsed)
}

impl<R> fmt::Debug for SessionController<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match &self.phase {
            Phase::Configuring => "Configuring",
            Phase::InProgress(_) => "InProgress",
            Phase::Completed(_) => "Completed",
        };
        f.debug_struct("SessionController")
            .field("clock", &self.clock)
            .field("epoch", &self.epoch)
            .field("phase", &phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
