use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ConfigError, DrillConfig, OperationType};

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Round to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Elapsed time as `m:ss` (minutes unpadded), e.g. `"1:05"`.
#[must_use]
pub fn format_elapsed_label(elapsed_millis: i64) -> String {
    let elapsed = elapsed_millis.max(0);
    let minutes = elapsed / 60_000;
    let seconds = (elapsed % 60_000) / 1_000;
    format!("{minutes}:{seconds:02}")
}

/// Completion date as `M/D/YYYY`.
#[must_use]
pub fn format_record_date(at: DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y").to_string()
}

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// Aggregate statistics of a finished session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionResults {
    pub elapsed_millis: i64,
    pub correct_count: u32,
    pub total_problems: u32,
    /// Percentage of correct answers, one decimal.
    pub accuracy_percent: f64,
    /// Problems per minute, one decimal. `None` when no time elapsed.
    pub problems_per_minute: Option<f64>,
}

impl SessionResults {
    /// Compute session stats.
    ///
    /// A zero `total_problems` reads as 0% accuracy; zero elapsed time leaves
    /// the rate undefined (`None`).
    #[must_use]
    pub fn compute(correct_count: u32, total_problems: u32, elapsed_millis: i64) -> Self {
        let accuracy_percent = if total_problems == 0 {
            0.0
        } else {
            round1(f64::from(correct_count) / f64::from(total_problems) * 100.0)
        };

        let problems_per_minute = (elapsed_millis > 0).then(|| {
            // Session lengths are human timescales; no precision concern.
            #[allow(clippy::cast_precision_loss)]
            let minutes = elapsed_millis as f64 / MILLIS_PER_MINUTE;
            round1(f64::from(total_problems) / minutes)
        });

        Self {
            elapsed_millis,
            correct_count,
            total_problems,
            accuracy_percent,
            problems_per_minute,
        }
    }

    #[must_use]
    pub fn elapsed_label(&self) -> String {
        format_elapsed_label(self.elapsed_millis)
    }
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Persisted summary of one completed session, as stored in the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub operation: OperationType,
    pub digits: String,
    pub problems: u32,
    pub time: String,
    pub accuracy: f64,
    /// `null` in storage when the session took no measurable time.
    pub problems_per_min: Option<f64>,
    pub date: String,
    pub total_time_ms: i64,
}

impl Record {
    #[must_use]
    pub fn from_results(
        config: &DrillConfig,
        results: &SessionResults,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            operation: config.operation_type(),
            digits: config.digits_label(),
            problems: results.total_problems,
            time: results.elapsed_label(),
            accuracy: results.accuracy_percent,
            problems_per_min: results.problems_per_minute,
            date: format_record_date(completed_at),
            total_time_ms: results.elapsed_millis,
        }
    }

    /// Rate used for ranking; an undefined rate sorts above every finite one.
    #[must_use]
    pub fn rank_rate(&self) -> f64 {
        self.problems_per_min.unwrap_or(f64::INFINITY)
    }
}

//
// ─── FILTER ────────────────────────────────────────────────────────────────────
//

/// Leaderboard view filter: everything, or one configured operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderboardFilter {
    #[default]
    All,
    Operation(OperationType),
}

impl LeaderboardFilter {
    #[must_use]
    pub fn matches(self, record: &Record) -> bool {
        match self {
            LeaderboardFilter::All => true,
            LeaderboardFilter::Operation(op) => record.operation == op,
        }
    }
}

impl fmt::Display for LeaderboardFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaderboardFilter::All => f.write_str("all"),
            LeaderboardFilter::Operation(op) => fmt::Display::fmt(op, f),
        }
    }
}

impl FromStr for LeaderboardFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(LeaderboardFilter::All);
        }
        s.parse().map(LeaderboardFilter::Operation)
    }
}
