use std::env;

use crate::leaderboard::LeaderboardPolicy;

pub const DEFAULT_DB_URL: &str = "sqlite:drill.sqlite3";
pub const DEFAULT_LEADERBOARD_KEY: &str = "suanpanRecords";

/// Environment-driven settings for wiring services to storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServicesConfig {
    pub db_url: String,
    pub leaderboard_key: String,
    pub leaderboard_policy: LeaderboardPolicy,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.into(),
            leaderboard_key: DEFAULT_LEADERBOARD_KEY.into(),
            leaderboard_policy: LeaderboardPolicy::default(),
        }
    }
}

impl ServicesConfig {
    /// Read `DRILL_DB_URL` and `DRILL_LEADERBOARD_KEY`, falling back to defaults
    /// for unset or blank values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            db_url: non_blank("DRILL_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.into()),
            leaderboard_key: non_blank("DRILL_LEADERBOARD_KEY")
                .unwrap_or_else(|| DEFAULT_LEADERBOARD_KEY.into()),
            leaderboard_policy: LeaderboardPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_defaults() {
        let config = ServicesConfig::from_lookup(|_| None);
        assert_eq!(config, ServicesConfig::default());
    }

    #[test]
    fn reads_overrides_and_ignores_blank_values() {
        let config = ServicesConfig::from_lookup(|name| match name {
            "DRILL_DB_URL" => Some("sqlite::memory:".into()),
            "DRILL_LEADERBOARD_KEY" => Some("  ".into()),
            _ => None,
        });
        assert_eq!(config.db_url, "sqlite::memory:");
        assert_eq!(config.leaderboard_key, DEFAULT_LEADERBOARD_KEY);
    }
}
