#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod sessions;

pub use drill_core::Clock;
pub use sessions as session;

pub use app_services::DrillServices;
pub use config::ServicesConfig;
pub use error::{AppServicesError, LeaderboardError, SessionError};
pub use leaderboard::{LeaderboardPolicy, LeaderboardStore};
pub use sessions::{
    AdvanceOutcome, AnswerFeedback, DrillLoopService, PendingAdvance, SessionController,
    SessionPhase, SessionProgress, Ticker,
};
