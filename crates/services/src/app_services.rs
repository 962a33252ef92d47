use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::config::ServicesConfig;
use crate::error::AppServicesError;
use crate::leaderboard::LeaderboardStore;
use crate::sessions::DrillLoopService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone, Debug)]
pub struct DrillServices {
    leaderboard: Arc<LeaderboardStore>,
    drill_loop: Arc<DrillLoopService>,
}

impl DrillServices {
    /// Build services backed by `SQLite` storage at `config.db_url`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        config: &ServicesConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(&config.db_url).await?;
        Ok(Self::from_storage(&storage, config, clock))
    }

    /// Build services over a volatile in-memory store.
    #[must_use]
    pub fn in_memory(config: &ServicesConfig, clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), config, clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, config: &ServicesConfig, clock: Clock) -> Self {
        let leaderboard = Arc::new(
            LeaderboardStore::new(Arc::clone(&storage.kv), config.leaderboard_key.clone())
                .with_policy(config.leaderboard_policy),
        );
        let drill_loop = Arc::new(DrillLoopService::new(clock, Arc::clone(&leaderboard)));
        Self {
            leaderboard,
            drill_loop,
        }
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardStore> {
        Arc::clone(&self.leaderboard)
    }

    #[must_use]
    pub fn drill_loop(&self) -> Arc<DrillLoopService> {
        Arc::clone(&self.drill_loop)
    }
}
