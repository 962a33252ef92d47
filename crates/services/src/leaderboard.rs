use std::sync::Arc;

use drill_core::model::{LeaderboardFilter, Record};
use storage::repository::KeyValueStore;

use crate::error::LeaderboardError;

/// Retention and view limits for the leaderboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeaderboardPolicy {
    /// Records kept in storage after each append.
    pub capacity: usize,
    /// Records returned by a query.
    pub view_limit: usize,
}

impl Default for LeaderboardPolicy {
    fn default() -> Self {
        Self {
            capacity: 50,
            view_limit: 10,
        }
    }
}

/// Sort descending by rate, keeping insertion order among ties, then cap.
pub fn rank_records(records: &mut Vec<Record>, capacity: usize) {
    // `sort_by` is stable, which is what keeps ties in insertion order.
    records.sort_by(|a, b| b.rank_rate().total_cmp(&a.rank_rate()));
    records.truncate(capacity);
}

/// Ranked session records persisted as one JSON array under a single key.
#[derive(Clone)]
pub struct LeaderboardStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    policy: LeaderboardPolicy,
}

impl LeaderboardStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            policy: LeaderboardPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: LeaderboardPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn policy(&self) -> LeaderboardPolicy {
        self.policy
    }

    /// Load all stored records in rank order.
    ///
    /// Missing or unparsable data reads as an empty leaderboard.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError::Storage` if the backend cannot be read.
    pub async fn load(&self) -> Result<Vec<Record>, LeaderboardError> {
        let Some(raw) = self.kv.load(&self.key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Record>>(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "discarding unreadable leaderboard");
                Ok(Vec::new())
            }
        }
    }

    /// Insert a record, re-rank, truncate to capacity and persist.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError` if the records cannot be read, encoded or stored.
    pub async fn append(&self, record: Record) -> Result<(), LeaderboardError> {
        let mut records = self.load().await?;
        records.push(record);
        rank_records(&mut records, self.policy.capacity);

        let encoded = serde_json::to_string(&records)?;
        self.kv.save(&self.key, &encoded).await?;
        tracing::info!(key = %self.key, stored = records.len(), "leaderboard record appended");
        Ok(())
    }

    /// Top records matching `filter`, in stored rank order.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError::Storage` if the backend cannot be read.
    pub async fn query(&self, filter: LeaderboardFilter) -> Result<Vec<Record>, LeaderboardError> {
        let records = self.load().await?;
        Ok(records
            .into_iter()
            .filter(|record| filter.matches(record))
            .take(self.policy.view_limit)
            .collect())
    }

    /// Erase every stored record. Confirmation is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError::Storage` if the backend cannot be written.
    pub async fn clear(&self) -> Result<(), LeaderboardError> {
        self.kv.remove(&self.key).await?;
        tracing::info!(key = %self.key, "leaderboard cleared");
        Ok(())
    }
}

impl std::fmt::Debug for LeaderboardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardStore")
            .field("key", &self.key)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::model::OperationType;
    use storage::repository::InMemoryStore;

    const KEY: &str = "records";

    fn record(operation: OperationType, rate: Option<f64>, date: &str) -> Record {
        Record {
            operation,
            digits: "2 max".into(),
            problems: 10,
            time: "1:00".into(),
            accuracy: 100.0,
            problems_per_min: rate,
            date: date.into(),
            total_time_ms: 60_000,
        }
    }

    fn store(kv: InMemoryStore) -> LeaderboardStore {
        LeaderboardStore::new(Arc::new(kv), KEY)
    }

    #[tokio::test]
    async fn missing_data_loads_empty() {
        let board = store(InMemoryStore::new());
        assert!(board.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_data_loads_empty() {
        let board = store(InMemoryStore::with_entry(KEY, "{not json"));
        assert!(board.load().await.unwrap().is_empty());

        let board = store(InMemoryStore::with_entry(KEY, r#"[{"operation":"modulo"}]"#));
        assert!(board.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_data_is_replaced_on_append() {
        let board = store(InMemoryStore::with_entry(KEY, "garbage"));
        board
            .append(record(OperationType::Addition, Some(5.0), "a"))
            .await
            .unwrap();
        assert_eq!(board.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn append_sorts_descending_and_keeps_tie_order() {
        let board = store(InMemoryStore::new());
        board.append(record(OperationType::Addition, Some(10.0), "first")).await.unwrap();
        board.append(record(OperationType::Addition, Some(20.0), "fast")).await.unwrap();
        board.append(record(OperationType::Addition, Some(10.0), "second")).await.unwrap();
        board.append(record(OperationType::Addition, Some(5.0), "slow")).await.unwrap();

        let dates: Vec<_> = board.load().await.unwrap().into_iter().map(|r| r.date).collect();
        assert_eq!(dates, ["fast", "first", "second", "slow"]);
    }

    #[tokio::test]
    async fn undefined_rate_ranks_first() {
        let board = store(InMemoryStore::new());
        board.append(record(OperationType::Addition, Some(99.0), "finite")).await.unwrap();
        board.append(record(OperationType::Addition, None, "instant")).await.unwrap();

        let records = board.load().await.unwrap();
        assert_eq!(records[0].date, "instant");
        assert_eq!(records[0].problems_per_min, None);
    }

    #[tokio::test]
    async fn retains_at_most_capacity_records() {
        let board = store(InMemoryStore::new());
        for i in 0..60_u32 {
            let rate = f64::from(i % 7);
            board
                .append(record(OperationType::Addition, Some(rate), &i.to_string()))
                .await
                .unwrap();
        }

        let records = board.load().await.unwrap();
        assert_eq!(records.len(), 50);
        assert!(
            records
                .windows(2)
                .all(|pair| pair[0].rank_rate() >= pair[1].rank_rate())
        );
    }

    #[tokio::test]
    async fn query_filters_and_limits_in_rank_order() {
        let board = store(InMemoryStore::new());
        for i in 0..12_u32 {
            board
                .append(record(OperationType::Division, Some(f64::from(i)), "div"))
                .await
                .unwrap();
        }
        board.append(record(OperationType::Mixed, Some(100.0), "mixed")).await.unwrap();

        let all = board.query(LeaderboardFilter::All).await.unwrap();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0].operation, OperationType::Mixed);

        let division = board
            .query(LeaderboardFilter::Operation(OperationType::Division))
            .await
            .unwrap();
        assert_eq!(division.len(), 10);
        assert_eq!(division[0].problems_per_min, Some(11.0));
        assert!(division.iter().all(|r| r.operation == OperationType::Division));

        let subtraction = board
            .query(LeaderboardFilter::Operation(OperationType::Subtraction))
            .await
            .unwrap();
        assert!(subtraction.is_empty());
    }

    #[tokio::test]
    async fn clear_erases_everything() {
        let kv = InMemoryStore::new();
        let board = store(kv.clone());
        board.append(record(OperationType::Addition, Some(1.0), "x")).await.unwrap();
        board.clear().await.unwrap();

        assert!(board.load().await.unwrap().is_empty());
        assert_eq!(kv.load(KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn custom_policy_changes_limits() {
        let board = store(InMemoryStore::new()).with_policy(LeaderboardPolicy {
            capacity: 3,
            view_limit: 2,
        });
        for i in 0..5_u32 {
            board
                .append(record(OperationType::Addition, Some(f64::from(i)), "r"))
                .await
                .unwrap();
        }
        assert_eq!(board.load().await.unwrap().len(), 3);
        assert_eq!(board.query(LeaderboardFilter::All).await.unwrap().len(), 2);
    }
}
