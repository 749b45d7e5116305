//! In-Memory Store
//!
//! Non-durable backend for tests and ephemeral hosts.

use async_trait::async_trait;
use tokio::sync::RwLock;

use stridelock_core::DailySnapshot;

use super::{EconomyStore, PersistedState};
use crate::error::EngineResult;

/// In-memory economy store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<Option<PersistedState>>,
    snapshots: RwLock<Vec<DailySnapshot>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EconomyStore for MemoryStore {
    async fn load(&self) -> EngineResult<Option<PersistedState>> {
        Ok(self.state.read().await.clone())
    }

    async fn save(&self, state: &PersistedState) -> EngineResult<()> {
        *self.state.write().await = Some(state.clone());
        Ok(())
    }

    async fn append_snapshot(&self, snapshot: &DailySnapshot) -> EngineResult<()> {
        self.snapshots.write().await.push(snapshot.clone());
        Ok(())
    }

    async fn snapshots(&self, limit: usize) -> EngineResult<Vec<DailySnapshot>> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots.iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stridelock_core::DayKey;

    #[tokio::test]
    async fn test_empty_store_loads_none() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_none());
        assert!(store.snapshots(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshots_newest_first() {
        let store = MemoryStore::new();
        store
            .append_snapshot(&DailySnapshot::new(DayKey::new("2025-06-01"), 10, 5))
            .await
            .unwrap();
        store
            .append_snapshot(&DailySnapshot::new(DayKey::new("2025-06-02"), 20, 0))
            .await
            .unwrap();

        let recent = store.snapshots(1).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].day_key, DayKey::new("2025-06-02"));
    }
}
