//! File-Backed Store
//!
//! JSON-on-disk backend for single-user hosts. One file carries the engine
//! state, one the daily history; both are rewritten whole, which at one
//! state record and one history append per day stays cheap.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

use stridelock_core::DailySnapshot;

use super::{EconomyStore, PersistedState};
use crate::error::{EngineError, EngineResult};

/// File-backed economy store
pub struct FileStore {
    /// Base directory for all files
    base_path: PathBuf,
    /// Engine state file
    state_path: PathBuf,
    /// Daily history file
    history_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at a directory, creating it if needed
    pub async fn new(base_path: impl Into<PathBuf>) -> EngineResult<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await.map_err(|e| {
            EngineError::storage(format!(
                "Failed to create directory {:?}: {e}",
                base_path
            ))
        })?;

        let state_path = base_path.join("state.json");
        let history_path = base_path.join("daily_history.json");

        Ok(Self {
            base_path,
            state_path,
            history_path,
        })
    }

    /// The directory this store writes under
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &PathBuf) -> EngineResult<Option<T>> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EngineError::storage(format!(
                "Failed to read {:?}: {e}",
                path
            ))),
        }
    }

    async fn write_json<T: Serialize>(&self, path: &PathBuf, value: &T) -> EngineResult<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        fs::write(path, bytes).await.map_err(|e| {
            EngineError::storage(format!("Failed to write {:?}: {e}", path))
        })
    }
}

#[async_trait]
impl EconomyStore for FileStore {
    async fn load(&self) -> EngineResult<Option<PersistedState>> {
        self.read_json(&self.state_path).await
    }

    async fn save(&self, state: &PersistedState) -> EngineResult<()> {
        self.write_json(&self.state_path, state).await
    }

    async fn append_snapshot(&self, snapshot: &DailySnapshot) -> EngineResult<()> {
        let mut history: Vec<DailySnapshot> = self
            .read_json(&self.history_path)
            .await?
            .unwrap_or_default();
        history.push(snapshot.clone());
        self.write_json(&self.history_path, &history).await
    }

    async fn snapshots(&self, limit: usize) -> EngineResult<Vec<DailySnapshot>> {
        let history: Vec<DailySnapshot> = self
            .read_json(&self.history_path)
            .await?
            .unwrap_or_default();
        Ok(history.into_iter().rev().take(limit).collect())
    }
}
