//! Persistence Boundary
//!
//! Trait definitions and backends for durable engine state. The engine
//! writes the whole state after each committed mutation and appends one
//! record per completed day; it assumes at-least-once durability of the
//! last write and leaves flush timing to the host.

pub mod file;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use stridelock_core::{
    AutomationTracker, DailySnapshot, DayBoundary, DropEconomy, GroupRegistry, Ledger,
    SessionManager,
};

use crate::error::EngineResult;

// Re-export backends
pub use file::FileStore;
pub use memory::MemoryStore;

/// Durable engine state.
///
/// Everything the engine needs to resume after a restart. The cost table is
/// deliberately absent: pricing comes from configuration on every boot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Day boundary, including any user cutover change
    pub boundary: DayBoundary,
    /// Credit ledger
    pub ledger: Ledger,
    /// Target groups
    pub registry: GroupRegistry,
    /// Unlock sessions
    pub sessions: SessionManager,
    /// Automation states
    pub automation: AutomationTracker,
    /// Drop economy state
    pub drops: DropEconomy,
}

/// Economy store - durable state and daily history
#[async_trait]
pub trait EconomyStore: Send + Sync {
    /// Load the persisted state, if any
    async fn load(&self) -> EngineResult<Option<PersistedState>>;

    /// Replace the persisted state
    async fn save(&self, state: &PersistedState) -> EngineResult<()>;

    /// Append one completed day's record
    async fn append_snapshot(&self, snapshot: &DailySnapshot) -> EngineResult<()>;

    /// Most recent daily records, newest first, at most `limit`
    async fn snapshots(&self, limit: usize) -> EngineResult<Vec<DailySnapshot>>;
}
