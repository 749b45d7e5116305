//! Daily Snapshots
//!
//! Immutable record of one completed economic day, emitted exactly once when
//! the ledger rolls past a day boundary.

use serde::{Deserialize, Serialize};

use crate::clock::DayKey;

/// Totals for one completed day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySnapshot {
    /// Day the totals belong to
    pub day_key: DayKey,

    /// Credits earned during the day, after caps
    pub earned: u64,

    /// Credits spent during the day
    pub spent: u64,
}

impl DailySnapshot {
    pub fn new(day_key: DayKey, earned: u64, spent: u64) -> Self {
        Self {
            day_key,
            earned,
            spent,
        }
    }

    /// Net credit movement for the day; negative when spending outpaced
    /// earning (possible when a prior day's balance was drawn down)
    pub fn net(&self) -> i64 {
        self.earned as i64 - self.spent as i64
    }
}
