//! Engine Configuration

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use stridelock_core::constants::{DEFAULT_CUTOVER_HOUR, DEFAULT_CUTOVER_MINUTE, DEFAULT_DROP_DAILY_CAP};
use stridelock_core::{CategoryCaps, CostTable};

/// Engine configuration.
///
/// Applied in full on first boot; on later boots the persisted user state
/// (cutover, caps) wins and only the cost table is taken from here, since
/// pricing is product configuration rather than user state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Day cutover time; timestamps before it belong to the previous day
    pub cutover: NaiveTime,
    /// Per-category daily accrual maxima
    pub category_caps: CategoryCaps,
    /// Daily cap on collected drop value
    pub drop_daily_cap: u64,
    /// Pricing table for the cost model
    pub cost_table: CostTable,
}

impl EngineConfig {
    /// Set the day cutover
    pub fn with_cutover(mut self, cutover: NaiveTime) -> Self {
        self.cutover = cutover;
        self
    }

    /// Set the per-category daily maxima
    pub fn with_category_caps(mut self, caps: CategoryCaps) -> Self {
        self.category_caps = caps;
        self
    }

    /// Set the daily drop collection cap
    pub fn with_drop_daily_cap(mut self, cap: u64) -> Self {
        self.drop_daily_cap = cap;
        self
    }

    /// Set the pricing table
    pub fn with_cost_table(mut self, table: CostTable) -> Self {
        self.cost_table = table;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cutover: NaiveTime::from_hms_opt(
                DEFAULT_CUTOVER_HOUR,
                DEFAULT_CUTOVER_MINUTE,
                0,
            )
            .unwrap_or_default(),
            category_caps: CategoryCaps::default(),
            drop_daily_cap: DEFAULT_DROP_DAILY_CAP,
            cost_table: CostTable::default(),
        }
    }
}
