//! Drop Economy
//!
//! Bonus-credit source independent of activity accrual. A collaborator
//! decides where drops spawn; this side enforces the money rules: a daily
//! collection cap, a daily magnet allowance, and all-or-nothing collection.
//! Collected value flows into the ledger through the ordinary outer-world
//! accrual path.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{DEFAULT_DROP_DAILY_CAP, MAGNET_DAILY_CAP};
use crate::error::{EconomyError, EconomyResult};
use crate::ledger::{Accrual, Ledger};
use crate::types::{Category, DropId, EnergyDrop, GeoPoint};

/// Drop economy state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DropEconomy {
    /// Uncollected drops by ID
    drops: BTreeMap<DropId, EnergyDrop>,
    /// Drop value collected since the last rollover
    collected_today: u64,
    /// Magnet pulls used since the last rollover
    magnet_uses_today: u32,
    /// Daily collection cap, in credits of drop value
    daily_cap: u64,
}

impl DropEconomy {
    /// Create an empty economy with the default daily cap
    pub fn new() -> Self {
        Self::with_cap(DEFAULT_DROP_DAILY_CAP)
    }

    /// Create an empty economy with a custom daily cap
    pub fn with_cap(daily_cap: u64) -> Self {
        Self {
            drops: BTreeMap::new(),
            collected_today: 0,
            magnet_uses_today: 0,
            daily_cap,
        }
    }

    /// Register a drop the placement collaborator spawned
    pub fn place(&mut self, location: GeoPoint, value: u64, now: DateTime<Utc>) -> DropId {
        let drop = EnergyDrop::new(location, value, now);
        let id = drop.id.clone();
        self.drops.insert(id.clone(), drop);
        id
    }

    /// Collect a drop by proximity.
    ///
    /// All or nothing: a drop whose value would push today's collection past
    /// the cap is rejected whole, never partially credited. On success the
    /// value accrues to the outer-world category, which applies its own
    /// daily clamp.
    pub fn collect(&mut self, ledger: &mut Ledger, drop_id: &DropId) -> EconomyResult<Accrual> {
        let value = match self.drops.get(drop_id) {
            Some(drop) => drop.value,
            None => {
                return Err(EconomyError::invalid_state(format!(
                    "drop {drop_id} does not exist or was already collected"
                )));
            }
        };

        if self.collected_today + value > self.daily_cap {
            return Err(EconomyError::DailyCapReached {
                cap: self.daily_cap,
                collected: self.collected_today,
                attempted: value,
            });
        }

        self.drops.remove(drop_id);
        self.collected_today += value;
        let accrual = ledger.accrue(Category::OuterWorld, value);

        info!(
            drop_id = %drop_id,
            value,
            credited = accrual.credited,
            collected_today = self.collected_today,
            "drop collected"
        );

        Ok(accrual)
    }

    /// Collect a drop from afar with the magnet.
    ///
    /// Same money rules as [`DropEconomy::collect`], plus a daily allowance
    /// of pulls. A refused collection does not consume a pull.
    pub fn magnet_pull(&mut self, ledger: &mut Ledger, drop_id: &DropId) -> EconomyResult<Accrual> {
        if self.magnet_uses_today >= MAGNET_DAILY_CAP {
            return Err(EconomyError::MagnetExhausted {
                cap: MAGNET_DAILY_CAP,
            });
        }

        let accrual = self.collect(ledger, drop_id)?;
        self.magnet_uses_today += 1;

        info!(
            drop_id = %drop_id,
            uses_today = self.magnet_uses_today,
            "magnet pull"
        );

        Ok(accrual)
    }

    /// Despawn an uncollected drop (idempotent); placement strategy calls
    /// this when a drop ages out
    pub fn discard(&mut self, drop_id: &DropId) -> bool {
        self.drops.remove(drop_id).is_some()
    }

    /// Reset the daily counters; runs with the ledger's day rollover
    pub fn reset_daily_counters(&mut self) {
        self.collected_today = 0;
        self.magnet_uses_today = 0;
    }

    /// Drop value collected since the last rollover
    pub fn collected_today(&self) -> u64 {
        self.collected_today
    }

    /// Magnet pulls used since the last rollover
    pub fn magnet_uses_today(&self) -> u32 {
        self.magnet_uses_today
    }

    /// Magnet pulls left today
    pub fn magnet_uses_left(&self) -> u32 {
        MAGNET_DAILY_CAP.saturating_sub(self.magnet_uses_today)
    }

    /// The daily collection cap
    pub fn daily_cap(&self) -> u64 {
        self.daily_cap
    }

    /// Replace the daily collection cap
    pub fn set_daily_cap(&mut self, daily_cap: u64) {
        self.daily_cap = daily_cap;
    }

    /// Get an uncollected drop
    pub fn get_drop(&self, drop_id: &DropId) -> Option<&EnergyDrop> {
        self.drops.get(drop_id)
    }

    /// All uncollected drops
    pub fn drops(&self) -> impl Iterator<Item = &EnergyDrop> {
        self.drops.values()
    }

    /// Uncollected drops within `radius_m` meters of a point, for the map
    pub fn drops_near(&self, center: GeoPoint, radius_m: f64) -> Vec<&EnergyDrop> {
        self.drops
            .values()
            .filter(|d| d.location.distance_meters(&center) <= radius_m)
            .collect()
    }
}

impl Default for DropEconomy {
    fn default() -> Self {
        Self::new()
    }
}
