//! Credit Ledger
//!
//! Single bookkeeping authority for the credit economy. Earning and spending
//! are the only two mutators; balance is derived from lifetime totals and is
//! clamped at zero. Daily counters are keyed by [`DayKey`] and reset through
//! [`Ledger::rollover_if_new_day`], which callers run before any other
//! mutation in a given call.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::DayKey;
use crate::constants::{
    DEFAULT_OUTER_WORLD_DAILY_MAX, DEFAULT_SLEEP_DAILY_MAX, DEFAULT_STEPS_DAILY_MAX,
    DEFAULT_WELLBEING_DAILY_MAX,
};
use crate::error::{EconomyError, EconomyResult};
use crate::types::{Category, DailySnapshot, TargetId};

/// Per-category daily accrual maxima, in credits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCaps {
    pub steps: u64,
    pub sleep: u64,
    pub wellbeing: u64,
    pub outer_world: u64,
}

impl CategoryCaps {
    /// Get the cap for a category
    pub fn cap(&self, category: Category) -> u64 {
        match category {
            Category::Steps => self.steps,
            Category::Sleep => self.sleep,
            Category::Wellbeing => self.wellbeing,
            Category::OuterWorld => self.outer_world,
        }
    }
}

impl Default for CategoryCaps {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS_DAILY_MAX,
            sleep: DEFAULT_SLEEP_DAILY_MAX,
            wellbeing: DEFAULT_WELLBEING_DAILY_MAX,
            outer_world: DEFAULT_OUTER_WORLD_DAILY_MAX,
        }
    }
}

/// Outcome of one accrual: the portion credited and the portion the daily
/// cap discarded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accrual {
    /// Credits actually added to the balance
    pub credited: u64,
    /// Credits discarded because the category was already at its cap
    pub discarded: u64,
}

/// Credit ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Day the daily counters belong to
    day_key: DayKey,
    /// Per-category daily maxima
    caps: CategoryCaps,
    /// Lifetime credits earned, after caps
    total_earned: u64,
    /// Lifetime credits spent; never exceeds `total_earned`
    total_spent: u64,
    /// Credits earned since the last rollover
    earned_today: u64,
    /// Credits spent since the last rollover
    spent_today: u64,
    /// Today's earnings broken down by category
    earned_today_by_category: BTreeMap<Category, u64>,
    /// Lifetime credits spent unlocking each target; never reset
    lifetime_spent: BTreeMap<TargetId, u64>,
}

impl Ledger {
    /// Create an empty ledger anchored to a day
    pub fn new(day_key: DayKey) -> Self {
        Self::with_caps(day_key, CategoryCaps::default())
    }

    /// Create an empty ledger with custom daily maxima
    pub fn with_caps(day_key: DayKey, caps: CategoryCaps) -> Self {
        Self {
            day_key,
            caps,
            total_earned: 0,
            total_spent: 0,
            earned_today: 0,
            spent_today: 0,
            earned_today_by_category: BTreeMap::new(),
            lifetime_spent: BTreeMap::new(),
        }
    }

    /// Spendable balance; zero-clamped
    pub fn balance(&self) -> u64 {
        self.total_earned.saturating_sub(self.total_spent)
    }

    /// Credit earnings to a category.
    ///
    /// Always succeeds. The credited portion is clamped to the category's
    /// remaining daily headroom; the excess is discarded, never carried over.
    pub fn accrue(&mut self, category: Category, amount: u64) -> Accrual {
        let today = self
            .earned_today_by_category
            .get(&category)
            .copied()
            .unwrap_or(0);
        let headroom = self.caps.cap(category).saturating_sub(today);
        let credited = amount.min(headroom);
        let discarded = amount - credited;

        if credited > 0 {
            self.earned_today_by_category
                .insert(category, today + credited);
            self.earned_today += credited;
            self.total_earned += credited;
        }

        debug!(
            category = %category,
            credited,
            discarded,
            balance = self.balance(),
            "credits accrued"
        );

        Accrual {
            credited,
            discarded,
        }
    }

    /// Deduct from the balance, all or nothing.
    ///
    /// Fails with [`EconomyError::InsufficientBalance`] and leaves every
    /// counter untouched when the balance cannot cover `amount`.
    pub fn try_spend(&mut self, amount: u64) -> EconomyResult<()> {
        let available = self.balance();
        if amount > available {
            return Err(EconomyError::InsufficientBalance {
                required: amount,
                available,
            });
        }

        self.total_spent += amount;
        self.spent_today += amount;

        debug!(amount, balance = self.balance(), "credits spent");
        Ok(())
    }

    /// Record a committed spend against the targets it unlocked.
    ///
    /// Each target carries the full purchase cost; the totals answer "how
    /// much has unlocking this target ever cost", not a pro-rata share.
    pub fn attribute_spend<'a>(
        &mut self,
        targets: impl IntoIterator<Item = &'a TargetId>,
        amount: u64,
    ) {
        for target in targets {
            *self.lifetime_spent.entry(target.clone()).or_insert(0) += amount;
        }
    }

    /// Close out the tracked day if `now_key` has moved past it.
    ///
    /// Returns the snapshot of the completed day on a transition, `None`
    /// otherwise. A gap of several days still produces exactly one snapshot,
    /// for the last tracked day. A `now_key` at or behind the tracked day
    /// (possible right after a cutover change) is a no-op.
    pub fn rollover_if_new_day(&mut self, now_key: &DayKey) -> Option<DailySnapshot> {
        if *now_key <= self.day_key {
            return None;
        }

        let snapshot = DailySnapshot::new(
            self.day_key.clone(),
            self.earned_today,
            self.spent_today,
        );

        info!(
            closed_day = %self.day_key,
            new_day = %now_key,
            earned = snapshot.earned,
            spent = snapshot.spent,
            "day rolled over"
        );

        self.day_key = now_key.clone();
        self.earned_today = 0;
        self.spent_today = 0;
        self.earned_today_by_category.clear();

        Some(snapshot)
    }

    /// Fraction of today's earnings already spent, in `[0, 1]`.
    ///
    /// Presentation-only: drives the decay animation of the energy pool.
    /// Spending carried-over balance can outrun today's earnings, so the
    /// ratio is capped at one; zero before anything is earned today.
    pub fn decay_ratio(&self) -> Decimal {
        if self.earned_today == 0 {
            return Decimal::ZERO;
        }
        let ratio = Decimal::from(self.spent_today) / Decimal::from(self.earned_today);
        ratio.min(Decimal::ONE)
    }

    /// Get the tracked day
    pub fn day_key(&self) -> &DayKey {
        &self.day_key
    }

    /// Credits earned since the last rollover
    pub fn earned_today(&self) -> u64 {
        self.earned_today
    }

    /// Credits spent since the last rollover
    pub fn spent_today(&self) -> u64 {
        self.spent_today
    }

    /// Today's earnings for one category
    pub fn earned_today_for(&self, category: Category) -> u64 {
        self.earned_today_by_category
            .get(&category)
            .copied()
            .unwrap_or(0)
    }

    /// Lifetime credits spent unlocking a target
    pub fn lifetime_spent_for(&self, target: &TargetId) -> u64 {
        self.lifetime_spent.get(target).copied().unwrap_or(0)
    }

    /// Lifetime credits earned
    pub fn total_earned(&self) -> u64 {
        self.total_earned
    }

    /// Lifetime credits spent
    pub fn total_spent(&self) -> u64 {
        self.total_spent
    }

    /// Get the daily maxima
    pub fn caps(&self) -> &CategoryCaps {
        &self.caps
    }

    /// Replace the daily maxima; applies to headroom checks from the next
    /// accrual on, today's already-credited totals stand
    pub fn set_caps(&mut self, caps: CategoryCaps) {
        self.caps = caps;
    }
}
