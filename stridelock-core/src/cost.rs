//! Cost Model
//!
//! Prices an unlock purchase as `base_cost(window) * factor(difficulty)`,
//! rounded half-to-even and floored at [`MIN_UNLOCK_COST`]. Longer windows
//! are deliberately cheaper per minute than short ones, so committing to a
//! long unlock up front beats chaining short ones.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_UNLOCK_COST;
use crate::error::{EconomyError, EconomyResult};
use crate::types::{AccessWindow, DifficultyLevel};

/// Raw pricing numbers: a base cost per window and a multiplier per
/// difficulty tier
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostTable {
    /// Base cost in credits for each window at the reference difficulty
    pub base_costs: BTreeMap<AccessWindow, u64>,

    /// Multiplier applied to the base cost for each difficulty tier
    pub difficulty_factors: BTreeMap<DifficultyLevel, Decimal>,
}

impl Default for CostTable {
    fn default() -> Self {
        let base_costs = BTreeMap::from([
            (AccessWindow::Single, 1),
            (AccessWindow::Minutes5, 6),
            (AccessWindow::Minutes10, 10),
            (AccessWindow::Minutes15, 14),
            (AccessWindow::Minutes30, 24),
            (AccessWindow::Hour1, 40),
            (AccessWindow::Hour2, 70),
            (AccessWindow::Day1, 200),
        ]);

        let difficulty_factors = BTreeMap::from([
            (DifficultyLevel::Casual, Decimal::new(5, 1)),
            (DifficultyLevel::Light, Decimal::new(75, 2)),
            (DifficultyLevel::Balanced, Decimal::ONE),
            (DifficultyLevel::Strict, Decimal::new(15, 1)),
            (DifficultyLevel::Hardcore, Decimal::TWO),
        ]);

        Self {
            base_costs,
            difficulty_factors,
        }
    }
}

/// Cost model over a validated pricing table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Pricing table
    table: CostTable,
}

impl CostModel {
    /// Create a model from a custom table.
    ///
    /// The table must price every window at every difficulty, and the
    /// resulting costs must rise strictly with window duration and never
    /// fall as difficulty rises.
    pub fn new(table: CostTable) -> EconomyResult<Self> {
        let model = Self { table };
        model.validate()?;
        Ok(model)
    }

    /// Create a model with the default pricing table
    pub fn default_v1() -> Self {
        Self {
            table: CostTable::default(),
        }
    }

    /// Price one purchase, in whole credits
    pub fn cost(&self, window: AccessWindow, difficulty: DifficultyLevel) -> u64 {
        let base = self.table.base_costs.get(&window).copied().unwrap_or(0);
        let factor = self
            .table
            .difficulty_factors
            .get(&difficulty)
            .copied()
            .unwrap_or(Decimal::ONE);

        // round_dp rounds half to even, so x.5 prices do not drift upward.
        let rounded = (Decimal::from(base) * factor).round_dp(0);
        rounded.to_u64().unwrap_or(0).max(MIN_UNLOCK_COST)
    }

    /// Get pricing table reference
    pub fn table(&self) -> &CostTable {
        &self.table
    }

    fn validate(&self) -> EconomyResult<()> {
        for window in AccessWindow::all() {
            if !self.table.base_costs.contains_key(&window) {
                return Err(EconomyError::invalid_state(format!(
                    "cost table missing base cost for window {window}"
                )));
            }
        }
        for difficulty in DifficultyLevel::all() {
            match self.table.difficulty_factors.get(&difficulty) {
                None => {
                    return Err(EconomyError::invalid_state(format!(
                        "cost table missing factor for difficulty {}",
                        difficulty.label()
                    )));
                }
                Some(factor) if *factor <= Decimal::ZERO => {
                    return Err(EconomyError::invalid_state(format!(
                        "difficulty factor for {} must be positive",
                        difficulty.label()
                    )));
                }
                Some(_) => {}
            }
        }

        // Strictly more expensive as windows lengthen, at every difficulty.
        for difficulty in DifficultyLevel::all() {
            let windows = AccessWindow::all();
            for pair in windows.windows(2) {
                let shorter = self.cost(pair[0], difficulty);
                let longer = self.cost(pair[1], difficulty);
                if longer <= shorter {
                    return Err(EconomyError::invalid_state(format!(
                        "cost of {} ({longer}) does not exceed cost of {} ({shorter}) at difficulty {}",
                        pair[1],
                        pair[0],
                        difficulty.label()
                    )));
                }
            }
        }

        // Never cheaper as difficulty rises, at every window.
        for window in AccessWindow::all() {
            let levels = DifficultyLevel::all();
            for pair in levels.windows(2) {
                let easier = self.cost(window, pair[0]);
                let harder = self.cost(window, pair[1]);
                if harder < easier {
                    return Err(EconomyError::invalid_state(format!(
                        "cost of {window} falls from {easier} to {harder} between difficulty {} and {}",
                        pair[0].label(),
                        pair[1].label()
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::default_v1()
    }
}
