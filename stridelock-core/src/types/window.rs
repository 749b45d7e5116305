//! Access Windows
//!
//! The purchasable durations of unlocked access. Each window carries a fixed
//! base-minute value consumed by the cost model; variant order is shortest to
//! longest so the derived `Ord` is the duration order.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// A purchasable duration of unlocked access
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AccessWindow {
    /// One quick look (~1 minute)
    Single,
    Minutes5,
    Minutes10,
    Minutes15,
    Minutes30,
    Hour1,
    Hour2,
    Day1,
}

impl AccessWindow {
    /// Base minutes of access this window grants
    pub fn base_minutes(&self) -> u32 {
        match self {
            AccessWindow::Single => 1,
            AccessWindow::Minutes5 => 5,
            AccessWindow::Minutes10 => 10,
            AccessWindow::Minutes15 => 15,
            AccessWindow::Minutes30 => 30,
            AccessWindow::Hour1 => 60,
            AccessWindow::Hour2 => 120,
            AccessWindow::Day1 => 1440,
        }
    }

    /// Granted duration
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.base_minutes()))
    }

    /// Window name for logging and error messages
    pub fn name(&self) -> &'static str {
        match self {
            AccessWindow::Single => "single",
            AccessWindow::Minutes5 => "minutes_5",
            AccessWindow::Minutes10 => "minutes_10",
            AccessWindow::Minutes15 => "minutes_15",
            AccessWindow::Minutes30 => "minutes_30",
            AccessWindow::Hour1 => "hour_1",
            AccessWindow::Hour2 => "hour_2",
            AccessWindow::Day1 => "day_1",
        }
    }

    /// All windows, shortest first
    pub fn all() -> [AccessWindow; 8] {
        [
            AccessWindow::Single,
            AccessWindow::Minutes5,
            AccessWindow::Minutes10,
            AccessWindow::Minutes15,
            AccessWindow::Minutes30,
            AccessWindow::Hour1,
            AccessWindow::Hour2,
            AccessWindow::Day1,
        ]
    }
}

impl std::fmt::Display for AccessWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
