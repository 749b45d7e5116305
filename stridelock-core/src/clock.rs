//! Day Boundary and Day Keys
//!
//! "Today" in the economy is not the calendar date: the user configures a
//! cutover time (default 03:00) and everything before it still belongs to the
//! previous day. All daily counters (ledger, drop caps) are keyed by
//! [`DayKey`], produced exclusively by [`DayBoundary::day_key`], so a cutover
//! change applies consistently everywhere on the next evaluation and never
//! re-keys already-stored records.

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CUTOVER_HOUR, DEFAULT_CUTOVER_MINUTE};

/// Identifier for one economy day (`YYYY-MM-DD` under the cutover shift).
///
/// Lexicographic order equals chronological order, so `DayKey` derives `Ord`
/// and the monotonicity of day keys under advancing wall-clock time is
/// directly testable.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayKey(pub String);

impl DayKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Assigns timestamps to economy days under a configurable cutover.
///
/// A timestamp whose time-of-day is before the cutover belongs to the
/// *previous* calendar date; at or after the cutover, the current date.
/// Pure: no side effects, no stored history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBoundary {
    /// Cutover time-of-day separating one economy day from the next
    cutover: NaiveTime,
}

impl DayBoundary {
    /// Create a boundary with the given cutover time
    pub fn new(cutover: NaiveTime) -> Self {
        Self { cutover }
    }

    /// Current cutover time
    pub fn cutover(&self) -> NaiveTime {
        self.cutover
    }

    /// Replace the cutover. Applies on the next `day_key` evaluation only;
    /// stored per-day records keep the keys they were written under.
    pub fn set_cutover(&mut self, cutover: NaiveTime) {
        self.cutover = cutover;
    }

    /// Compute the day key for a timestamp.
    pub fn day_key(&self, t: DateTime<Utc>) -> DayKey {
        let shifted = t - self.cutover_offset();
        DayKey::new(shifted.date_naive().format("%Y-%m-%d").to_string())
    }

    /// First instant strictly after `t` whose day key differs, i.e. the next
    /// cutover. Convenience for hosts scheduling refresh wake-ups; the engine
    /// itself never schedules anything. `None` only at the edge of
    /// representable time.
    pub fn next_boundary(&self, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let shifted = t - self.cutover_offset();
        let next_date = shifted.date_naive().succ_opt()?;
        Some(NaiveDateTime::new(next_date, self.cutover).and_utc())
    }

    fn cutover_offset(&self) -> Duration {
        Duration::seconds(i64::from(self.cutover.num_seconds_from_midnight()))
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self {
            cutover: NaiveTime::from_hms_opt(DEFAULT_CUTOVER_HOUR, DEFAULT_CUTOVER_MINUTE, 0)
                .unwrap_or_default(),
        }
    }
}
