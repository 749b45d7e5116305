//! Automation Status
//!
//! Tracks whether a target's enforcement automation has been set up on the
//! owner's device. A claim of setup sits in a pending state awaiting the
//! first observed firing; unconfirmed claims lapse after a fixed wall-clock
//! window. As with sessions, the lapse is evaluated lazily rather than by
//! timer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::AUTOMATION_PENDING_HOURS;

/// Setup state of a target's enforcement automation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationState {
    /// No automation claimed or confirmed
    NotConfigured,

    /// Setup claimed at `since`; lapses back to not-configured if not
    /// confirmed within [`AUTOMATION_PENDING_HOURS`]
    Pending { since: DateTime<Utc> },

    /// Setup confirmed at `since`
    Configured { since: DateTime<Utc> },
}

impl AutomationState {
    /// Check whether a pending claim has outlived its confirmation window.
    /// The window is inclusive: the claim lapses only strictly past it.
    pub fn is_lapsed_at(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::Pending { since } => {
                now > *since + Duration::hours(AUTOMATION_PENDING_HOURS)
            }
            _ => false,
        }
    }

    /// Resolve the state as observed at `now`, collapsing a lapsed pending
    /// claim to [`AutomationState::NotConfigured`]
    pub fn effective_at(&self, now: DateTime<Utc>) -> AutomationState {
        if self.is_lapsed_at(now) {
            AutomationState::NotConfigured
        } else {
            self.clone()
        }
    }

    /// Stable state name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Pending { .. } => "pending",
            Self::Configured { .. } => "configured",
        }
    }
}

impl Default for AutomationState {
    fn default() -> Self {
        Self::NotConfigured
    }
}
