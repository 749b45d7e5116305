//! Automation Status Tracker
//!
//! Per-target setup state for targets gated by external automation rather
//! than direct payment. The tracker trusts the collaborator's signals; it
//! has no insight into whether the automation truly fired. Reads apply the
//! pending-lapse rule before answering, so no sweep is needed.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EconomyError, EconomyResult};
use crate::types::{AutomationState, TargetId};

/// Automation status tracker
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationTracker {
    /// States by target; absence means not configured
    records: BTreeMap<TargetId, AutomationState>,
}

impl AutomationTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a setup claim for a target.
    ///
    /// Starts or restarts the confirmation window. Fails with
    /// [`EconomyError::InvalidState`] when the target is already configured;
    /// the caller resets first if re-setup is intended.
    pub fn mark_pending(&mut self, target: &TargetId, now: DateTime<Utc>) -> EconomyResult<()> {
        if let Some(state) = self.records.get(target) {
            if matches!(state.effective_at(now), AutomationState::Configured { .. }) {
                return Err(EconomyError::invalid_state(format!(
                    "target {target} automation is already configured"
                )));
            }
        }

        self.records
            .insert(target.clone(), AutomationState::Pending { since: now });
        info!(target = %target, "automation setup claimed");
        Ok(())
    }

    /// Record the first observed firing of a target's automation.
    ///
    /// Accepted from any state; the signal comes from the collaborator that
    /// watches the device.
    pub fn mark_configured(&mut self, target: &TargetId, now: DateTime<Utc>) {
        self.records
            .insert(target.clone(), AutomationState::Configured { since: now });
        info!(target = %target, "automation confirmed");
    }

    /// Forget a target's automation state (idempotent)
    pub fn reset(&mut self, target: &TargetId) {
        if self.records.remove(target).is_some() {
            info!(target = %target, "automation reset");
        }
    }

    /// State of a target as observed at `now`, with the pending-lapse rule
    /// applied
    pub fn status(&self, target: &TargetId, now: DateTime<Utc>) -> AutomationState {
        self.records
            .get(target)
            .map(|state| state.effective_at(now))
            .unwrap_or(AutomationState::NotConfigured)
    }

    /// Drop records that read as not configured at `now`.
    ///
    /// Purely compaction; lapsed claims already answer as not configured.
    pub fn purge_lapsed(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.records.len();
        self.records.retain(|_, state| !state.is_lapsed_at(now));
        before - self.records.len()
    }
}
