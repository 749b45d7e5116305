//! Target Groups
//!
//! A named set of protected targets sharing one cost configuration: the
//! enabled access windows and the difficulty tier. The pay-gate invariant
//! lives on the type itself: while a group protects at least one target, at
//! least one purchasable window must remain enabled.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::common::{GroupId, TargetId};
use super::difficulty::DifficultyLevel;
use super::window::AccessWindow;
use crate::error::{EconomyError, EconomyResult};

/// A named set of protected targets sharing one cost configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroup {
    /// Group ID
    pub id: GroupId,

    /// Display name chosen by the owner
    pub display_name: String,

    /// Protected targets
    pub targets: BTreeSet<TargetId>,

    /// Windows purchasable for this group; never empty while `targets` is not
    pub enabled_windows: BTreeSet<AccessWindow>,

    /// Cost multiplier tier
    pub difficulty: DifficultyLevel,
}

impl TargetGroup {
    /// Create a group with a fresh ID and every window enabled; owners prune
    /// windows afterwards via [`TargetGroup::disable_window`].
    pub fn new(
        display_name: impl Into<String>,
        targets: impl IntoIterator<Item = TargetId>,
        difficulty: DifficultyLevel,
    ) -> Self {
        Self {
            id: GroupId::generate(),
            display_name: display_name.into(),
            targets: targets.into_iter().collect(),
            enabled_windows: AccessWindow::all().into_iter().collect(),
            difficulty,
        }
    }

    /// A group with zero targets is empty and eligible for deletion by the
    /// owning collaborator; the registry signals this, it never auto-deletes.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Check whether the group protects a target
    pub fn contains_target(&self, target: &TargetId) -> bool {
        self.targets.contains(target)
    }

    /// Check whether a window is purchasable for this group
    pub fn window_enabled(&self, window: AccessWindow) -> bool {
        self.enabled_windows.contains(&window)
    }

    /// Enable a window (idempotent)
    pub fn enable_window(&mut self, window: AccessWindow) {
        self.enabled_windows.insert(window);
    }

    /// Disable a window. Refused when it would leave no purchasable window.
    pub fn disable_window(&mut self, window: AccessWindow) -> EconomyResult<()> {
        if self.enabled_windows.contains(&window) && self.enabled_windows.len() == 1 {
            return Err(EconomyError::invalid_state(format!(
                "cannot disable {window}: it is the last enabled window of group {}",
                self.id
            )));
        }
        self.enabled_windows.remove(&window);
        Ok(())
    }

    /// Add targets (idempotent per target)
    pub fn add_targets(&mut self, targets: impl IntoIterator<Item = TargetId>) {
        self.targets.extend(targets);
    }

    /// Remove targets; returns true when the group is empty afterwards
    pub fn remove_targets<'a>(&mut self, targets: impl IntoIterator<Item = &'a TargetId>) -> bool {
        for target in targets {
            self.targets.remove(target);
        }
        self.is_empty()
    }
}
