//! Target Group Registry
//!
//! CRUD authority over [`TargetGroup`] records. The registry signals when a
//! mutation leaves a group empty but never deletes on its own; the owning
//! caller decides.

use std::collections::BTreeMap;

use tracing::info;

use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};
use crate::types::{AccessWindow, DifficultyLevel, GroupId, TargetGroup, TargetId};

/// Target group registry
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRegistry {
    /// Groups by ID
    groups: BTreeMap<GroupId, TargetGroup>,
}

impl GroupRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group with a fresh ID and every window enabled
    pub fn create(
        &mut self,
        display_name: impl Into<String>,
        targets: impl IntoIterator<Item = TargetId>,
        difficulty: DifficultyLevel,
    ) -> &TargetGroup {
        let group = TargetGroup::new(display_name, targets, difficulty);
        let id = group.id.clone();

        info!(group_id = %id, name = %group.display_name, "group created");

        self.groups.insert(id.clone(), group);
        // Just inserted under this key.
        &self.groups[&id]
    }

    /// Get a group
    pub fn get(&self, id: &GroupId) -> EconomyResult<&TargetGroup> {
        self.groups
            .get(id)
            .ok_or_else(|| EconomyError::group_not_found(id.clone()))
    }

    /// Rename a group
    pub fn rename(&mut self, id: &GroupId, display_name: impl Into<String>) -> EconomyResult<()> {
        self.get_mut(id)?.display_name = display_name.into();
        Ok(())
    }

    /// Add targets to a group
    pub fn add_targets(
        &mut self,
        id: &GroupId,
        targets: impl IntoIterator<Item = TargetId>,
    ) -> EconomyResult<()> {
        self.get_mut(id)?.add_targets(targets);
        Ok(())
    }

    /// Remove targets from a group.
    ///
    /// Returns true when the group is empty afterwards; the caller decides
    /// whether to delete it.
    pub fn remove_targets<'a>(
        &mut self,
        id: &GroupId,
        targets: impl IntoIterator<Item = &'a TargetId>,
    ) -> EconomyResult<bool> {
        Ok(self.get_mut(id)?.remove_targets(targets))
    }

    /// Change a group's difficulty tier
    pub fn set_difficulty(&mut self, id: &GroupId, difficulty: DifficultyLevel) -> EconomyResult<()> {
        self.get_mut(id)?.difficulty = difficulty;
        Ok(())
    }

    /// Enable or disable a purchasable window.
    ///
    /// Disabling fails with [`EconomyError::InvalidState`] when it would
    /// leave the group without any purchasable window.
    pub fn toggle_window(
        &mut self,
        id: &GroupId,
        window: AccessWindow,
        enabled: bool,
    ) -> EconomyResult<()> {
        let group = self.get_mut(id)?;
        if enabled {
            group.enable_window(window);
            Ok(())
        } else {
            group.disable_window(window)
        }
    }

    /// Delete a group, returning it
    pub fn delete(&mut self, id: &GroupId) -> EconomyResult<TargetGroup> {
        let group = self
            .groups
            .remove(id)
            .ok_or_else(|| EconomyError::group_not_found(id.clone()))?;

        info!(group_id = %id, name = %group.display_name, "group deleted");
        Ok(group)
    }

    /// Groups that protect a target
    pub fn groups_covering<'a>(&'a self, target: &'a TargetId) -> impl Iterator<Item = &'a TargetGroup> {
        self.groups.values().filter(move |g| g.contains_target(target))
    }

    /// All groups
    pub fn groups(&self) -> impl Iterator<Item = &TargetGroup> {
        self.groups.values()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check whether the registry holds no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn get_mut(&mut self, id: &GroupId) -> EconomyResult<&mut TargetGroup> {
        self.groups
            .get_mut(id)
            .ok_or_else(|| EconomyError::group_not_found(id.clone()))
    }
}
