//! Unlock Session Manager
//!
//! Per-group session table and the pay-and-grant transaction. A request
//! prices the window, spends against the ledger, and only then touches the
//! session table, so a failed spend leaves no trace. Expiry is observed, not
//! scheduled: every query normalizes against the caller's `now` first.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cost::CostModel;
use crate::error::{EconomyError, EconomyResult};
use crate::ledger::Ledger;
use crate::registry::GroupRegistry;
use crate::types::{AccessWindow, GroupId, TargetGroup, TargetId, UnlockSession};

/// Observed lock state of one group
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No active session
    Locked,
    /// Access granted until the deadline
    Unlocked { expires_at: DateTime<Utc> },
}

impl SessionStatus {
    /// Check whether this is the unlocked state
    pub fn is_unlocked(&self) -> bool {
        matches!(self, SessionStatus::Unlocked { .. })
    }
}

/// Committed outcome of one unlock purchase
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockReceipt {
    /// Group unlocked
    pub group_id: GroupId,
    /// Window purchased
    pub window: AccessWindow,
    /// Credits charged
    pub cost: u64,
    /// Deadline of the resulting session
    pub expires_at: DateTime<Utc>,
    /// Spendable balance after the charge
    pub balance_after: u64,
}

/// Unlock session manager
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionManager {
    /// Sessions by group; absence means locked
    sessions: BTreeMap<GroupId, UnlockSession>,
}

impl SessionManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Buy a window of access for a group.
    ///
    /// Check balance, deduct, extend the session as one unit: the session
    /// table changes only after the spend commits, and a spend failure
    /// changes nothing. An active session extends from the later of now and
    /// its current deadline, so paid-for time is never shortened.
    pub fn request(
        &mut self,
        ledger: &mut Ledger,
        cost_model: &CostModel,
        group: &TargetGroup,
        window: AccessWindow,
        now: DateTime<Utc>,
    ) -> EconomyResult<UnlockReceipt> {
        if group.is_empty() {
            return Err(EconomyError::invalid_state(format!(
                "group {} has no targets to unlock",
                group.id
            )));
        }
        if !group.window_enabled(window) {
            return Err(EconomyError::WindowNotEnabled {
                group_id: group.id.clone(),
                window,
            });
        }

        let cost = cost_model.cost(window, group.difficulty);
        ledger.try_spend(cost)?;
        ledger.attribute_spend(group.targets.iter(), cost);

        let session = match self.sessions.entry(group.id.clone()) {
            Entry::Occupied(entry) => {
                let session = entry.into_mut();
                session.extend_at(window, now);
                session
            }
            Entry::Vacant(entry) => {
                entry.insert(UnlockSession::begin(group.id.clone(), window, now))
            }
        };

        let receipt = UnlockReceipt {
            group_id: group.id.clone(),
            window,
            cost,
            expires_at: session.expires_at,
            balance_after: ledger.balance(),
        };

        info!(
            group_id = %receipt.group_id,
            window = %receipt.window,
            cost = receipt.cost,
            expires_at = %receipt.expires_at,
            balance = receipt.balance_after,
            "unlock purchased"
        );

        Ok(receipt)
    }

    /// Close a group's gate without further spending.
    ///
    /// Idempotent; returns whether a session was actually dropped. Committed
    /// spends are never rolled back.
    pub fn forfeit(&mut self, group_id: &GroupId) -> bool {
        let dropped = self.sessions.remove(group_id).is_some();
        if dropped {
            info!(group_id = %group_id, "session forfeited");
        }
        dropped
    }

    /// Observed state of a group at `now`
    pub fn status(&self, group_id: &GroupId, now: DateTime<Utc>) -> SessionStatus {
        match self.sessions.get(group_id) {
            Some(session) if session.is_active_at(now) => SessionStatus::Unlocked {
                expires_at: session.expires_at,
            },
            _ => SessionStatus::Locked,
        }
    }

    /// Time left for a group at `now`; zero when locked
    pub fn remaining(&self, group_id: &GroupId, now: DateTime<Utc>) -> Duration {
        self.sessions
            .get(group_id)
            .map(|s| s.remaining_at(now))
            .unwrap_or_else(Duration::zero)
    }

    /// Check whether a group is unlocked at `now`
    pub fn is_group_unlocked(&self, group_id: &GroupId, now: DateTime<Utc>) -> bool {
        self.status(group_id, now).is_unlocked()
    }

    /// Sole source of truth for the enforcement boundary: a target is
    /// permitted iff any group protecting it is unlocked at `now`.
    pub fn is_target_permitted(
        &self,
        registry: &GroupRegistry,
        target: &TargetId,
        now: DateTime<Utc>,
    ) -> bool {
        registry
            .groups_covering(target)
            .any(|group| self.is_group_unlocked(&group.id, now))
    }

    /// Get a group's raw session, if any
    pub fn session(&self, group_id: &GroupId) -> Option<&UnlockSession> {
        self.sessions.get(group_id)
    }

    /// Sessions still active at `now`
    pub fn active_sessions(&self, now: DateTime<Utc>) -> impl Iterator<Item = &UnlockSession> {
        self.sessions.values().filter(move |s| s.is_active_at(now))
    }

    /// Drop sessions whose deadline has passed.
    ///
    /// Lapsed sessions already read as locked; this only compacts the table.
    pub fn purge_lapsed(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.is_active_at(now));
        before - self.sessions.len()
    }

    /// Drop a deleted group's session, if any
    pub fn remove_group(&mut self, group_id: &GroupId) {
        self.sessions.remove(group_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::DayKey;
    use crate::types::{Category, DifficultyLevel};
    use chrono::TimeZone;

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn create_test_ledger(balance: u64) -> Ledger {
        let mut ledger = Ledger::new(DayKey::new("2025-06-01"));
        let mut remaining = balance;
        for category in Category::all() {
            let credited = remaining.min(ledger.caps().cap(category));
            ledger.accrue(category, credited);
            remaining -= credited;
        }
        assert_eq!(ledger.balance(), balance, "test balance not reachable");
        ledger
    }

    fn create_test_group(difficulty: DifficultyLevel) -> TargetGroup {
        TargetGroup::new(
            "Social",
            [TargetId::new("app.one"), TargetId::new("app.two")],
            difficulty,
        )
    }

    #[test]
    fn test_request_deducts_and_unlocks() {
        let mut manager = SessionManager::new();
        let mut ledger = create_test_ledger(50);
        let model = CostModel::default_v1();
        let group = create_test_group(DifficultyLevel::Balanced);
        let now = test_now();

        let receipt = manager
            .request(&mut ledger, &model, &group, AccessWindow::Minutes10, now)
            .unwrap();

        assert_eq!(receipt.cost, 10);
        assert_eq!(receipt.balance_after, 40);
        assert_eq!(ledger.balance(), 40);
        assert!(manager.is_group_unlocked(&group.id, now));
        assert_eq!(
            manager.remaining(&group.id, now),
            Duration::minutes(10)
        );
    }

    #[test]
    fn test_request_insufficient_balance_changes_nothing() {
        let mut manager = SessionManager::new();
        let mut ledger = create_test_ledger(5);
        let model = CostModel::default_v1();
        let group = create_test_group(DifficultyLevel::Balanced);
        let now = test_now();

        let err = manager
            .request(&mut ledger, &model, &group, AccessWindow::Minutes10, now)
            .unwrap_err();

        assert!(matches!(err, EconomyError::InsufficientBalance { .. }));
        assert_eq!(ledger.balance(), 5);
        assert_eq!(ledger.spent_today(), 0);
        assert!(!manager.is_group_unlocked(&group.id, now));
        assert!(manager.session(&group.id).is_none());
    }

    #[test]
    fn test_request_disabled_window_spends_nothing() {
        let mut manager = SessionManager::new();
        let mut ledger = create_test_ledger(50);
        let model = CostModel::default_v1();
        let mut group = create_test_group(DifficultyLevel::Balanced);
        group.disable_window(AccessWindow::Day1).unwrap();
        let now = test_now();

        let err = manager
            .request(&mut ledger, &model, &group, AccessWindow::Day1, now)
            .unwrap_err();

        assert!(matches!(err, EconomyError::WindowNotEnabled { .. }));
        assert_eq!(ledger.balance(), 50);
    }

    #[test]
    fn test_request_on_empty_group_spends_nothing() {
        let mut manager = SessionManager::new();
        let mut ledger = create_test_ledger(50);
        let model = CostModel::default_v1();
        let mut group = create_test_group(DifficultyLevel::Balanced);
        group.remove_targets([&TargetId::new("app.one"), &TargetId::new("app.two")]);
        let now = test_now();

        let err = manager
            .request(&mut ledger, &model, &group, AccessWindow::Minutes10, now)
            .unwrap_err();

        assert!(matches!(err, EconomyError::InvalidState { .. }));
        assert_eq!(ledger.balance(), 50);
    }

    #[test]
    fn test_back_to_back_purchases_stack() {
        let mut manager = SessionManager::new();
        let mut ledger = create_test_ledger(50);
        let model = CostModel::default_v1();
        let group = create_test_group(DifficultyLevel::Balanced);
        let now = test_now();

        manager
            .request(&mut ledger, &model, &group, AccessWindow::Minutes10, now)
            .unwrap();
        let receipt = manager
            .request(&mut ledger, &model, &group, AccessWindow::Minutes10, now)
            .unwrap();

        // Two 10-minute purchases give 20 continuous minutes.
        assert_eq!(receipt.expires_at, now + Duration::minutes(20));
        assert_eq!(manager.remaining(&group.id, now), Duration::minutes(20));
    }

    #[test]
    fn test_request_attributes_cost_to_each_target() {
        let mut manager = SessionManager::new();
        let mut ledger = create_test_ledger(50);
        let model = CostModel::default_v1();
        let group = create_test_group(DifficultyLevel::Balanced);

        manager
            .request(&mut ledger, &model, &group, AccessWindow::Minutes10, test_now())
            .unwrap();

        assert_eq!(ledger.lifetime_spent_for(&TargetId::new("app.one")), 10);
        assert_eq!(ledger.lifetime_spent_for(&TargetId::new("app.two")), 10);
    }

    #[test]
    fn test_session_lapses_lazily() {
        let mut manager = SessionManager::new();
        let mut ledger = create_test_ledger(50);
        let model = CostModel::default_v1();
        let group = create_test_group(DifficultyLevel::Balanced);
        let now = test_now();

        manager
            .request(&mut ledger, &model, &group, AccessWindow::Minutes5, now)
            .unwrap();

        let later = now + Duration::minutes(5);
        assert_eq!(manager.status(&group.id, later), SessionStatus::Locked);
        assert_eq!(manager.remaining(&group.id, later), Duration::zero());
    }

    #[test]
    fn test_forfeit_is_idempotent() {
        let mut manager = SessionManager::new();
        let mut ledger = create_test_ledger(50);
        let model = CostModel::default_v1();
        let group = create_test_group(DifficultyLevel::Balanced);
        let now = test_now();

        manager
            .request(&mut ledger, &model, &group, AccessWindow::Hour1, now)
            .unwrap();

        assert!(manager.forfeit(&group.id));
        assert!(!manager.forfeit(&group.id));
        assert_eq!(manager.status(&group.id, now), SessionStatus::Locked);

        // No refund on forfeit.
        assert_eq!(ledger.balance(), 10);
    }

    #[test]
    fn test_target_permitted_through_any_covering_group() {
        let mut manager = SessionManager::new();
        let mut ledger = create_test_ledger(50);
        let model = CostModel::default_v1();
        let mut registry = GroupRegistry::new();
        let now = test_now();

        let first = registry
            .create("A", [TargetId::new("app.shared")], DifficultyLevel::Balanced)
            .id
            .clone();
        registry.create(
            "B",
            [TargetId::new("app.shared"), TargetId::new("app.other")],
            DifficultyLevel::Balanced,
        );

        let shared = TargetId::new("app.shared");
        let other = TargetId::new("app.other");
        assert!(!manager.is_target_permitted(&registry, &shared, now));

        let group = registry.get(&first).unwrap().clone();
        manager
            .request(&mut ledger, &model, &group, AccessWindow::Minutes10, now)
            .unwrap();

        assert!(manager.is_target_permitted(&registry, &shared, now));
        // Only the first group is unlocked; the other target stays blocked.
        assert!(!manager.is_target_permitted(&registry, &other, now));

        let later = now + Duration::minutes(11);
        assert!(!manager.is_target_permitted(&registry, &shared, later));
    }

    #[test]
    fn test_purge_lapsed_keeps_active() {
        let mut manager = SessionManager::new();
        let mut ledger = create_test_ledger(100);
        let model = CostModel::default_v1();
        let short = create_test_group(DifficultyLevel::Balanced);
        let long = TargetGroup::new("Other", [TargetId::new("app.three")], DifficultyLevel::Balanced);
        let now = test_now();

        manager
            .request(&mut ledger, &model, &short, AccessWindow::Minutes5, now)
            .unwrap();
        manager
            .request(&mut ledger, &model, &long, AccessWindow::Hour2, now)
            .unwrap();

        let later = now + Duration::minutes(10);
        assert_eq!(manager.purge_lapsed(later), 1);
        assert!(manager.session(&short.id).is_none());
        assert!(manager.is_group_unlocked(&long.id, later));
    }
}
