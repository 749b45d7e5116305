//! Unlock Engine
//!
//! Async facade over the synchronous economy core. One write lock is the
//! single writer the economy requires: every mutation normalizes the day
//! first, applies the operation, then persists, all under the same guard,
//! so concurrent unlock attempts serialize and can never double spend.
//! Reads take the read lock and answer from the latest committed state.
//!
//! Every time-sensitive operation comes in a pair: `op()` against the wall
//! clock and `op_at(now)` with the instant injected, which tests use to walk
//! through days deterministically.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use stridelock_core::constants::MAGNET_DAILY_CAP;
use stridelock_core::{
    AccessWindow, Accrual, AutomationState, AutomationTracker, Category, CategoryCaps, CostModel,
    DailySnapshot, DayBoundary, DayKey, DifficultyLevel, DropEconomy, DropId, EconomyError,
    EnergyDrop, GeoPoint, GroupId, GroupRegistry, Ledger, SessionManager, SessionStatus,
    TargetGroup, TargetId, UnlockReceipt,
};

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::store::{EconomyStore, PersistedState};

/// Read-only price check for the pay-gate surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CostQuote {
    /// Window that was priced
    pub window: AccessWindow,
    /// Difficulty tier the price was computed under
    pub difficulty: DifficultyLevel,
    /// Price in credits
    pub cost: u64,
    /// Whether the current balance covers the price
    pub affordable: bool,
}

/// Engine statistics
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineStats {
    /// Spendable balance
    pub balance: u64,
    /// Groups registered
    pub group_count: usize,
    /// Sessions active at the queried instant
    pub active_session_count: usize,
    /// Uncollected drops
    pub uncollected_drop_count: usize,
}

/// Unlock economy engine
pub struct UnlockEngine {
    /// Pricing model, validated at open
    cost_model: CostModel,
    /// All mutable state behind the single writer lock
    state: RwLock<PersistedState>,
    /// Durable backend
    store: Arc<dyn EconomyStore>,
}

impl UnlockEngine {
    /// Open the engine: resume persisted state or start fresh from `config`
    pub async fn new(config: EngineConfig, store: Arc<dyn EconomyStore>) -> EngineResult<Self> {
        Self::open_at(config, store, Utc::now()).await
    }

    /// Open with the boot instant injected
    pub async fn open_at(
        config: EngineConfig,
        store: Arc<dyn EconomyStore>,
        now: DateTime<Utc>,
    ) -> EngineResult<Self> {
        let cost_model = CostModel::new(config.cost_table)?;

        let state = match store.load().await? {
            Some(state) => state,
            None => {
                let boundary = DayBoundary::new(config.cutover);
                let day_key = boundary.day_key(now);
                PersistedState {
                    boundary,
                    ledger: Ledger::with_caps(day_key, config.category_caps),
                    registry: GroupRegistry::new(),
                    sessions: SessionManager::new(),
                    automation: AutomationTracker::new(),
                    drops: DropEconomy::with_cap(config.drop_daily_cap),
                }
            }
        };

        info!(
            day = %state.ledger.day_key(),
            balance = state.ledger.balance(),
            groups = state.registry.len(),
            "unlock engine opened"
        );

        Ok(Self {
            cost_model,
            state: RwLock::new(state),
            store,
        })
    }

    /// Get the pricing model
    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    // ============================================================
    // Accrual and balance
    // ============================================================

    /// Credit activity earnings to a category
    pub async fn accrue(&self, category: Category, amount: u64) -> Accrual {
        self.accrue_at(category, amount, Utc::now()).await
    }

    /// Credit activity earnings, evaluated at `now`
    pub async fn accrue_at(&self, category: Category, amount: u64, now: DateTime<Utc>) -> Accrual {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let accrual = state.ledger.accrue(category, amount);
        self.commit(state, snapshot).await;

        accrual
    }

    /// Spendable balance
    pub async fn balance(&self) -> u64 {
        self.state.read().await.ledger.balance()
    }

    /// Fraction of today's earnings already spent, for presentation
    pub async fn decay_ratio(&self) -> rust_decimal::Decimal {
        self.decay_ratio_at(Utc::now()).await
    }

    /// Decay ratio for the day containing `now`
    pub async fn decay_ratio_at(&self, now: DateTime<Utc>) -> rust_decimal::Decimal {
        let state = self.state.read().await;
        if day_matches(&state, now) {
            state.ledger.decay_ratio()
        } else {
            rust_decimal::Decimal::ZERO
        }
    }

    /// Credits earned today
    pub async fn earned_today(&self) -> u64 {
        self.earned_today_at(Utc::now()).await
    }

    /// Credits earned on the day containing `now`; zero when the tracked day
    /// has lapsed without a mutation
    pub async fn earned_today_at(&self, now: DateTime<Utc>) -> u64 {
        let state = self.state.read().await;
        if day_matches(&state, now) {
            state.ledger.earned_today()
        } else {
            0
        }
    }

    /// Credits spent today
    pub async fn spent_today(&self) -> u64 {
        self.spent_today_at(Utc::now()).await
    }

    /// Credits spent on the day containing `now`
    pub async fn spent_today_at(&self, now: DateTime<Utc>) -> u64 {
        let state = self.state.read().await;
        if day_matches(&state, now) {
            state.ledger.spent_today()
        } else {
            0
        }
    }

    /// Today's earnings for one category
    pub async fn earned_today_for(&self, category: Category) -> u64 {
        self.earned_today_for_at(category, Utc::now()).await
    }

    /// Today's earnings for one category, evaluated at `now`
    pub async fn earned_today_for_at(&self, category: Category, now: DateTime<Utc>) -> u64 {
        let state = self.state.read().await;
        if day_matches(&state, now) {
            state.ledger.earned_today_for(category)
        } else {
            0
        }
    }

    /// Lifetime credits spent unlocking a target
    pub async fn lifetime_spent_for(&self, target: &TargetId) -> u64 {
        self.state.read().await.ledger.lifetime_spent_for(target)
    }

    // ============================================================
    // Unlock purchases and sessions
    // ============================================================

    /// Price a window for a group without committing anything
    pub async fn quote(&self, group_id: &GroupId, window: AccessWindow) -> EngineResult<CostQuote> {
        let state = self.state.read().await;
        let group = state.registry.get(group_id)?;
        if !group.window_enabled(window) {
            return Err(EconomyError::WindowNotEnabled {
                group_id: group.id.clone(),
                window,
            }
            .into());
        }

        let cost = self.cost_model.cost(window, group.difficulty);
        Ok(CostQuote {
            window,
            difficulty: group.difficulty,
            cost,
            affordable: state.ledger.balance() >= cost,
        })
    }

    /// Buy a window of access for a group
    pub async fn request_unlock(
        &self,
        group_id: &GroupId,
        window: AccessWindow,
    ) -> EngineResult<UnlockReceipt> {
        self.request_unlock_at(group_id, window, Utc::now()).await
    }

    /// Buy a window of access, evaluated at `now`
    pub async fn request_unlock_at(
        &self,
        group_id: &GroupId,
        window: AccessWindow,
        now: DateTime<Utc>,
    ) -> EngineResult<UnlockReceipt> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let result = match state.registry.get(group_id) {
            Ok(group) => {
                let group = group.clone();
                state
                    .sessions
                    .request(&mut state.ledger, &self.cost_model, &group, window, now)
            }
            Err(err) => Err(err),
        };
        self.commit(state, snapshot).await;

        Ok(result?)
    }

    /// Close a group's gate without further spending
    pub async fn forfeit(&self, group_id: &GroupId) -> EngineResult<bool> {
        self.forfeit_at(group_id, Utc::now()).await
    }

    /// Close a group's gate, evaluated at `now`; idempotent
    pub async fn forfeit_at(&self, group_id: &GroupId, now: DateTime<Utc>) -> EngineResult<bool> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let result = match state.registry.get(group_id) {
            Ok(_) => Ok(state.sessions.forfeit(group_id)),
            Err(err) => Err(err),
        };
        self.commit(state, snapshot).await;

        Ok(result?)
    }

    /// Observed lock state of a group
    pub async fn session_status(&self, group_id: &GroupId) -> EngineResult<SessionStatus> {
        self.session_status_at(group_id, Utc::now()).await
    }

    /// Observed lock state of a group at `now`
    pub async fn session_status_at(
        &self,
        group_id: &GroupId,
        now: DateTime<Utc>,
    ) -> EngineResult<SessionStatus> {
        let state = self.state.read().await;
        state.registry.get(group_id)?;
        Ok(state.sessions.status(group_id, now))
    }

    /// Time left on a group's session; zero when locked
    pub async fn remaining_time(&self, group_id: &GroupId) -> EngineResult<Duration> {
        self.remaining_time_at(group_id, Utc::now()).await
    }

    /// Time left on a group's session at `now`
    pub async fn remaining_time_at(
        &self,
        group_id: &GroupId,
        now: DateTime<Utc>,
    ) -> EngineResult<Duration> {
        let state = self.state.read().await;
        state.registry.get(group_id)?;
        Ok(state.sessions.remaining(group_id, now))
    }

    /// Answer the enforcement boundary: is this protected target currently
    /// permitted? A target no group protects reads as not permitted; the
    /// enforcer only asks about targets it restricts.
    pub async fn is_target_permitted(&self, target: &TargetId) -> bool {
        self.is_target_permitted_at(target, Utc::now()).await
    }

    /// Enforcement answer at `now`
    pub async fn is_target_permitted_at(&self, target: &TargetId, now: DateTime<Utc>) -> bool {
        let state = self.state.read().await;
        state.sessions.is_target_permitted(&state.registry, target, now)
    }

    // ============================================================
    // Group administration
    // ============================================================

    /// Create a group with every window enabled
    pub async fn create_group(
        &self,
        display_name: impl Into<String>,
        targets: impl IntoIterator<Item = TargetId>,
        difficulty: DifficultyLevel,
    ) -> TargetGroup {
        self.create_group_at(display_name, targets, difficulty, Utc::now())
            .await
    }

    /// Create a group, evaluated at `now`
    pub async fn create_group_at(
        &self,
        display_name: impl Into<String>,
        targets: impl IntoIterator<Item = TargetId>,
        difficulty: DifficultyLevel,
        now: DateTime<Utc>,
    ) -> TargetGroup {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let group = state.registry.create(display_name, targets, difficulty).clone();
        self.commit(state, snapshot).await;

        group
    }

    /// Get a group
    pub async fn group(&self, group_id: &GroupId) -> EngineResult<TargetGroup> {
        Ok(self.state.read().await.registry.get(group_id)?.clone())
    }

    /// All groups
    pub async fn groups(&self) -> Vec<TargetGroup> {
        self.state.read().await.registry.groups().cloned().collect()
    }

    /// Rename a group
    pub async fn rename_group(
        &self,
        group_id: &GroupId,
        display_name: impl Into<String>,
    ) -> EngineResult<()> {
        self.rename_group_at(group_id, display_name, Utc::now()).await
    }

    /// Rename a group, evaluated at `now`
    pub async fn rename_group_at(
        &self,
        group_id: &GroupId,
        display_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let result = state.registry.rename(group_id, display_name);
        self.commit(state, snapshot).await;

        Ok(result?)
    }

    /// Add targets to a group
    pub async fn add_targets(
        &self,
        group_id: &GroupId,
        targets: impl IntoIterator<Item = TargetId>,
    ) -> EngineResult<()> {
        self.add_targets_at(group_id, targets, Utc::now()).await
    }

    /// Add targets to a group, evaluated at `now`
    pub async fn add_targets_at(
        &self,
        group_id: &GroupId,
        targets: impl IntoIterator<Item = TargetId>,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let result = state.registry.add_targets(group_id, targets);
        self.commit(state, snapshot).await;

        Ok(result?)
    }

    /// Remove targets from a group; returns true when the group is now
    /// empty and eligible for deletion
    pub async fn remove_targets<'a>(
        &self,
        group_id: &GroupId,
        targets: impl IntoIterator<Item = &'a TargetId>,
    ) -> EngineResult<bool> {
        self.remove_targets_at(group_id, targets, Utc::now()).await
    }

    /// Remove targets from a group, evaluated at `now`
    pub async fn remove_targets_at<'a>(
        &self,
        group_id: &GroupId,
        targets: impl IntoIterator<Item = &'a TargetId>,
        now: DateTime<Utc>,
    ) -> EngineResult<bool> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let result = state.registry.remove_targets(group_id, targets);
        self.commit(state, snapshot).await;

        Ok(result?)
    }

    /// Change a group's difficulty tier; reprices future purchases only
    pub async fn set_difficulty(
        &self,
        group_id: &GroupId,
        difficulty: DifficultyLevel,
    ) -> EngineResult<()> {
        self.set_difficulty_at(group_id, difficulty, Utc::now()).await
    }

    /// Change a group's difficulty tier, evaluated at `now`
    pub async fn set_difficulty_at(
        &self,
        group_id: &GroupId,
        difficulty: DifficultyLevel,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let result = state.registry.set_difficulty(group_id, difficulty);
        self.commit(state, snapshot).await;

        Ok(result?)
    }

    /// Enable or disable a purchasable window for a group
    pub async fn toggle_window(
        &self,
        group_id: &GroupId,
        window: AccessWindow,
        enabled: bool,
    ) -> EngineResult<()> {
        self.toggle_window_at(group_id, window, enabled, Utc::now()).await
    }

    /// Enable or disable a purchasable window, evaluated at `now`
    pub async fn toggle_window_at(
        &self,
        group_id: &GroupId,
        window: AccessWindow,
        enabled: bool,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let result = state.registry.toggle_window(group_id, window, enabled);
        self.commit(state, snapshot).await;

        Ok(result?)
    }

    /// Delete a group and drop its session
    pub async fn delete_group(&self, group_id: &GroupId) -> EngineResult<TargetGroup> {
        self.delete_group_at(group_id, Utc::now()).await
    }

    /// Delete a group, evaluated at `now`
    pub async fn delete_group_at(
        &self,
        group_id: &GroupId,
        now: DateTime<Utc>,
    ) -> EngineResult<TargetGroup> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let result = state.registry.delete(group_id);
        if result.is_ok() {
            state.sessions.remove_group(group_id);
        }
        self.commit(state, snapshot).await;

        Ok(result?)
    }

    // ============================================================
    // Automation status
    // ============================================================

    /// Record an automation setup claim for a protected target
    pub async fn mark_automation_pending(&self, target: &TargetId) -> EngineResult<()> {
        self.mark_automation_pending_at(target, Utc::now()).await
    }

    /// Record an automation setup claim, evaluated at `now`
    pub async fn mark_automation_pending_at(
        &self,
        target: &TargetId,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let result = if state.registry.groups_covering(target).next().is_none() {
            Err(EconomyError::target_not_found(target.clone()))
        } else {
            state.automation.mark_pending(target, now)
        };
        self.commit(state, snapshot).await;

        Ok(result?)
    }

    /// Record the first observed firing of a target's automation
    pub async fn confirm_automation(&self, target: &TargetId) -> EngineResult<()> {
        self.confirm_automation_at(target, Utc::now()).await
    }

    /// Record the first observed firing, evaluated at `now`
    pub async fn confirm_automation_at(
        &self,
        target: &TargetId,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let result = if state.registry.groups_covering(target).next().is_none() {
            Err(EconomyError::target_not_found(target.clone()))
        } else {
            state.automation.mark_configured(target, now);
            Ok(())
        };
        self.commit(state, snapshot).await;

        Ok(result?)
    }

    /// Forget a target's automation state; used on deactivation
    pub async fn reset_automation(&self, target: &TargetId) {
        self.reset_automation_at(target, Utc::now()).await
    }

    /// Forget a target's automation state, evaluated at `now`
    pub async fn reset_automation_at(&self, target: &TargetId, now: DateTime<Utc>) {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        state.automation.reset(target);
        self.commit(state, snapshot).await;
    }

    /// Automation state of a target
    pub async fn automation_status(&self, target: &TargetId) -> AutomationState {
        self.automation_status_at(target, Utc::now()).await
    }

    /// Automation state of a target at `now`, pending lapse applied
    pub async fn automation_status_at(&self, target: &TargetId, now: DateTime<Utc>) -> AutomationState {
        self.state.read().await.automation.status(target, now)
    }

    // ============================================================
    // Drop economy
    // ============================================================

    /// Register a drop spawned by the placement collaborator
    pub async fn place_drop(&self, location: GeoPoint, value: u64) -> DropId {
        self.place_drop_at(location, value, Utc::now()).await
    }

    /// Register a drop, evaluated at `now`
    pub async fn place_drop_at(&self, location: GeoPoint, value: u64, now: DateTime<Utc>) -> DropId {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let id = state.drops.place(location, value, now);
        self.commit(state, snapshot).await;

        id
    }

    /// Collect a drop by proximity
    pub async fn collect_drop(&self, drop_id: &DropId) -> EngineResult<Accrual> {
        self.collect_drop_at(drop_id, Utc::now()).await
    }

    /// Collect a drop, evaluated at `now`
    pub async fn collect_drop_at(&self, drop_id: &DropId, now: DateTime<Utc>) -> EngineResult<Accrual> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let result = state.drops.collect(&mut state.ledger, drop_id);
        self.commit(state, snapshot).await;

        Ok(result?)
    }

    /// Collect a drop from afar with the magnet
    pub async fn magnet_pull(&self, drop_id: &DropId) -> EngineResult<Accrual> {
        self.magnet_pull_at(drop_id, Utc::now()).await
    }

    /// Magnet-collect a drop, evaluated at `now`
    pub async fn magnet_pull_at(&self, drop_id: &DropId, now: DateTime<Utc>) -> EngineResult<Accrual> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let result = state.drops.magnet_pull(&mut state.ledger, drop_id);
        self.commit(state, snapshot).await;

        Ok(result?)
    }

    /// Despawn an uncollected drop
    pub async fn discard_drop(&self, drop_id: &DropId) -> bool {
        self.discard_drop_at(drop_id, Utc::now()).await
    }

    /// Despawn an uncollected drop, evaluated at `now`
    pub async fn discard_drop_at(&self, drop_id: &DropId, now: DateTime<Utc>) -> bool {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        let dropped = state.drops.discard(drop_id);
        self.commit(state, snapshot).await;

        dropped
    }

    /// All uncollected drops
    pub async fn drops(&self) -> Vec<EnergyDrop> {
        self.state.read().await.drops.drops().cloned().collect()
    }

    /// Uncollected drops within `radius_m` meters of a point
    pub async fn drops_near(&self, center: GeoPoint, radius_m: f64) -> Vec<EnergyDrop> {
        self.state
            .read()
            .await
            .drops
            .drops_near(center, radius_m)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Drop value collected today
    pub async fn collected_today(&self) -> u64 {
        self.collected_today_at(Utc::now()).await
    }

    /// Drop value collected on the day containing `now`
    pub async fn collected_today_at(&self, now: DateTime<Utc>) -> u64 {
        let state = self.state.read().await;
        if day_matches(&state, now) {
            state.drops.collected_today()
        } else {
            0
        }
    }

    /// Magnet pulls left today
    pub async fn magnet_uses_left(&self) -> u32 {
        self.magnet_uses_left_at(Utc::now()).await
    }

    /// Magnet pulls left on the day containing `now`
    pub async fn magnet_uses_left_at(&self, now: DateTime<Utc>) -> u32 {
        let state = self.state.read().await;
        if day_matches(&state, now) {
            state.drops.magnet_uses_left()
        } else {
            MAGNET_DAILY_CAP
        }
    }

    // ============================================================
    // Day boundary and history
    // ============================================================

    /// Day key under the current cutover
    pub async fn day_key(&self) -> DayKey {
        self.day_key_at(Utc::now()).await
    }

    /// Day key at `now` under the current cutover
    pub async fn day_key_at(&self, now: DateTime<Utc>) -> DayKey {
        self.state.read().await.boundary.day_key(now)
    }

    /// Next day boundary
    pub async fn next_boundary(&self) -> Option<DateTime<Utc>> {
        self.next_boundary_at(Utc::now()).await
    }

    /// Next day boundary after `now`
    pub async fn next_boundary_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.state.read().await.boundary.next_boundary(now)
    }

    /// Move the day cutover.
    ///
    /// The tracked day is closed out under the old cutover first; stored
    /// per-day records are never re-keyed.
    pub async fn set_cutover(&self, cutover: NaiveTime) {
        self.set_cutover_at(cutover, Utc::now()).await
    }

    /// Move the day cutover, evaluated at `now`
    pub async fn set_cutover_at(&self, cutover: NaiveTime, now: DateTime<Utc>) {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        state.boundary.set_cutover(cutover);
        info!(cutover = %cutover, "day cutover changed");
        self.commit(state, snapshot).await;
    }

    /// Replace the per-category daily maxima
    pub async fn set_category_caps(&self, caps: CategoryCaps) {
        self.set_category_caps_at(caps, Utc::now()).await
    }

    /// Replace the per-category daily maxima, evaluated at `now`
    pub async fn set_category_caps_at(&self, caps: CategoryCaps, now: DateTime<Utc>) {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        state.ledger.set_caps(caps);
        self.commit(state, snapshot).await;
    }

    /// Replace the daily drop collection cap
    pub async fn set_drop_daily_cap(&self, cap: u64) {
        self.set_drop_daily_cap_at(cap, Utc::now()).await
    }

    /// Replace the daily drop collection cap, evaluated at `now`
    pub async fn set_drop_daily_cap_at(&self, cap: u64, now: DateTime<Utc>) {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let snapshot = normalize(state, now);
        state.drops.set_daily_cap(cap);
        self.commit(state, snapshot).await;
    }

    /// Most recent completed-day records, newest first
    pub async fn daily_history(&self, limit: usize) -> EngineResult<Vec<DailySnapshot>> {
        self.store.snapshots(limit).await
    }

    /// Persist the current state now; hosts call this before suspension
    pub async fn flush(&self) -> EngineResult<()> {
        let state = self.state.read().await;
        self.store.save(&state).await
    }

    /// Engine statistics
    pub async fn stats(&self) -> EngineStats {
        self.stats_at(Utc::now()).await
    }

    /// Engine statistics at `now`
    pub async fn stats_at(&self, now: DateTime<Utc>) -> EngineStats {
        let state = self.state.read().await;
        EngineStats {
            balance: state.ledger.balance(),
            group_count: state.registry.len(),
            active_session_count: state.sessions.active_sessions(now).count(),
            uncollected_drop_count: state.drops.drops().count(),
        }
    }

    /// Persist after a mutation; a failed write is logged and retried on
    /// the next mutation or on [`UnlockEngine::flush`], never rolled back
    async fn commit(&self, state: &PersistedState, snapshot: Option<DailySnapshot>) {
        if let Some(snapshot) = snapshot {
            if let Err(e) = self.store.append_snapshot(&snapshot).await {
                warn!(error = %e, day = %snapshot.day_key, "failed to archive daily snapshot");
            }
        }
        if let Err(e) = self.store.save(state).await {
            warn!(error = %e, "failed to persist engine state");
        }
    }
}

/// Pull-based day transition: close the tracked day if `now` is past it.
/// Runs first inside every mutation so a rollover is never missed, however
/// long the process slept.
fn normalize(state: &mut PersistedState, now: DateTime<Utc>) -> Option<DailySnapshot> {
    let day_key = state.boundary.day_key(now);
    let snapshot = state.ledger.rollover_if_new_day(&day_key)?;

    state.drops.reset_daily_counters();
    state.sessions.purge_lapsed(now);
    state.automation.purge_lapsed(now);

    Some(snapshot)
}

/// Check whether the ledger's tracked day contains `now`
fn day_matches(state: &PersistedState, now: DateTime<Utc>) -> bool {
    state.boundary.day_key(now) == *state.ledger.day_key()
}
