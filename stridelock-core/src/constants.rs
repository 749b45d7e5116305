//! Economy Constants
//!
//! Centralized defaults and limits for the unlock economy. Product-tunable
//! values live here so configuration and tests share one source.
//!
//! # Categories
//!
//! - **Day boundary**: default cutover time
//! - **Accrual**: per-category daily maxima
//! - **Drop economy**: collection and magnet caps
//! - **Automation**: pending window

// ============================================================================
// Day Boundary
// ============================================================================

/// Default day-cutover hour (03:00 local-equivalent; a late night still
/// counts toward the previous day)
pub const DEFAULT_CUTOVER_HOUR: u32 = 3;

/// Default day-cutover minute
pub const DEFAULT_CUTOVER_MINUTE: u32 = 0;

// ============================================================================
// Accrual Limits
// ============================================================================

/// Default daily credit maximum for the steps category
pub const DEFAULT_STEPS_DAILY_MAX: u64 = 20;

/// Default daily credit maximum for the sleep category
pub const DEFAULT_SLEEP_DAILY_MAX: u64 = 20;

/// Default daily credit maximum for the wellbeing category
pub const DEFAULT_WELLBEING_DAILY_MAX: u64 = 20;

/// Default daily credit maximum for the outer-world (drop bonus) category.
/// Aligned with [`DEFAULT_DROP_DAILY_CAP`] so the drop cap is the binding
/// constraint.
pub const DEFAULT_OUTER_WORLD_DAILY_MAX: u64 = 50;

// ============================================================================
// Drop Economy
// ============================================================================

/// Default daily cap on collected drop value
pub const DEFAULT_DROP_DAILY_CAP: u64 = 50;

/// Daily magnet (auto-collect) use cap
pub const MAGNET_DAILY_CAP: u32 = 3;

// ============================================================================
// Automation
// ============================================================================

/// Hours a pending automation setup stays pending before reverting to none
pub const AUTOMATION_PENDING_HOURS: i64 = 24;

// ============================================================================
// Cost Model
// ============================================================================

/// Minimum cost of any unlock in credits; no window is ever free
pub const MIN_UNLOCK_COST: u64 = 1;
