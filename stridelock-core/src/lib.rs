//! Stridelock Core - Unlock Economy Engine
//!
//! Credit economy that gates restricted targets behind timed, paid access.
//! Users earn credits from real-world activity and spend them to open access
//! windows on locked target groups. This crate is the synchronous engine
//! core; the async facade and persistence live in `stridelock-engine`.
//!
//! It provides:
//! - **Ledger**: accrual with per-category daily caps, atomic spending,
//!   zero-clamped balance, daily rollover with snapshot emission
//! - **Cost model**: `(window, difficulty) -> credits`, monotone in both
//! - **Sessions**: per-group pay-and-grant with exact deadline stacking
//! - **Automation**: per-target setup states with timed pending lapse
//! - **Drop economy**: capped bonus credits from world-placed collectibles
//!
//! # Design Rules
//!
//! | Rule | Consequence |
//! |------|-------------|
//! | **Lazy time** | No timers; expiry, lapse and rollover derive from a caller-supplied `now` |
//! | **Single writer** | One owner mutates; managers take `&mut self` and compose via explicit borrows |
//! | **All or nothing** | A failed operation never leaves counters partially changed |
//! | **Balance floor** | Spendable balance is derived and clamped at zero at every mutation |
//! | **Day keys** | Daily state keys off the configurable cutover, never the calendar date |
//!
//! # Core Types
//!
//! - [`Ledger`]: the bookkeeping authority
//! - [`CostModel`]: pricing over a validated [`CostTable`]
//! - [`GroupRegistry`]: CRUD over [`TargetGroup`] records
//! - [`SessionManager`]: the session table and pay-and-grant transaction
//! - [`AutomationTracker`]: per-target automation setup states
//! - [`DropEconomy`]: the collectible sub-economy and its daily caps
//! - [`DayBoundary`]: timestamp to [`DayKey`] under a configurable cutover

pub mod automation;
pub mod clock;
pub mod constants;
pub mod cost;
pub mod drops;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod session;
pub mod types;

// Re-export error types
pub use error::{EconomyError, EconomyResult};

// Re-export all types
pub use types::*;

// Re-export clock
pub use clock::{DayBoundary, DayKey};

// Re-export ledger
pub use ledger::{Accrual, CategoryCaps, Ledger};

// Re-export cost model
pub use cost::{CostModel, CostTable};

// Re-export registry
pub use registry::GroupRegistry;

// Re-export sessions
pub use session::{SessionManager, SessionStatus, UnlockReceipt};

// Re-export automation
pub use automation::AutomationTracker;

// Re-export drop economy
pub use drops::DropEconomy;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
