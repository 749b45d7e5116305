//! Core type definitions

pub mod automation;
pub mod common;
pub mod difficulty;
pub mod drop;
pub mod group;
pub mod session;
pub mod snapshot;
pub mod window;

// Re-export identifier and category types
pub use common::{Category, DropId, GroupId, TargetId};

// Re-export cost configuration types
pub use difficulty::DifficultyLevel;
pub use window::AccessWindow;

// Re-export group and session types
pub use group::TargetGroup;
pub use session::UnlockSession;

// Re-export automation types
pub use automation::AutomationState;

// Re-export drop economy types
pub use drop::{EnergyDrop, GeoPoint};

// Re-export snapshot types
pub use snapshot::DailySnapshot;
