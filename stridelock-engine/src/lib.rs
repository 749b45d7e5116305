//! Stridelock Engine - Unlock Economy Orchestration Layer
//!
//! This crate hosts the synchronous economy core behind an async facade.
//! It owns the single writer lock, runs the day rollover before every
//! mutation, and persists committed state through a pluggable store.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               UnlockEngine                   │
//! │  ┌──────────────────────────────────────┐    │
//! │  │   normalize day → apply → persist    │    │
//! │  └──────────────────────────────────────┘    │
//! │        │            │            │           │
//! │        ▼            ▼            ▼           │
//! │  ┌──────────┐ ┌──────────┐ ┌───────────┐     │
//! │  │  Ledger  │ │ Sessions │ │   Drops   │     │
//! │  └──────────┘ └──────────┘ └───────────┘     │
//! └──────────────────────────────────────────────┘
//!        │                          │
//!        ▼                          ▼
//!  stridelock-core            EconomyStore
//!                          (file or in-memory)
//! ```
//!
//! # Modules
//!
//! - [`engine`] - Main engine facade
//! - [`config`] - First-boot configuration
//! - [`store`] - Persistence trait and backends
//! - [`error`] - Error types
//!
//! # Usage Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stridelock_engine::{EngineConfig, FileStore, UnlockEngine};
//! use stridelock_core::{AccessWindow, Category, DifficultyLevel, TargetId};
//!
//! async fn example() {
//!     let store = Arc::new(FileStore::new("/var/lib/stridelock").await.unwrap());
//!     let engine = UnlockEngine::new(EngineConfig::default(), store)
//!         .await
//!         .unwrap();
//!
//!     engine.accrue(Category::Steps, 42).await;
//!
//!     let group = engine
//!         .create_group(
//!             "Social",
//!             [TargetId::new("app.example.feed")],
//!             DifficultyLevel::Balanced,
//!         )
//!         .await;
//!
//!     let receipt = engine
//!         .request_unlock(&group.id, AccessWindow::Minutes10)
//!         .await
//!         .unwrap();
//!     println!("unlocked until {}", receipt.expires_at);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod store;

// Re-export main types
pub use config::EngineConfig;
pub use engine::{CostQuote, EngineStats, UnlockEngine};
pub use error::{EngineError, EngineResult};
pub use store::{EconomyStore, FileStore, MemoryStore, PersistedState};

// Re-export common types from stridelock-core
pub use stridelock_core::{
    AccessWindow, Accrual, AutomationState, Category, CategoryCaps, CostModel, CostTable,
    DailySnapshot, DayKey, DifficultyLevel, DropId, EconomyError, EnergyDrop, GeoPoint, GroupId,
    SessionStatus, TargetGroup, TargetId, UnlockReceipt,
};

/// Stridelock Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
