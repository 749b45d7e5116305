//! Economy Error Types
//!
//! Error definitions for the unlock economy. Every refusal carries enough
//! context for the caller to render a message or retry; no operation leaves
//! state partially mutated on error.

use thiserror::Error;

use crate::types::{AccessWindow, GroupId, TargetId};

/// Economy Result type
pub type EconomyResult<T> = Result<T, EconomyError>;

/// Economy error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconomyError {
    // ============================================================
    // Ledger errors
    // ============================================================
    /// Spend requested exceeds the current balance
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: u64, available: u64 },

    // ============================================================
    // Registry errors
    // ============================================================
    /// Group reference is stale
    #[error("Group not found: {id}")]
    GroupNotFound { id: GroupId },

    /// Target reference is stale
    #[error("Target not found: {id}")]
    TargetNotFound { id: TargetId },

    /// Requested window is not enabled for the group
    #[error("Window {window} is not enabled for group {group_id}")]
    WindowNotEnabled {
        group_id: GroupId,
        window: AccessWindow,
    },

    // ============================================================
    // Drop economy errors
    // ============================================================
    /// Daily collection cap would be exceeded
    #[error("Daily collection cap reached: cap {cap}, collected {collected}, attempted {attempted}")]
    DailyCapReached {
        cap: u64,
        collected: u64,
        attempted: u64,
    },

    /// Daily magnet pulls are used up
    #[error("Magnet uses exhausted: cap {cap}")]
    MagnetExhausted { cap: u32 },

    // ============================================================
    // General errors
    // ============================================================
    /// Operation is invalid in the current state; fails closed
    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },
}

impl EconomyError {
    /// Create an invalid-state error
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    /// Create a group-not-found error
    pub fn group_not_found(id: GroupId) -> Self {
        Self::GroupNotFound { id }
    }

    /// Create a target-not-found error
    pub fn target_not_found(id: TargetId) -> Self {
        Self::TargetNotFound { id }
    }

    /// Check whether the error is recoverable by ordinary user action
    /// (earn more, pick a cheaper window, refresh a stale list, try again
    /// tomorrow) as opposed to a caller programming error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EconomyError::InsufficientBalance { .. }
                | EconomyError::DailyCapReached { .. }
                | EconomyError::MagnetExhausted { .. }
                | EconomyError::GroupNotFound { .. }
                | EconomyError::TargetNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        let err = EconomyError::InsufficientBalance {
            required: 40,
            available: 10,
        };
        assert!(err.is_recoverable());

        let err = EconomyError::invalid_state("disabling the last enabled window");
        assert!(!err.is_recoverable());

        let err = EconomyError::MagnetExhausted { cap: 3 };
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_error_display_carries_context() {
        let err = EconomyError::DailyCapReached {
            cap: 50,
            collected: 40,
            attempted: 20,
        };
        let msg = err.to_string();
        assert!(msg.contains("50"));
        assert!(msg.contains("40"));
        assert!(msg.contains("20"));
    }
}
