//! Unlock Sessions
//!
//! At most one session exists per group. A session is a deadline, nothing
//! more: no timer fires when it passes. Expiry is evaluated lazily against a
//! caller-supplied instant, so state is always derived, never pushed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::common::GroupId;
use super::window::AccessWindow;

/// A paid grant of access to one group's targets until a deadline
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockSession {
    /// Group this session unlocks
    pub group_id: GroupId,

    /// Window of the most recent purchase that fed this session
    pub window: AccessWindow,

    /// When the session was first opened
    pub started_at: DateTime<Utc>,

    /// Deadline; the session is active strictly before this instant
    pub expires_at: DateTime<Utc>,
}

impl UnlockSession {
    /// Open a fresh session starting at `now`
    pub fn begin(group_id: GroupId, window: AccessWindow, now: DateTime<Utc>) -> Self {
        Self {
            group_id,
            window,
            started_at: now,
            expires_at: now + window.duration(),
        }
    }

    /// Check whether the session is still active at `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Time left at `now`, clamped to zero once the deadline has passed
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        if self.is_active_at(now) {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }

    /// Stack another purchase onto this session.
    ///
    /// An active session extends from its current deadline; a lapsed one
    /// restarts from `now`. Either way the new window's full duration is
    /// granted.
    pub fn extend_at(&mut self, window: AccessWindow, now: DateTime<Utc>) {
        let base = if self.is_active_at(now) {
            self.expires_at
        } else {
            self.started_at = now;
            now
        };
        self.window = window;
        self.expires_at = base + window.duration();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_begin_sets_deadline_from_window() {
        let now = test_now();
        let session = UnlockSession::begin(GroupId::new("group:a"), AccessWindow::Minutes10, now);

        assert_eq!(session.expires_at, now + Duration::minutes(10));
        assert!(session.is_active_at(now));
        assert_eq!(session.remaining_at(now), Duration::minutes(10));
    }

    #[test]
    fn test_expiry_is_exclusive_at_deadline() {
        let now = test_now();
        let session = UnlockSession::begin(GroupId::new("group:a"), AccessWindow::Minutes5, now);

        let deadline = now + Duration::minutes(5);
        assert!(session.is_active_at(deadline - Duration::seconds(1)));
        assert!(!session.is_active_at(deadline));
        assert_eq!(session.remaining_at(deadline), Duration::zero());
    }

    #[test]
    fn test_extend_active_session_stacks_on_deadline() {
        let now = test_now();
        let mut session = UnlockSession::begin(GroupId::new("group:a"), AccessWindow::Minutes10, now);

        // Three minutes in, buy another ten: 7 left + 10 new = 17.
        let later = now + Duration::minutes(3);
        session.extend_at(AccessWindow::Minutes10, later);

        assert_eq!(session.remaining_at(later), Duration::minutes(17));
        assert_eq!(session.started_at, now);
    }

    #[test]
    fn test_extend_lapsed_session_restarts_from_now() {
        let now = test_now();
        let mut session = UnlockSession::begin(GroupId::new("group:a"), AccessWindow::Minutes5, now);

        let later = now + Duration::hours(1);
        assert!(!session.is_active_at(later));

        session.extend_at(AccessWindow::Minutes30, later);
        assert_eq!(session.started_at, later);
        assert_eq!(session.expires_at, later + Duration::minutes(30));
    }
}
