//! Balance-related types for the point ledger
//!
//! This module defines the `UserBalance` snapshot and the limits that apply
//! to every committed balance.

use chrono::{DateTime, Utc};

/// User identifier
pub type UserId = i64;

/// Point quantity
///
/// Signed so that malformed input (zero or negative amounts) can be
/// represented and rejected instead of wrapping.
pub type Points = i64;

/// Upper bound on any committed balance
pub const MAX_BALANCE: Points = 1_000_000;

/// Current point balance of a single user
///
/// There is one logical row per user id. The row is only mutated through the
/// serialized charge/use path of [`crate::core::PointService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBalance {
    /// The user owning this balance
    pub user_id: UserId,

    /// Points currently held, always within `0..=MAX_BALANCE`
    pub points: Points,

    /// When the balance was last written
    pub updated_at: DateTime<Utc>,
}

impl UserBalance {
    /// Create a balance snapshot stamped with the current time
    pub fn new(user_id: UserId, points: Points) -> Self {
        UserBalance {
            user_id,
            points,
            updated_at: Utc::now(),
        }
    }

    /// Zero balance for a user that has no stored row yet
    pub fn empty(user_id: UserId) -> Self {
        Self::new(user_id, 0)
    }
}
