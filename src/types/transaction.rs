//! Transaction-related types for the point ledger
//!
//! This module defines the history record appended for every committed
//! charge or use, and the operation requests fed into the service.

use super::balance::{Points, UserId};
use chrono::{DateTime, Utc};
use std::fmt;

/// History record identifier, assigned by the history store
///
/// Sequence starts at 1 and grows by one per appended record.
pub type TransactionId = u64;

/// Kind of balance mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Credit points to a user
    Charge,

    /// Debit points from a user
    ///
    /// Requires the current balance to cover the amount.
    Use,
}

impl TransactionKind {
    /// Lowercase name used in CSV input and output
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Charge => "charge",
            TransactionKind::Use => "use",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Committed history entry
///
/// Immutable once appended. `amount` is always the positive magnitude of the
/// operation; the direction is carried by `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Sequence number assigned on append
    pub id: TransactionId,

    /// The user whose balance changed
    pub user_id: UserId,

    /// Magnitude of the operation
    pub amount: Points,

    /// Whether points were charged or used
    pub kind: TransactionKind,

    /// When the operation committed
    pub timestamp: DateTime<Utc>,
}

/// A single charge or use request read from input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointOperation {
    pub kind: TransactionKind,
    pub user_id: UserId,
    pub amount: Points,
}

impl PointOperation {
    pub fn charge(user_id: UserId, amount: Points) -> Self {
        PointOperation {
            kind: TransactionKind::Charge,
            user_id,
            amount,
        }
    }

    pub fn use_points(user_id: UserId, amount: Points) -> Self {
        PointOperation {
            kind: TransactionKind::Use,
            user_id,
            amount,
        }
    }
}
