//! Core traits for balance and history storage
//!
//! The point service only depends on these traits, so any store that offers
//! atomic point reads and writes can back it. Stores are shared across
//! threads and must be safe for concurrent calls; they are not expected to
//! provide isolation across calls; the service's per-user guard does that.

use crate::types::{Points, PointError, TransactionKind, TransactionRecord, UserBalance, UserId};
use chrono::{DateTime, Utc};

/// Store holding the current balance of each user
pub trait BalanceStore: Send + Sync {
    /// Read the balance row for a user, `None` if the user has none yet
    fn read_balance(&self, user_id: UserId) -> Result<Option<UserBalance>, PointError>;

    /// Insert or fully replace the balance row for a user
    fn write_balance(&self, user_id: UserId, points: Points) -> Result<UserBalance, PointError>;
}

/// Append-only log of committed operations
pub trait HistoryStore: Send + Sync {
    /// Append a record and return it with its assigned id
    fn append_record(
        &self,
        user_id: UserId,
        amount: Points,
        kind: TransactionKind,
        timestamp: DateTime<Utc>,
    ) -> Result<TransactionRecord, PointError>;

    /// All records for a user, in insertion order
    fn read_all_records(&self, user_id: UserId) -> Result<Vec<TransactionRecord>, PointError>;
}
