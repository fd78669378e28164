//! Point charge/use orchestration
//!
//! This module provides the `PointService` struct, which applies charge and
//! use operations to user balances and exposes balance and history queries.
//!
//! # Design
//!
//! Every mutation runs a read-validate-write-append sequence against the
//! balance and history stores. The stores are individually atomic but do not
//! isolate a read from a later write, so the service wraps the whole sequence
//! in the user's guard from the [`LockRegistry`]:
//!
//! ```text
//! acquire guard(user)
//!     ├── read balance (absent = 0)
//!     ├── compute + validate
//!     ├── write balance
//!     └── append history record
//! release guard (on every exit path)
//! ```
//!
//! Queries take no guard and return point-in-time snapshots.
//!
//! # Thread Safety
//!
//! `PointService` is `Send + Sync` and is meant to be shared behind an `Arc`.
//! Operations on the same user are serialized in guard acquisition order;
//! operations on different users run in parallel.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::lock_registry::LockRegistry;
use super::traits::{BalanceStore, HistoryStore};
use crate::types::{
    PointError, PointOperation, Points, TransactionKind, TransactionRecord, UserBalance, UserId,
    MAX_BALANCE,
};

/// Orchestrates point operations over a balance store and a history store
#[derive(Debug)]
pub struct PointService<B, H> {
    balance_store: Arc<B>,
    history_store: Arc<H>,

    /// Per-user guards serializing mutations
    lock_registry: Arc<LockRegistry>,
}

impl<B, H> PointService<B, H>
where
    B: BalanceStore,
    H: HistoryStore,
{
    /// Create a new PointService
    ///
    /// # Arguments
    ///
    /// * `balance_store` - Store holding current balances
    /// * `history_store` - Append-only store of committed operations
    /// * `lock_registry` - Registry providing the per-user guards
    pub fn new(
        balance_store: Arc<B>,
        history_store: Arc<H>,
        lock_registry: Arc<LockRegistry>,
    ) -> Self {
        Self {
            balance_store,
            history_store,
            lock_registry,
        }
    }

    /// Charge points to a user
    ///
    /// # Returns
    ///
    /// * `Ok(UserBalance)` - The balance after the charge
    /// * `Err(PointError::InvalidAmount)` - If `amount` is not positive
    /// * `Err(PointError::LimitExceeded)` - If the new balance would exceed `MAX_BALANCE`
    /// * `Err(PointError::Store)` - If a store fails
    pub fn charge_points(
        &self,
        user_id: UserId,
        amount: Points,
    ) -> Result<UserBalance, PointError> {
        ensure_positive(user_id, amount)?;

        self.with_user_guard(user_id, TransactionKind::Charge, || {
            let current = self.current_points(user_id)?;
            let updated = current
                .checked_add(amount)
                .filter(|points| *points <= MAX_BALANCE)
                .ok_or_else(|| {
                    PointError::limit_exceeded(user_id, current, amount, MAX_BALANCE)
                })?;

            self.commit(user_id, amount, TransactionKind::Charge, updated)
        })
    }

    /// Use points from a user
    ///
    /// # Returns
    ///
    /// * `Ok(UserBalance)` - The balance after the use
    /// * `Err(PointError::InvalidAmount)` - If `amount` is not positive
    /// * `Err(PointError::InsufficientBalance)` - If `amount` exceeds the current balance
    /// * `Err(PointError::Store)` - If a store fails
    pub fn use_points(&self, user_id: UserId, amount: Points) -> Result<UserBalance, PointError> {
        ensure_positive(user_id, amount)?;

        self.with_user_guard(user_id, TransactionKind::Use, || {
            let current = self.current_points(user_id)?;
            if current < amount {
                return Err(PointError::insufficient_balance(user_id, current, amount));
            }

            self.commit(user_id, amount, TransactionKind::Use, current - amount)
        })
    }

    /// Apply a parsed operation by routing to charge or use
    pub fn apply(&self, operation: PointOperation) -> Result<UserBalance, PointError> {
        match operation.kind {
            TransactionKind::Charge => self.charge_points(operation.user_id, operation.amount),
            TransactionKind::Use => self.use_points(operation.user_id, operation.amount),
        }
    }

    /// Current balance of a user; zero if the user has no balance yet
    ///
    /// Takes no guard, so it may observe a state from just before or just
    /// after a concurrent mutation, never a half-applied one.
    pub fn get_balance(&self, user_id: UserId) -> Result<UserBalance, PointError> {
        Ok(self
            .balance_store
            .read_balance(user_id)?
            .unwrap_or_else(|| UserBalance::empty(user_id)))
    }

    /// All committed operations of a user, in insertion order
    pub fn get_history(&self, user_id: UserId) -> Result<Vec<TransactionRecord>, PointError> {
        self.history_store.read_all_records(user_id)
    }

    pub fn balance_store(&self) -> &Arc<B> {
        &self.balance_store
    }

    pub fn history_store(&self) -> &Arc<H> {
        &self.history_store
    }

    pub fn lock_registry(&self) -> &Arc<LockRegistry> {
        &self.lock_registry
    }

    /// Run `f` while holding the user's guard
    ///
    /// The guard is released when `_held` drops, which covers success, error
    /// returns and unwinding.
    fn with_user_guard<T>(
        &self,
        user_id: UserId,
        kind: TransactionKind,
        f: impl FnOnce() -> Result<T, PointError>,
    ) -> Result<T, PointError> {
        let guard = self.lock_registry.acquire_guard_for(user_id);
        let _held = guard.lock();

        f().inspect_err(|error| {
            warn!(user_id, kind = %kind, error = %error, "point operation rejected");
        })
    }

    fn current_points(&self, user_id: UserId) -> Result<Points, PointError> {
        Ok(self
            .balance_store
            .read_balance(user_id)?
            .map_or(0, |balance| balance.points))
    }

    /// Write the new balance, then record the operation in history
    fn commit(
        &self,
        user_id: UserId,
        amount: Points,
        kind: TransactionKind,
        updated: Points,
    ) -> Result<UserBalance, PointError> {
        let balance = self.balance_store.write_balance(user_id, updated)?;
        let record = self
            .history_store
            .append_record(user_id, amount, kind, Utc::now())?;

        debug!(
            user_id,
            kind = %kind,
            amount,
            points = balance.points,
            record_id = record.id,
            "point operation committed"
        );
        Ok(balance)
    }
}

fn ensure_positive(user_id: UserId, amount: Points) -> Result<(), PointError> {
    if amount <= 0 {
        warn!(user_id, amount, "rejected non-positive amount");
        return Err(PointError::invalid_amount(user_id, amount));
    }
    Ok(())
}
