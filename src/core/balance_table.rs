//! In-memory balance store
//!
//! This module provides `InMemoryBalanceTable`, a `BalanceStore` backed by a
//! `DashMap`. Each read and write is atomic for its own row. Nothing here
//! isolates a read from a later write; the point service's per-user guard
//! provides that.
//!
//! The table can simulate a fixed per-call latency, which makes contention
//! between callers observable in tests and benchmarks.

use crate::core::traits::BalanceStore;
use crate::types::{PointError, Points, UserBalance, UserId};
use dashmap::DashMap;
use std::thread;
use std::time::Duration;

/// Thread-safe in-memory balance table
#[derive(Debug, Default)]
pub struct InMemoryBalanceTable {
    /// Current balance row by user id
    balances: DashMap<UserId, UserBalance>,

    /// Simulated latency applied to every call
    latency: Duration,
}

impl InMemoryBalanceTable {
    /// Create an empty table with no simulated latency
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// Create an empty table that sleeps for `latency` on every call
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            balances: DashMap::new(),
            latency,
        }
    }

    /// Snapshot of every stored balance, in arbitrary order
    pub fn all_balances(&self) -> Vec<UserBalance> {
        self.balances
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn throttle(&self) {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
    }
}

impl BalanceStore for InMemoryBalanceTable {
    fn read_balance(&self, user_id: UserId) -> Result<Option<UserBalance>, PointError> {
        self.throttle();
        Ok(self
            .balances
            .get(&user_id)
            .map(|entry| entry.value().clone()))
    }

    fn write_balance(&self, user_id: UserId, points: Points) -> Result<UserBalance, PointError> {
        self.throttle();
        let balance = UserBalance::new(user_id, points);
        self.balances.insert(user_id, balance.clone());
        Ok(balance)
    }
}
