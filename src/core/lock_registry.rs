//! Per-user guard registry
//!
//! This module provides the `LockRegistry` struct, which hands out one
//! exclusive-access guard per user id. Operations on the same user share the
//! guard and are serialized; operations on different users use different
//! guards and never contend.
//!
//! # Design
//!
//! Guards live in a `DashMap` keyed by user id. Lookup-or-create goes through
//! the map's entry API, which holds the shard lock for the whole check and
//! insert, so concurrent first access to an id always ends with a single
//! registered guard.
//!
//! Guards are never evicted. The registry grows with the number of distinct
//! users seen during its lifetime.

use crate::types::UserId;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Exclusive-access handle for one user
///
/// Carries no data; locking it is what serializes a user's critical section.
pub type UserGuard = Arc<Mutex<()>>;

/// Registry mapping each user id to its guard
#[derive(Debug, Default)]
pub struct LockRegistry {
    guards: DashMap<UserId, UserGuard>,
}

impl LockRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            guards: DashMap::new(),
        }
    }

    /// Get the guard for a user, creating and registering it on first use
    ///
    /// The returned handle is a clone of the registered `Arc`, and the shard
    /// lock is released before returning. Callers must not lock the guard
    /// while holding any reference into the map.
    pub fn acquire_guard_for(&self, user_id: UserId) -> UserGuard {
        let entry = self
            .guards
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())));
        Arc::clone(&*entry)
    }

    /// Number of registered guards
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether no guard has been created yet
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Whether a guard has been registered for the user
    pub fn contains(&self, user_id: UserId) -> bool {
        self.guards.contains_key(&user_id)
    }
}
