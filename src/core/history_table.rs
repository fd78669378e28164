//! In-memory history store
//!
//! `InMemoryHistoryTable` keeps every committed record in a single vector in
//! insertion order. Ids are assigned from a cursor under the same mutex as the
//! push, so ids are unique and follow insertion order.

use crate::core::traits::HistoryStore;
use crate::types::{PointError, Points, TransactionId, TransactionKind, TransactionRecord, UserId};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::thread;
use std::time::Duration;

#[derive(Debug, Default)]
struct HistoryLog {
    records: Vec<TransactionRecord>,
    cursor: TransactionId,
}

/// Thread-safe append-only history table
#[derive(Debug, Default)]
pub struct InMemoryHistoryTable {
    log: Mutex<HistoryLog>,
    latency: Duration,
}

impl InMemoryHistoryTable {
    /// Create an empty table with no simulated latency
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// Create an empty table that sleeps for `latency` on every call
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            log: Mutex::new(HistoryLog::default()),
            latency,
        }
    }

    /// Every record across all users, in insertion order
    pub fn all_records(&self) -> Vec<TransactionRecord> {
        self.log.lock().records.clone()
    }

    fn throttle(&self) {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
    }
}

impl HistoryStore for InMemoryHistoryTable {
    fn append_record(
        &self,
        user_id: UserId,
        amount: Points,
        kind: TransactionKind,
        timestamp: DateTime<Utc>,
    ) -> Result<TransactionRecord, PointError> {
        self.throttle();
        let mut log = self.log.lock();
        log.cursor += 1;
        let record = TransactionRecord {
            id: log.cursor,
            user_id,
            amount,
            kind,
            timestamp,
        };
        log.records.push(record.clone());
        Ok(record)
    }

    fn read_all_records(&self, user_id: UserId) -> Result<Vec<TransactionRecord>, PointError> {
        self.throttle();
        Ok(self
            .log
            .lock()
            .records
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }
}
