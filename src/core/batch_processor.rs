//! Concurrent batch submission of point operations
//!
//! This module provides the `BatchProcessor` struct, which submits every
//! operation of a batch as its own blocking task on the tokio runtime.
//!
//! # Design
//!
//! Unlike a partition-per-user scheme, no ordering is imposed here: same-user
//! operations race for that user's guard inside [`PointService`], and the
//! guard decides the order they commit in. Different users never wait on
//! each other.
//!
//! At most `max_in_flight` operations of a batch run at once. Submissions are
//! pulled lazily from the batch, so a task is only spawned once a slot frees
//! up.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── Arc<PointService>  (shared, guard-serialized per user)
//! ```

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::error;

use super::point_service::PointService;
use super::traits::{BalanceStore, HistoryStore};
use crate::types::{PointError, PointOperation, UserBalance};

/// Result of applying a single operation
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The operation that was applied
    pub operation: PointOperation,

    /// The resulting balance or the reason the operation was rejected
    pub result: Result<UserBalance, PointError>,
}

/// Submits batches of operations concurrently
#[derive(Debug)]
pub struct BatchProcessor<B, H> {
    service: Arc<PointService<B, H>>,

    /// Upper bound on concurrently running operations
    max_in_flight: usize,
}

impl<B, H> Clone for BatchProcessor<B, H> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            max_in_flight: self.max_in_flight,
        }
    }
}

impl<B, H> BatchProcessor<B, H>
where
    B: BalanceStore + 'static,
    H: HistoryStore + 'static,
{
    /// Create a processor running at most `max_in_flight` operations at once
    ///
    /// A bound of zero is treated as one.
    pub fn new(service: Arc<PointService<B, H>>, max_in_flight: usize) -> Self {
        Self {
            service,
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Apply a batch of operations concurrently and wait for all of them
    ///
    /// Each operation runs on the blocking pool because guard acquisition and
    /// store calls block the calling thread. Must be called from within a
    /// tokio runtime.
    ///
    /// # Returns
    ///
    /// One `ProcessingResult` per operation that ran to completion, in
    /// submission order. A task that panicked is logged and has no result.
    pub async fn process_batch(&self, batch: Vec<PointOperation>) -> Vec<ProcessingResult> {
        let joined: Vec<_> = stream::iter(batch)
            .map(|operation| {
                let service = Arc::clone(&self.service);
                tokio::task::spawn_blocking(move || ProcessingResult {
                    operation,
                    result: service.apply(operation),
                })
            })
            .buffered(self.max_in_flight)
            .collect()
            .await;

        joined
            .into_iter()
            .filter_map(|joined| match joined {
                Ok(result) => Some(result),
                Err(e) => {
                    error!(error = %e, "point operation task panicked");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InMemoryBalanceTable, InMemoryHistoryTable, LockRegistry};
    use crate::types::{Points, TransactionKind, UserId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn processor() -> BatchProcessor<InMemoryBalanceTable, InMemoryHistoryTable> {
        BatchProcessor::new(
            Arc::new(PointService::new(
                Arc::new(InMemoryBalanceTable::new()),
                Arc::new(InMemoryHistoryTable::new()),
                Arc::new(LockRegistry::new()),
            )),
            4,
        )
    }

    /// Balance store that records how many reads overlap
    #[derive(Default)]
    struct OverlapTrackingStore {
        inner: InMemoryBalanceTable,
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl BalanceStore for OverlapTrackingStore {
        fn read_balance(&self, user_id: UserId) -> Result<Option<UserBalance>, PointError> {
            let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(active, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            self.active.fetch_sub(1, Ordering::SeqCst);
            self.inner.read_balance(user_id)
        }

        fn write_balance(
            &self,
            user_id: UserId,
            points: Points,
        ) -> Result<UserBalance, PointError> {
            self.inner.write_balance(user_id, points)
        }
    }

    #[test]
    fn test_processor_is_cloneable() {
        let service = Arc::new(PointService::new(
            Arc::new(InMemoryBalanceTable::new()),
            Arc::new(InMemoryHistoryTable::new()),
            Arc::new(LockRegistry::new()),
        ));

        let processor = BatchProcessor::new(Arc::clone(&service), 3);
        let processor_clone = processor.clone();

        assert_eq!(Arc::strong_count(&service), 3);
        assert_eq!(processor_clone.max_in_flight(), 3);
    }

    #[test]
    fn test_zero_bound_is_treated_as_one() {
        let service = Arc::new(PointService::new(
            Arc::new(InMemoryBalanceTable::new()),
            Arc::new(InMemoryHistoryTable::new()),
            Arc::new(LockRegistry::new()),
        ));

        assert_eq!(BatchProcessor::new(service, 0).max_in_flight(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_batch_bounds_concurrent_operations() {
        let store = Arc::new(OverlapTrackingStore::default());
        let service = Arc::new(PointService::new(
            Arc::clone(&store),
            Arc::new(InMemoryHistoryTable::new()),
            Arc::new(LockRegistry::new()),
        ));
        let processor = BatchProcessor::new(service, 2);
        let batch = (1..=8).map(|user_id| PointOperation::charge(user_id, 10)).collect();

        let results = processor.process_batch(batch).await;

        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| r.result.is_ok()));
        let peak = store.peak.load(Ordering::SeqCst);
        assert!(peak <= 2, "{} operations ran at once with a bound of 2", peak);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_batch_keeps_submission_order() {
        let processor = processor();
        let batch: Vec<_> = (1..=20)
            .map(|user_id| PointOperation::charge(user_id, user_id))
            .collect();

        let results = processor.process_batch(batch.clone()).await;

        let operations: Vec<_> = results.iter().map(|r| r.operation).collect();
        assert_eq!(operations, batch);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_batch_returns_result_per_operation() {
        let processor = processor();
        let batch = vec![
            PointOperation::charge(1, 100),
            PointOperation::charge(2, 200),
            PointOperation::use_points(3, 50),
        ];

        let results = processor.process_batch(batch).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].result.as_ref().unwrap().points, 100);
        assert_eq!(results[1].result.as_ref().unwrap().points, 200);
        assert!(matches!(
            results[2].result,
            Err(PointError::InsufficientBalance { .. })
        ));
        assert_eq!(results[2].operation.kind, TransactionKind::Use);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_batch_same_user_sums_charges() {
        let processor = processor();
        let batch = (0..100).map(|_| PointOperation::charge(1, 10)).collect();

        let results = processor.process_batch(batch).await;

        assert!(results.iter().all(|r| r.result.is_ok()));
        assert_eq!(processor.service.get_balance(1).unwrap().points, 1_000);
        assert_eq!(processor.service.get_history(1).unwrap().len(), 100);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_empty_batch() {
        let processor = processor();

        let results = processor.process_batch(Vec::new()).await;

        assert!(results.is_empty());
    }
}
