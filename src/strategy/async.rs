//! Concurrent batch processing strategy
//!
//! This module provides a multi-threaded implementation of the
//! ProcessingStrategy trait. Operations are read in batches and every
//! operation in a batch is submitted concurrently.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, workers)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (one blocking task per operation, at most `workers` at once)
//!     └── PointService (per-user guards)
//!         ├── InMemoryBalanceTable
//!         └── InMemoryHistoryTable
//! ```
//!
//! # Ordering
//!
//! Batches are processed one after another, so an operation never races with
//! one from a later batch. Inside a batch, same-user operations commit in
//! whatever order their guard acquisitions succeed. The final balance always
//! equals the sum of the committed operations; which operations are rejected
//! can differ from the sequential strategy when a batch mixes charges and
//! uses that depend on each other.

use crate::cli::ReportType;
use crate::core::BatchProcessor;
use crate::io::async_reader::AsyncReader;
use crate::strategy::{write_report, ProcessingStrategy, ReplaySummary, StoreConfig};
use crate::types::PointError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of operations per batch
    pub batch_size: usize,
    /// Number of runtime worker threads, and the bound on operations running
    /// at once
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            workers: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig; zero values fall back to the defaults
    pub fn new(batch_size: usize, workers: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let workers = if workers == 0 {
            warn!(workers, default = default.workers, "invalid worker count, using default");
            default.workers
        } else {
            workers
        };

        Self {
            batch_size,
            workers,
        }
    }
}

/// Concurrent batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    store: StoreConfig,
    report: ReportType,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, store: StoreConfig, report: ReportType) -> Self {
        Self {
            config,
            store,
            report,
        }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Replay operations concurrently and write the report
    ///
    /// 1. Creates a tokio multi-threaded runtime with the configured workers
    /// 2. Builds a shared PointService over fresh in-memory stores
    /// 3. Reads batches with AsyncReader
    /// 4. Submits each batch through BatchProcessor, at most `workers`
    ///    operations at once, and waits for it
    /// 5. Writes the report once the input is exhausted
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), PointError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.workers)
            .build()
            .map_err(|e| PointError::io(format!("Failed to create tokio runtime: {}", e)))?;

        let service = Arc::new(self.store.build_service());
        let processor = BatchProcessor::new(Arc::clone(&service), self.config.workers);

        let summary = runtime.block_on(async {
            let file = tokio::fs::File::open(input_path).await.map_err(|e| {
                PointError::io(format!(
                    "Failed to open file '{}': {}",
                    input_path.display(),
                    e
                ))
            })?;

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut summary = ReplaySummary::default();
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                for processed in processor.process_batch(batch).await {
                    summary.record(&processed.operation, &processed.result);
                }
            }
            summary.skipped = reader.skipped();

            Ok::<ReplaySummary, PointError>(summary)
        })?;

        info!(
            applied = summary.applied,
            rejected = summary.rejected,
            failed = summary.failed,
            skipped = summary.skipped,
            "concurrent replay finished"
        );
        write_report(&service, self.report, output)
    }
}
