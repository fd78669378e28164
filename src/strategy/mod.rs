//! Processing strategy module for ledger replay
//!
//! This module defines the Strategy pattern for complete replay pipelines,
//! covering CSV parsing, applying operations through the point service, and
//! writing the final report. Implementations (sequential, concurrent) are
//! selected at runtime.

use crate::cli::{ReportType, StrategyType};
use crate::core::{InMemoryBalanceTable, InMemoryHistoryTable, InMemoryPointService, LockRegistry};
use crate::io::csv_format::{write_balances_csv, write_history_csv};
use crate::types::{PointError, PointOperation, UserBalance};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::{replay, SyncProcessingStrategy};

/// Processing strategy trait for complete replay pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Replay operations from the input file and write the report to output
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the replay completed (rejected operations included)
    /// * `Err(PointError::IoError)` if the input could not be opened or the
    ///   report could not be written
    ///
    /// Rejected operations, store failures and malformed rows are logged and
    /// counted in the [`ReplaySummary`]; none of them abort the replay.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), PointError>;
}

/// Outcome counts of one replay
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Operations that committed
    pub applied: usize,
    /// Operations refused by balance validation
    pub rejected: usize,
    /// Operations that hit a store fault
    pub failed: usize,
    /// Input rows that could not be parsed
    pub skipped: usize,
}

impl ReplaySummary {
    /// Count the outcome of one operation
    ///
    /// Validation rejections are already logged by the service. Store faults
    /// are logged here at error level.
    pub fn record(
        &mut self,
        operation: &PointOperation,
        result: &Result<UserBalance, PointError>,
    ) {
        match result {
            Ok(_) => self.applied += 1,
            Err(e) if e.is_validation() => self.rejected += 1,
            Err(e) => {
                error!(
                    user_id = operation.user_id,
                    kind = %operation.kind,
                    error = %e,
                    "point operation failed"
                );
                self.failed += 1;
            }
        }
    }
}

/// Configuration of the in-memory stores backing a replay
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Simulated latency of every store call
    pub latency: Duration,
}

impl StoreConfig {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Build a point service over fresh in-memory stores
    pub fn build_service(&self) -> InMemoryPointService {
        InMemoryPointService::new(
            Arc::new(InMemoryBalanceTable::with_latency(self.latency)),
            Arc::new(InMemoryHistoryTable::with_latency(self.latency)),
            Arc::new(LockRegistry::new()),
        )
    }
}

/// Write the selected report for the final ledger state
pub fn write_report(
    service: &InMemoryPointService,
    report: ReportType,
    output: &mut dyn Write,
) -> Result<(), PointError> {
    match report {
        ReportType::Balances => {
            write_balances_csv(&service.balance_store().all_balances(), output)
        }
        ReportType::History => write_history_csv(&service.history_store().all_records(), output),
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - Sequential or concurrent replay
/// * `config` - Optional batch configuration (ignored for sync)
/// * `store` - In-memory store configuration
/// * `report` - Which report to write once the replay completes
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    store: StoreConfig,
    report: ReportType,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(store, report)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, store, report))
        }
    }
}
