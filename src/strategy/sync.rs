//! Sequential processing strategy
//!
//! Applies operations one at a time in file order on the calling thread.
//! Same-user guards are still taken, so the result is identical to what a
//! single caller would observe against a shared service.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Balance mutation to `PointService`
//! - Report output to `write_report`

use crate::cli::ReportType;
use crate::core::{BalanceStore, HistoryStore, PointService};
use crate::io::sync_reader::SyncReader;
use crate::strategy::{write_report, ProcessingStrategy, ReplaySummary, StoreConfig};
use crate::types::{PointError, PointOperation};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Apply parsed rows to the service one at a time, in order
///
/// Bad rows are logged and skipped. Every applied operation is counted in
/// the returned summary. An I/O failure while reading stops the replay and
/// is returned.
pub fn replay<B, H>(
    service: &PointService<B, H>,
    rows: impl IntoIterator<Item = Result<PointOperation, PointError>>,
) -> Result<ReplaySummary, PointError>
where
    B: BalanceStore,
    H: HistoryStore,
{
    let mut summary = ReplaySummary::default();
    for row in rows {
        match row {
            Ok(operation) => {
                let result = service.apply(operation);
                summary.record(&operation, &result);
            }
            Err(e) if e.is_input() => {
                warn!(error = %e, "skipping malformed record");
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(summary)
}

/// Sequential processing strategy
///
/// ```no_run
/// use point_ledger::cli::ReportType;
/// use point_ledger::strategy::{ProcessingStrategy, StoreConfig, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let strategy = SyncProcessingStrategy::new(StoreConfig::default(), ReportType::Balances);
/// let mut output = std::io::stdout();
///
/// strategy.process(Path::new("operations.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    store: StoreConfig,
    report: ReportType,
}

impl SyncProcessingStrategy {
    pub fn new(store: StoreConfig, report: ReportType) -> Self {
        Self { store, report }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), PointError> {
        let service = self.store.build_service();
        let reader = SyncReader::new(input_path)?;

        let summary = replay(&service, reader)?;

        info!(
            applied = summary.applied,
            rejected = summary.rejected,
            failed = summary.failed,
            skipped = summary.skipped,
            "sequential replay finished"
        );
        write_report(&service, self.report, output)
    }
}
