use crate::strategy::{BatchConfig, StoreConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Replay point charge/use operations against a per-user serialized ledger
#[derive(Parser, Debug)]
#[command(name = "point-ledger")]
#[command(about = "Replay point charge/use operations and report balances or history", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing operations (type,user,amount)
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for file order or 'async' for concurrent submission"
    )]
    pub strategy: StrategyType,

    /// Number of operations per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of operations per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Worker thread count (async mode only)
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Simulated latency of every store call, in milliseconds
    #[arg(long = "store-latency-ms", value_name = "MILLIS", default_value_t = 0)]
    pub store_latency_ms: u64,

    /// Report written to stdout
    #[arg(long = "report", value_name = "REPORT", default_value = "balances")]
    pub report: ReportType,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Available reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportType {
    /// Final balance per user
    Balances,
    /// Every committed operation
    History,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments, falling back to defaults
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.workers.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.workers.unwrap_or(default.workers),
            )
        } else {
            BatchConfig::default()
        }
    }

    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig::new(Duration::from_millis(self.store_latency_ms))
    }
}
