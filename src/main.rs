//! Point ledger CLI
//!
//! Replays charge/use operations from a CSV file through the point service
//! and writes the final report to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > balances.csv
//! cargo run -- --strategy async --workers 8 operations.csv > balances.csv
//! cargo run -- --report history operations.csv > history.csv
//! POINT_LEDGER_LOG=debug cargo run -- operations.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use point_ledger::{cli, logging, strategy};
use std::process;
use tracing::error;

fn main() {
    logging::init_tracing();

    let args = cli::parse_args();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config, args.to_store_config(), args.report)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        error!(error = %e, "replay failed");
        process::exit(1);
    }
}
