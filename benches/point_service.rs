//! Benchmark suite for the point service and replay strategies
//!
//! Compares contention on a single user against traffic spread over many
//! users, and the sequential strategy against the concurrent one on a
//! generated operations file.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use point_ledger::cli::{ReportType, StrategyType};
use point_ledger::strategy::{create_strategy, BatchConfig, StoreConfig};
use std::io::Write;
use std::sync::Arc;
use std::thread;
use tempfile::NamedTempFile;

const OPERATIONS: usize = 1_000;
const THREADS: usize = 8;

fn main() {
    divan::main();
}

/// Charge from several threads, with operations spread over `users` users
fn charge_from_threads(users: i64) {
    let service = Arc::new(StoreConfig::default().build_service());
    let per_thread = OPERATIONS / THREADS;

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for i in 0..per_thread {
                    let user_id = ((t * per_thread + i) as i64 % users) + 1;
                    service.charge_points(user_id, 1).expect("charge failed");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }
}

/// All threads contend for one user's guard
#[divan::bench]
fn charge_single_user() {
    charge_from_threads(1);
}

/// Threads mostly hit distinct users
#[divan::bench(args = [16, 256])]
fn charge_many_users(users: i64) {
    charge_from_threads(users);
}

fn operations_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "type,user,amount").expect("write failed");
    for i in 0..OPERATIONS {
        let user = i % 50 + 1;
        if i % 4 == 3 {
            writeln!(file, "use,{},5", user).expect("write failed");
        } else {
            writeln!(file, "charge,{},10", user).expect("write failed");
        }
    }
    file.flush().expect("flush failed");
    file
}

#[divan::bench]
fn sync_strategy(bencher: divan::Bencher) {
    let input = operations_file();
    bencher.bench_local(|| {
        let strategy = create_strategy(
            StrategyType::Sync,
            None,
            StoreConfig::default(),
            ReportType::Balances,
        );
        let mut output = Vec::new();
        strategy
            .process(input.path(), &mut output)
            .expect("Processing failed");
    });
}

#[divan::bench]
fn async_strategy(bencher: divan::Bencher) {
    let input = operations_file();
    bencher.bench_local(|| {
        let strategy = create_strategy(
            StrategyType::Async,
            Some(BatchConfig::default()),
            StoreConfig::default(),
            ReportType::Balances,
        );
        let mut output = Vec::new();
        strategy
            .process(input.path(), &mut output)
            .expect("Processing failed");
    });
}
