//! Point Ledger Library
//! # Overview
//!
//! This library manages per-user point balances under concurrent access.
//! Charges and uses on the same user are serialized through a per-user guard;
//! operations on different users proceed in parallel.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (UserBalance, TransactionRecord, PointError)
//! - [`core`] - Business logic components:
//!   - [`core::lock_registry`] - One guard per user id, created on first use
//!   - [`core::point_service`] - Charge/use orchestration and queries
//!   - [`core::traits`] - Balance and history store abstractions
//!   - [`core::balance_table`] / [`core::history_table`] - In-memory stores
//! - [`io`] - CSV input of operations and report output
//! - [`strategy`] - Sequential and concurrent replay pipelines
//! - [`cli`] - CLI arguments parsing
//!
//! # Operations
//!
//! - **Charge**: credit points; rejected if the balance would exceed 1,000,000
//! - **Use**: debit points; rejected if the balance does not cover the amount
//!
//! Rejected operations leave both the balance and the history untouched.

pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use self::core::{
    BalanceStore, HistoryStore, InMemoryBalanceTable, InMemoryHistoryTable, InMemoryPointService,
    LockRegistry, PointService,
};
pub use types::{
    PointError, PointOperation, Points, TransactionKind, TransactionRecord, UserBalance, UserId,
    MAX_BALANCE,
};
