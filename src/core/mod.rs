//! Core business logic module
//!
//! This module contains the point ledger components:
//! - `traits` - Balance and history store abstractions
//! - `lock_registry` - Per-user guards serializing mutations
//! - `point_service` - Charge/use orchestration and queries
//! - `balance_table` / `history_table` - In-memory store implementations
//! - `batch_processor` - Concurrent submission of operation batches

pub mod balance_table;
pub mod batch_processor;
pub mod history_table;
pub mod lock_registry;
pub mod point_service;
pub mod traits;

pub use balance_table::InMemoryBalanceTable;
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use history_table::InMemoryHistoryTable;
pub use lock_registry::{LockRegistry, UserGuard};
pub use point_service::PointService;
pub use traits::{BalanceStore, HistoryStore};

/// Point service over the in-memory tables
pub type InMemoryPointService = PointService<InMemoryBalanceTable, InMemoryHistoryTable>;
