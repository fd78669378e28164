//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `balance`: User balance snapshot and limits
//! - `transaction`: History records and operation requests
//! - `error`: Error types for the point ledger

pub mod balance;
pub mod error;
pub mod transaction;

pub use balance::{Points, UserBalance, UserId, MAX_BALANCE};
pub use error::PointError;
pub use transaction::{PointOperation, TransactionId, TransactionKind, TransactionRecord};
