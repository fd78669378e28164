//! Error types for the point ledger
//!
//! This module defines all error types that can occur while applying point
//! operations or reading them from input.
//!
//! # Error Categories
//!
//! - **Validation Errors**: limit exceeded, insufficient balance, invalid amount.
//!   Recoverable, and the ledger state is left untouched.
//! - **Store Errors**: failures reported by a balance or history store,
//!   propagated to the caller unchanged.
//! - **Input Errors**: I/O failures, malformed CSV rows, unknown operation types.

use super::balance::{Points, UserId};
use thiserror::Error;

/// Main error type for the point ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointError {
    /// Charging would push the balance above the maximum
    ///
    /// This is a recoverable error - the charge is rejected and neither the
    /// balance nor the history changes.
    #[error("Charge of {requested} for user {user_id} exceeds the maximum balance {max}: current {current}")]
    LimitExceeded {
        user_id: UserId,
        current: Points,
        requested: Points,
        max: Points,
    },

    /// Using more points than the user holds
    ///
    /// This is a recoverable error - the use is rejected and neither the
    /// balance nor the history changes.
    #[error("Insufficient balance for user {user_id}: current {current}, requested {requested}")]
    InsufficientBalance {
        user_id: UserId,
        current: Points,
        requested: Points,
    },

    /// Amount is zero or negative
    #[error("Invalid amount {amount} for user {user_id}: amount must be positive")]
    InvalidAmount { user_id: UserId, amount: Points },

    /// A balance or history store failed
    #[error("Store error: {message}")]
    Store {
        /// Description reported by the store
        message: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError { message: String },

    /// CSV parsing error occurred
    ///
    /// The malformed row is skipped and processing continues.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        message: String,
    },

    /// Unknown operation type in input
    #[error("Invalid operation type '{kind}' for user {user_id}")]
    InvalidOperationType { kind: String, user_id: UserId },
}

impl From<std::io::Error> for PointError {
    fn from(error: std::io::Error) -> Self {
        PointError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for PointError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            return PointError::IoError {
                message: error.to_string(),
            };
        }
        let line = error.position().map(|pos| pos.line());

        PointError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl PointError {
    /// Create a LimitExceeded error
    pub fn limit_exceeded(
        user_id: UserId,
        current: Points,
        requested: Points,
        max: Points,
    ) -> Self {
        PointError::LimitExceeded {
            user_id,
            current,
            requested,
            max,
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(user_id: UserId, current: Points, requested: Points) -> Self {
        PointError::InsufficientBalance {
            user_id,
            current,
            requested,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(user_id: UserId, amount: Points) -> Self {
        PointError::InvalidAmount { user_id, amount }
    }

    /// Create a Store error
    pub fn store(message: impl Into<String>) -> Self {
        PointError::Store {
            message: message.into(),
        }
    }

    /// Create an IoError with context
    pub fn io(message: impl Into<String>) -> Self {
        PointError::IoError {
            message: message.into(),
        }
    }

    /// Create a ParseError not yet tied to a line
    pub fn parse(message: impl Into<String>) -> Self {
        PointError::ParseError {
            line: None,
            message: message.into(),
        }
    }

    /// Attach a line number to a ParseError that has none
    ///
    /// Other variants are returned unchanged.
    pub fn at_line(self, line: u64) -> Self {
        match self {
            PointError::ParseError {
                line: None,
                message,
            } => PointError::ParseError {
                line: Some(line),
                message,
            },
            other => other,
        }
    }

    /// Create an InvalidOperationType error
    pub fn invalid_operation_type(kind: &str, user_id: UserId) -> Self {
        PointError::InvalidOperationType {
            kind: kind.to_string(),
            user_id,
        }
    }

    /// Whether this is a domain validation failure rather than a fault
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PointError::LimitExceeded { .. }
                | PointError::InsufficientBalance { .. }
                | PointError::InvalidAmount { .. }
        )
    }

    /// Whether this describes a bad input row that can be skipped
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            PointError::ParseError { .. } | PointError::InvalidOperationType { .. }
        )
    }
}
