//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll calculation and
//! settlement.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::PayrollStatus;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::PayrollError;
///
/// let error = PayrollError::ContractNotFound {
///     employee_id: "emp_001".to_string(),
/// };
/// assert_eq!(error.to_string(), "No active contract for employee: emp_001");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// The employee has no active contract.
    ///
    /// Collected (not fatal) in batch runs; surfaced directly when a single
    /// employee is targeted.
    #[error("No active contract for employee: {employee_id}")]
    ContractNotFound {
        /// The employee without a contract.
        employee_id: String,
    },

    /// No payroll record exists with the given id.
    #[error("Payroll record not found: {payroll_id}")]
    PayrollNotFound {
        /// The id that was not found.
        payroll_id: Uuid,
    },

    /// The payroll record is settled and cannot be recomputed or paid again.
    #[error("Payroll {payroll_id} is locked: record is already paid")]
    PayrollLocked {
        /// The id of the settled record.
        payroll_id: Uuid,
    },

    /// A payment would exceed the record's outstanding balance.
    #[error(
        "Payment of {amount} rejected for payroll {payroll_id}: only {pending} is outstanding"
    )]
    OverpaymentRejected {
        /// The id of the payroll record.
        payroll_id: Uuid,
        /// The rejected payment amount.
        amount: Decimal,
        /// The outstanding balance at the time of the attempt.
        pending: Decimal,
    },

    /// A payment amount was zero or negative.
    #[error("Invalid payment amount: {amount}")]
    InvalidAmount {
        /// The rejected amount.
        amount: Decimal,
    },

    /// A payment reused a transaction reference already in the ledger.
    #[error("Transaction reference already recorded: {transaction_id}")]
    DuplicateTransaction {
        /// The reused reference.
        transaction_id: String,
    },

    /// A partially settled record cannot be marked paid.
    #[error("Payroll {payroll_id} has an outstanding balance of {pending}")]
    OutstandingBalance {
        /// The id of the payroll record.
        payroll_id: Uuid,
        /// The remaining unpaid amount.
        pending: Decimal,
    },

    /// The requested status transition is not part of the state machine.
    #[error("Invalid payroll status change: {from:?} -> {to:?}")]
    InvalidStatusChange {
        /// The current status.
        from: PayrollStatus,
        /// The requested target status.
        to: PayrollStatus,
    },

    /// The cluster lock is held by another instance.
    ///
    /// An expected outcome under multi-instance deployment, not a fault.
    #[error("Cluster lock '{name}' is held by another instance")]
    LockBusy {
        /// The name of the contested lock.
        name: String,
    },

    /// An explicit run target named a month outside 1-12.
    #[error("Invalid month: {month} (must be 1-12)")]
    InvalidMonth {
        /// The rejected month value.
        month: u32,
    },

    /// The salary cutoff day is outside 1-31.
    #[error("Invalid salary cutoff day: {day} (must be 1-31)")]
    InvalidCutoffDay {
        /// The rejected day value.
        day: u32,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An external collaborator (lookup service, journal) failed.
    #[error("External service error: {message}")]
    External {
        /// A description of the collaborator failure.
        message: String,
    },
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;
