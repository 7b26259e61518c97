//! Read-only lookup services consumed by the engine.
//!
//! The employee, contract, attendance, leave, and sales stores live
//! outside this crate. The engine reads them through these traits and
//! treats every failure as an external-service error to be collected,
//! never a reason to abort a batch.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::PayrollResult;
use crate::models::{AttendanceRecord, Contract, LeaveRequest};

/// Access to employee compensation contracts.
#[async_trait]
pub trait ContractLookup: Send + Sync {
    /// Lists the ids of every employee holding an active contract.
    async fn list_contracted_employee_ids(&self) -> PayrollResult<Vec<String>>;

    /// Returns the employee's active contract, or `None` if they have none.
    async fn get(&self, employee_id: &str) -> PayrollResult<Option<Contract>>;
}

/// Access to attendance records filtered to a period's date range.
#[async_trait]
pub trait AttendanceLookup: Send + Sync {
    /// Returns the employee's attendance records whose shift date falls
    /// inside the inclusive `start..=end` span.
    async fn for_period(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<Vec<AttendanceRecord>>;
}

/// Access to approved leave requests overlapping a period.
#[async_trait]
pub trait LeaveLookup: Send + Sync {
    /// Returns the employee's approved leave requests overlapping the
    /// inclusive `start..=end` span.
    async fn approved_overlapping(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<Vec<LeaveRequest>>;
}

/// Access to sales volume attributed to an employee, for commission pay.
#[async_trait]
pub trait SalesLookup: Send + Sync {
    /// Returns the employee's total sales volume inside the inclusive
    /// `start..=end` span.
    async fn volume_for_period(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<Decimal>;
}
