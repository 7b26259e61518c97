//! Attendance record model.
//!
//! Attendance is a read-only input to the engine: one record per shift,
//! with the hours derived from check-in and check-out at the source.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single check-in/check-out shift for an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee who worked the shift.
    pub employee_id: String,
    /// When the employee checked in.
    pub check_in: DateTime<Utc>,
    /// When the employee checked out, if they have.
    pub check_out: Option<DateTime<Utc>>,
    /// Hours worked in the shift, derived at the source system.
    pub hours_worked: Decimal,
}
