//! Leave request model and overlap arithmetic.
//!
//! Only approved leave affects pay; the engine receives leave requests as
//! read-only input already filtered to those overlapping a period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The review status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting review.
    Pending,
    /// Approved; affects pay for the overlapped days.
    Approved,
    /// Denied; has no effect on pay.
    Denied,
}

/// A leave request covering an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// The employee requesting leave.
    pub employee_id: String,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// The review status of the request.
    pub status: LeaveStatus,
}

impl LeaveRequest {
    /// Returns the inclusive number of leave days that fall inside the
    /// given date span.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{LeaveRequest, LeaveStatus};
    /// use chrono::NaiveDate;
    ///
    /// let leave = LeaveRequest {
    ///     employee_id: "emp_001".to_string(),
    ///     start_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
    ///     status: LeaveStatus::Approved,
    /// };
    ///
    /// let period_start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    /// let period_end = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
    /// assert_eq!(leave.overlap_days(period_start, period_end), 3);
    /// ```
    pub fn overlap_days(&self, span_start: NaiveDate, span_end: NaiveDate) -> i64 {
        let start = self.start_date.max(span_start);
        let end = self.end_date.min(span_end);
        if start > end {
            return 0;
        }
        (end - start).num_days() + 1
    }

    /// Returns true if the request is approved.
    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }
}
