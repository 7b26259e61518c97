//! Approved-leave deductions for fixed-salary contracts.
//!
//! Each approved leave day overlapping the period deducts one day of pay
//! at the `monthly_salary / 30` daily rate. Hourly contract types carry no
//! deduction: an absent hourly employee already earns nothing for the day.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::LeaveRequest;

/// The nominal number of payable days in a month used for the daily rate.
pub const LEAVE_DAYS_PER_MONTH: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// The result of applying leave deductions over a period span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveDeductionResult {
    /// Total approved leave days falling inside the span.
    pub leave_days: i64,
    /// The deduction amount, rounded to 2 decimal places.
    pub deduction: Decimal,
}

/// Calculates the leave deduction for a fixed-salary contract.
///
/// Only requests whose status is approved count; each is intersected with
/// the inclusive `period_start..=period_end` span and the overlapping day
/// counts are summed.
///
/// # Arguments
///
/// * `leave` - The employee's leave requests overlapping the period
/// * `period_start` - First day of the period (inclusive)
/// * `period_end` - Last day of the period (inclusive)
/// * `monthly_salary` - The contract's monthly base salary
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_leave_deduction;
/// use payroll_engine::models::{LeaveRequest, LeaveStatus};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let leave = vec![LeaveRequest {
///     employee_id: "emp_001".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
///     status: LeaveStatus::Approved,
/// }];
///
/// let result = calculate_leave_deduction(
///     &leave,
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
///     Decimal::from_str("3000").unwrap(),
/// );
/// assert_eq!(result.leave_days, 2);
/// assert_eq!(result.deduction, Decimal::from_str("200.00").unwrap());
/// ```
pub fn calculate_leave_deduction(
    leave: &[LeaveRequest],
    period_start: NaiveDate,
    period_end: NaiveDate,
    monthly_salary: Decimal,
) -> LeaveDeductionResult {
    let leave_days: i64 = leave
        .iter()
        .filter(|request| request.is_approved())
        .map(|request| request.overlap_days(period_start, period_end))
        .sum();

    let daily_rate = monthly_salary / LEAVE_DAYS_PER_MONTH;
    let deduction = (daily_rate * Decimal::from(leave_days)).round_dp(2);

    LeaveDeductionResult {
        leave_days,
        deduction,
    }
}
