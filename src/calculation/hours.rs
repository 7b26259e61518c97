//! Attendance hour totals.

use rust_decimal::Decimal;

use crate::models::AttendanceRecord;

/// Sums `hours_worked` across the attendance records of a period.
///
/// Open shifts (no check-out) carry zero derived hours at the source and
/// therefore contribute nothing.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::total_attendance_hours;
/// use payroll_engine::models::AttendanceRecord;
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let records = vec![
///     AttendanceRecord {
///         employee_id: "emp_001".to_string(),
///         check_in: Utc::now(),
///         check_out: Some(Utc::now()),
///         hours_worked: Decimal::from_str("8").unwrap(),
///     },
///     AttendanceRecord {
///         employee_id: "emp_001".to_string(),
///         check_in: Utc::now(),
///         check_out: Some(Utc::now()),
///         hours_worked: Decimal::from_str("7.5").unwrap(),
///     },
/// ];
///
/// assert_eq!(total_attendance_hours(&records), Decimal::from_str("15.5").unwrap());
/// ```
pub fn total_attendance_hours(records: &[AttendanceRecord]) -> Decimal {
    records.iter().map(|r| r.hours_worked).sum()
}
