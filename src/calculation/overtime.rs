//! Full-time overtime splitting.
//!
//! This module splits a full-time employee's worked hours at the contract's
//! standard-hours threshold and prices the excess at the overtime rate.

use rust_decimal::Decimal;

use super::gross_pay::OVERTIME_MULTIPLIER;

/// The result of splitting worked hours at the standard-hours threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OvertimeResult {
    /// The derived hourly rate (`monthly_salary / standard_hours`).
    pub hourly_rate: Decimal,
    /// Hours worked beyond the threshold (zero when under it).
    pub overtime_hours: Decimal,
    /// Pay for the overtime hours at 1.5x the hourly rate, rounded to
    /// 2 decimal places.
    pub overtime_pay: Decimal,
}

/// Splits worked hours at the standard-hours threshold for a full-time
/// contract.
///
/// The hourly rate is the monthly salary divided by the standard hours; a
/// zero `standard_hours` yields a zero rate (and so zero overtime pay)
/// rather than a division error. Hours at or under the threshold produce
/// no overtime.
///
/// # Arguments
///
/// * `total_hours` - Total attendance hours in the period
/// * `standard_hours` - The contract's threshold before overtime
/// * `monthly_salary` - The contract's monthly base salary
///
/// # Examples
///
/// ## At the threshold (no overtime)
///
/// ```
/// use payroll_engine::calculation::calculate_overtime;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = calculate_overtime(
///     Decimal::from_str("160").unwrap(),
///     Decimal::from_str("160").unwrap(),
///     Decimal::from_str("5000").unwrap(),
/// );
/// assert_eq!(result.overtime_hours, Decimal::ZERO);
/// assert_eq!(result.overtime_pay, Decimal::ZERO);
/// ```
///
/// ## Beyond the threshold
///
/// ```
/// use payroll_engine::calculation::calculate_overtime;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = calculate_overtime(
///     Decimal::from_str("170").unwrap(),
///     Decimal::from_str("160").unwrap(),
///     Decimal::from_str("5000").unwrap(),
/// );
/// assert_eq!(result.overtime_hours, Decimal::from_str("10").unwrap());
/// assert_eq!(result.overtime_pay, Decimal::from_str("468.75").unwrap());
/// ```
pub fn calculate_overtime(
    total_hours: Decimal,
    standard_hours: Decimal,
    monthly_salary: Decimal,
) -> OvertimeResult {
    let hourly_rate = if standard_hours.is_zero() {
        Decimal::ZERO
    } else {
        monthly_salary / standard_hours
    };

    let overtime_hours = if total_hours > standard_hours {
        total_hours - standard_hours
    } else {
        Decimal::ZERO
    };

    let overtime_pay = (overtime_hours * hourly_rate * OVERTIME_MULTIPLIER).round_dp(2);

    OvertimeResult {
        hourly_rate,
        overtime_hours,
        overtime_pay,
    }
}
