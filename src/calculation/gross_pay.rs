//! Gross pay composition.
//!
//! Dispatches on the contract type and composes the rule modules into a
//! [`PayBreakdown`]. Pure: identical inputs reproduce an identical
//! breakdown bit for bit, so a recompute can safely overwrite a draft.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{AttendanceRecord, Contract, ContractType, LeaveRequest, PayBreakdown};

use super::commission::calculate_commission;
use super::hours::total_attendance_hours;
use super::leave_deduction::calculate_leave_deduction;
use super::overtime::calculate_overtime;

/// The overtime pay multiplier for full-time hours beyond the threshold.
pub const OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Calculates the gross-pay breakdown for one employee and period.
///
/// Contract-type policy:
///
/// - **FullTime**: `base_pay` is the monthly salary; hours beyond
///   `standard_hours` pay at 1.5x the derived hourly rate; approved leave
///   deducts at the `monthly / 30` daily rate.
/// - **PartTime / Contractor**: `base_pay` is hours worked times the
///   hourly `base_salary`; no overtime multiplier and no leave deduction
///   (absence already yields zero hours).
/// - **Hybrid**: `base_pay` is the monthly salary; commission is sales
///   volume times the commission rate; leave deducts as for full-time.
///
/// `total_pay = base_pay + overtime_pay + commission_pay + bonus_pay -
/// deductions`. Every monetary output is rounded to 2 decimal places with
/// banker's rounding (`Decimal::round_dp`), chosen so repeated
/// recomputation over identical inputs is reproducible.
///
/// The caller resolves the contract; a missing contract is the caller's
/// `ContractNotFound` condition, not a calculator concern.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_gross_pay;
/// use payroll_engine::models::{Contract, ContractType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let contract = Contract {
///     employee_id: "emp_001".to_string(),
///     contract_type: ContractType::Hybrid,
///     base_salary: Decimal::from_str("2000").unwrap(),
///     standard_hours: Decimal::ZERO,
///     commission_rate: Decimal::from_str("0.10").unwrap(),
/// };
///
/// let breakdown = calculate_gross_pay(
///     &contract,
///     &[],
///     &[],
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
///     Decimal::from_str("10000").unwrap(),
///     Decimal::ZERO,
/// );
///
/// assert_eq!(breakdown.commission_pay, Decimal::from_str("1000.00").unwrap());
/// assert_eq!(breakdown.total_pay, Decimal::from_str("3000.00").unwrap());
/// ```
#[allow(clippy::too_many_arguments)]
pub fn calculate_gross_pay(
    contract: &Contract,
    attendance: &[AttendanceRecord],
    approved_leave: &[LeaveRequest],
    period_start: NaiveDate,
    period_end: NaiveDate,
    sales_volume: Decimal,
    bonus_pay: Decimal,
) -> PayBreakdown {
    let total_hours = total_attendance_hours(attendance);

    let mut breakdown = PayBreakdown::zero();
    breakdown.bonus_pay = bonus_pay.round_dp(2);

    match contract.contract_type {
        ContractType::FullTime => {
            breakdown.base_pay = contract.base_salary.round_dp(2);
            let overtime =
                calculate_overtime(total_hours, contract.standard_hours, contract.base_salary);
            breakdown.overtime_hours = overtime.overtime_hours;
            breakdown.overtime_pay = overtime.overtime_pay;
        }
        ContractType::PartTime | ContractType::Contractor => {
            breakdown.base_pay = (total_hours * contract.base_salary).round_dp(2);
        }
        ContractType::Hybrid => {
            breakdown.base_pay = contract.base_salary.round_dp(2);
            breakdown.commission_pay =
                calculate_commission(sales_volume, contract.commission_rate);
        }
    }

    if contract.is_salaried() {
        let leave = calculate_leave_deduction(
            approved_leave,
            period_start,
            period_end,
            contract.base_salary,
        );
        breakdown.deductions = leave.deduction;
    }

    breakdown.total_pay = (breakdown.base_pay + breakdown.overtime_pay + breakdown.commission_pay
        + breakdown.bonus_pay
        - breakdown.deductions)
        .round_dp(2);

    breakdown
}
