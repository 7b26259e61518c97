//! Payroll record, payment ledger, and pay breakdown models.
//!
//! A [`Payroll`] is the one row per `(employee, month, year)` holding the
//! computed pay figures and the settlement state machine. Payments against
//! it accumulate in an append-only ledger of [`PayrollPayment`] rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Period;

/// The settlement state of a payroll record.
///
/// Legal transitions are Draft -> Partial -> Paid, plus Paid -> Draft on
/// reopen. Anything else is rejected by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Computed but with no payments recorded.
    Draft,
    /// At least one payment recorded, not yet formally marked paid.
    Partial,
    /// Fully settled; monetary fields are frozen until reopened.
    Paid,
}

/// The gross-pay breakdown produced by the pure calculator.
///
/// All amounts are rounded to 2 decimal places; identical inputs reproduce
/// an identical breakdown bit for bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayBreakdown {
    /// Fixed salary, or hours x hourly rate for hourly contracts.
    pub base_pay: Decimal,
    /// Hours worked beyond the contract's standard hours.
    pub overtime_hours: Decimal,
    /// Pay for overtime hours at the 1.5x rate.
    pub overtime_pay: Decimal,
    /// Commission earned on sales volume (hybrid contracts).
    pub commission_pay: Decimal,
    /// Discretionary bonus carried on the record.
    pub bonus_pay: Decimal,
    /// Deductions for approved leave days.
    pub deductions: Decimal,
    /// The gross total: base + overtime + commission + bonus - deductions.
    pub total_pay: Decimal,
}

impl PayBreakdown {
    /// Returns a breakdown with every field zero.
    pub fn zero() -> Self {
        Self {
            base_pay: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            overtime_pay: Decimal::ZERO,
            commission_pay: Decimal::ZERO,
            bonus_pay: Decimal::ZERO,
            deductions: Decimal::ZERO,
            total_pay: Decimal::ZERO,
        }
    }
}

/// One payroll record: the computed figures for an employee's period plus
/// its settlement state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payroll {
    /// Unique identifier of the record.
    pub id: Uuid,
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The pay period the record covers.
    pub period: Period,
    /// Fixed salary or hourly base pay.
    pub base_pay: Decimal,
    /// Hours worked beyond the standard hours.
    pub overtime_hours: Decimal,
    /// Pay for overtime hours.
    pub overtime_pay: Decimal,
    /// Commission on sales volume.
    pub commission_pay: Decimal,
    /// Discretionary bonus.
    pub bonus_pay: Decimal,
    /// Leave deductions.
    pub deductions: Decimal,
    /// The gross total owed for the period.
    pub total_pay: Decimal,
    /// The settlement state.
    pub status: PayrollStatus,
    /// Journal transaction id recorded when the record was marked paid.
    pub paid_transaction_id: Option<String>,
    /// When the record was marked paid.
    pub paid_at: Option<DateTime<Utc>>,
    /// Who marked the record paid.
    pub paid_by: Option<String>,
}

impl Payroll {
    /// Creates a fresh Draft record from a calculated breakdown.
    pub fn from_breakdown(employee_id: &str, period: Period, breakdown: &PayBreakdown) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            period,
            base_pay: breakdown.base_pay,
            overtime_hours: breakdown.overtime_hours,
            overtime_pay: breakdown.overtime_pay,
            commission_pay: breakdown.commission_pay,
            bonus_pay: breakdown.bonus_pay,
            deductions: breakdown.deductions,
            total_pay: breakdown.total_pay,
            status: PayrollStatus::Draft,
            paid_transaction_id: None,
            paid_at: None,
            paid_by: None,
        }
    }

    /// Overwrites the monetary fields from a recomputed breakdown,
    /// leaving identity, status, and settlement fields untouched.
    pub fn apply_breakdown(&mut self, breakdown: &PayBreakdown) {
        self.base_pay = breakdown.base_pay;
        self.overtime_hours = breakdown.overtime_hours;
        self.overtime_pay = breakdown.overtime_pay;
        self.commission_pay = breakdown.commission_pay;
        self.bonus_pay = breakdown.bonus_pay;
        self.deductions = breakdown.deductions;
        self.total_pay = breakdown.total_pay;
    }

    /// Returns the monetary fields as a breakdown.
    pub fn breakdown(&self) -> PayBreakdown {
        PayBreakdown {
            base_pay: self.base_pay,
            overtime_hours: self.overtime_hours,
            overtime_pay: self.overtime_pay,
            commission_pay: self.commission_pay,
            bonus_pay: self.bonus_pay,
            deductions: self.deductions,
            total_pay: self.total_pay,
        }
    }

    /// Returns the unpaid remainder given the record's payment ledger.
    ///
    /// The store guarantees the ledger sum never exceeds `total_pay`.
    pub fn pending_amount(&self, payments: &[PayrollPayment]) -> Decimal {
        let paid: Decimal = payments.iter().map(|p| p.amount).sum();
        self.total_pay - paid
    }
}

/// One append-only payment ledger row against a payroll record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollPayment {
    /// Unique identifier of the ledger row.
    pub id: Uuid,
    /// The payroll record the payment applies to.
    pub payroll_id: Uuid,
    /// The amount paid.
    pub amount: Decimal,
    /// The payment method (e.g. "bank_transfer", "cash").
    pub method: String,
    /// Reference linking the payment to the external ledger; unique.
    pub transaction_id: String,
    /// When the payment was recorded.
    pub paid_at: DateTime<Utc>,
    /// Who recorded the payment.
    pub paid_by: String,
}

/// A payroll record together with its ledger and derived balance, as
/// returned to callers of the settlement operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollView {
    /// The payroll record.
    pub payroll: Payroll,
    /// The payment ledger, oldest first.
    pub payments: Vec<PayrollPayment>,
    /// `total_pay` minus the ledger sum.
    pub pending_amount: Decimal,
}
