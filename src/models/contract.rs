//! Contract model and related types.
//!
//! This module defines the Contract struct and ContractType enum
//! for representing the compensation arrangement of an employee.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents the type of compensation arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Fixed monthly salary with overtime beyond the standard hours.
    FullTime,
    /// Hourly pay, no overtime multiplier.
    PartTime,
    /// Hourly pay for external contractors, no overtime multiplier.
    Contractor,
    /// Fixed monthly salary plus commission on sales volume.
    Hybrid,
}

/// Represents an employee's active compensation contract.
///
/// One contract exists per employee at a time; HR replaces it rather than
/// versioning it. The engine treats contracts as read-only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// The employee this contract belongs to.
    pub employee_id: String,
    /// The type of compensation arrangement.
    pub contract_type: ContractType,
    /// Monthly salary for FullTime/Hybrid, hourly rate for PartTime/Contractor.
    pub base_salary: Decimal,
    /// Hours per period before overtime applies (FullTime only).
    #[serde(default)]
    pub standard_hours: Decimal,
    /// Commission rate applied to sales volume (Hybrid only).
    #[serde(default)]
    pub commission_rate: Decimal,
}

impl Contract {
    /// Returns true if `base_salary` is an hourly rate rather than a
    /// monthly amount.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Contract, ContractType};
    /// use rust_decimal::Decimal;
    ///
    /// let contract = Contract {
    ///     employee_id: "emp_001".to_string(),
    ///     contract_type: ContractType::Contractor,
    ///     base_salary: Decimal::new(45, 0),
    ///     standard_hours: Decimal::ZERO,
    ///     commission_rate: Decimal::ZERO,
    /// };
    /// assert!(contract.is_hourly());
    /// ```
    pub fn is_hourly(&self) -> bool {
        matches!(
            self.contract_type,
            ContractType::PartTime | ContractType::Contractor
        )
    }

    /// Returns true if the contract earns commission on sales volume.
    pub fn has_commission(&self) -> bool {
        self.contract_type == ContractType::Hybrid
    }

    /// Returns true if the contract carries a fixed monthly salary and is
    /// therefore subject to leave deductions.
    pub fn is_salaried(&self) -> bool {
        matches!(
            self.contract_type,
            ContractType::FullTime | ContractType::Hybrid
        )
    }
}
