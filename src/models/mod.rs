//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod contract;
mod leave;
mod payroll;
mod period;

pub use attendance::AttendanceRecord;
pub use contract::{Contract, ContractType};
pub use leave::{LeaveRequest, LeaveStatus};
pub use payroll::{PayBreakdown, Payroll, PayrollPayment, PayrollStatus, PayrollView};
pub use period::Period;
