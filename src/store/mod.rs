//! Persistence and guard rules for payroll records.
//!
//! The store owns the one-row-per-`(employee, period)` table, the
//! append-only payment ledger, and the Draft/Partial/Paid state machine
//! wrapped around the pure calculator's output.

mod payroll_store;
mod settings;

pub use payroll_store::{MarkPaidOutcome, PayrollStore, UpsertOutcome};
pub use settings::SettingsStore;
