//! Write sinks consumed by the engine.
//!
//! Settlement posts to the general ledger through [`TransactionSink`];
//! every state transition and every scheduler cycle appends to the
//! [`AuditSink`].

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PayrollResult;

/// The direction of a journal transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDirection {
    /// Money leaving the organization (salary settlement).
    Expense,
    /// Money returning to the organization (settlement reversal).
    Income,
}

/// The general ledger / transaction journal.
#[async_trait]
pub trait TransactionSink: Send + Sync {
    /// Posts one journal transaction and returns its identifier.
    async fn post(
        &self,
        amount: Decimal,
        direction: TransactionDirection,
        category: &str,
        description: &str,
        employee_id: &str,
    ) -> PayrollResult<String>;
}

/// The append-only audit log.
///
/// Auditing is fire-and-forget from the engine's perspective:
/// implementations handle and log their own failures rather than failing
/// the payroll operation that produced the entry.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Appends one audit entry.
    async fn record(&self, actor: &str, action: &str, target_id: &str, details: serde_json::Value);
}
