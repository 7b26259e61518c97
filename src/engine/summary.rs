//! Run options and the cycle summary.

use serde::{Deserialize, Serialize};

use crate::models::Period;

/// Parameters for a manual recompute run.
///
/// All fields are optional: the default runs every contracted employee
/// over the current and previous periods, live.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit period month (1-12); both month and year must be given to
    /// target one period.
    pub month: Option<u32>,
    /// Explicit period year.
    pub year: Option<i32>,
    /// Restrict the run to one employee.
    pub employee_id: Option<String>,
    /// Count what would change without computing or persisting anything.
    pub dry_run: bool,
}

/// One collected per-pair failure from a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    /// The employee whose recompute failed, or `*` when enumeration
    /// itself failed.
    pub employee_id: String,
    /// The period being recomputed; absent when the failure preceded
    /// period processing.
    pub period: Option<Period>,
    /// The failure rendered as a message.
    pub message: String,
}

/// The summary emitted at the end of every run or cycle.
///
/// Partial failure is data: a summary with a non-empty `errors` list is
/// still a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Employees considered by the run.
    pub users_scanned: usize,
    /// Periods considered per employee.
    pub periods_scanned: usize,
    /// Records created as Draft.
    pub created: usize,
    /// Records recomputed in place.
    pub updated: usize,
    /// Paid records skipped untouched.
    pub skipped_paid: usize,
    /// Per-pair failures, in processing order.
    pub errors: Vec<RunError>,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
    /// Whether the run was a dry run.
    pub dry_run: bool,
    /// What triggered the run: "manual", "scheduled", or "busy" when the
    /// cycle was skipped because another instance held the lock.
    pub reason: String,
}

impl RunSummary {
    /// A zero-work summary for a cycle skipped on a busy cluster lock.
    pub fn busy() -> Self {
        Self {
            users_scanned: 0,
            periods_scanned: 0,
            created: 0,
            updated: 0,
            skipped_paid: 0,
            errors: Vec::new(),
            duration_ms: 0,
            dry_run: false,
            reason: "busy".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_summary_is_zero_work() {
        let summary = RunSummary::busy();
        assert_eq!(summary.reason, "busy");
        assert_eq!(summary.created, 0);
        assert_eq!(summary.updated, 0);
        assert!(summary.errors.is_empty());
        assert!(!summary.dry_run);
    }

    #[test]
    fn test_default_options_are_full_live_run() {
        let options = RunOptions::default();
        assert!(options.month.is_none());
        assert!(options.year.is_none());
        assert!(options.employee_id.is_none());
        assert!(!options.dry_run);
    }

    #[test]
    fn test_summary_serde_round_trip() {
        let summary = RunSummary {
            users_scanned: 3,
            periods_scanned: 2,
            created: 4,
            updated: 1,
            skipped_paid: 1,
            errors: vec![RunError {
                employee_id: "emp_002".to_string(),
                period: Some(Period::new(3, 2026)),
                message: "No active contract for employee: emp_002".to_string(),
            }],
            duration_ms: 12,
            dry_run: false,
            reason: "manual".to_string(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, back);
    }
}
