//! Process-wide run status.
//!
//! An explicit, injected singleton: created at process start with no
//! history, updated at the end of every cycle or manual run, and read by
//! the status operation. Replaces the ad hoc global state a status
//! endpoint would otherwise reach into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::engine::RunSummary;

#[derive(Debug, Default)]
struct StatusInner {
    last_run_at: Option<DateTime<Utc>>,
    last_success_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
    last_summary: Option<RunSummary>,
}

/// The mutable run-status singleton.
#[derive(Debug, Default)]
pub struct StatusStore {
    inner: RwLock<StatusInner>,
}

/// A point-in-time view of the engine's schedule and run history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Whether the background scheduler is enabled by configuration.
    pub enabled: bool,
    /// Local wall-clock hour of the daily run.
    pub schedule_hour_local: u32,
    /// Local wall-clock minute of the daily run.
    pub schedule_minute_local: u32,
    /// The timezone the schedule is interpreted in.
    pub timezone: String,
    /// When the last run or cycle finished, if any.
    pub last_run_at: Option<DateTime<Utc>>,
    /// When the last error-free run finished, if any.
    pub last_success_at: Option<DateTime<Utc>>,
    /// The first collected error of the most recent failing run; cleared
    /// by the next error-free run.
    pub last_error: Option<String>,
    /// The most recent run summary.
    pub last_summary: Option<RunSummary>,
}

impl StatusStore {
    /// Creates an empty status store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finished run or cycle.
    ///
    /// A busy-skip updates `last_run_at` and `last_summary` but neither
    /// the success timestamp nor the error, since no work was attempted.
    pub async fn record_run(&self, summary: &RunSummary) {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        inner.last_run_at = Some(now);
        if summary.reason != "busy" {
            if summary.errors.is_empty() {
                inner.last_success_at = Some(now);
                inner.last_error = None;
            } else {
                inner.last_error = Some(format!(
                    "{} ({} error(s) in run)",
                    summary.errors[0].message,
                    summary.errors.len()
                ));
            }
        }
        inner.last_summary = Some(summary.clone());
    }

    /// Returns the run-history half of an [`EngineStatus`]; the engine
    /// fills in the schedule half from its configuration.
    pub async fn snapshot(
        &self,
        enabled: bool,
        schedule_hour_local: u32,
        schedule_minute_local: u32,
        timezone: &str,
    ) -> EngineStatus {
        let inner = self.inner.read().await;
        EngineStatus {
            enabled,
            schedule_hour_local,
            schedule_minute_local,
            timezone: timezone.to_string(),
            last_run_at: inner.last_run_at,
            last_success_at: inner.last_success_at,
            last_error: inner.last_error.clone(),
            last_summary: inner.last_summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RunError;
    use crate::models::Period;

    fn clean_summary() -> RunSummary {
        RunSummary {
            users_scanned: 1,
            periods_scanned: 2,
            created: 2,
            updated: 0,
            skipped_paid: 0,
            errors: Vec::new(),
            duration_ms: 5,
            dry_run: false,
            reason: "manual".to_string(),
        }
    }

    fn failing_summary() -> RunSummary {
        RunSummary {
            errors: vec![RunError {
                employee_id: "emp_002".to_string(),
                period: Some(Period::new(3, 2026)),
                message: "No active contract for employee: emp_002".to_string(),
            }],
            ..clean_summary()
        }
    }

    #[tokio::test]
    async fn test_fresh_store_is_empty() {
        let store = StatusStore::new();
        let status = store.snapshot(true, 2, 30, "Australia/Sydney").await;
        assert!(status.last_run_at.is_none());
        assert!(status.last_success_at.is_none());
        assert!(status.last_error.is_none());
        assert!(status.last_summary.is_none());
    }

    #[tokio::test]
    async fn test_clean_run_sets_success_and_clears_error() {
        let store = StatusStore::new();
        store.record_run(&failing_summary()).await;
        store.record_run(&clean_summary()).await;

        let status = store.snapshot(true, 2, 30, "Australia/Sydney").await;
        assert!(status.last_success_at.is_some());
        assert!(status.last_error.is_none());
    }

    #[tokio::test]
    async fn test_failing_run_sets_error_and_keeps_success() {
        let store = StatusStore::new();
        store.record_run(&clean_summary()).await;
        let success_at = store
            .snapshot(true, 2, 30, "Australia/Sydney")
            .await
            .last_success_at;

        store.record_run(&failing_summary()).await;
        let status = store.snapshot(true, 2, 30, "Australia/Sydney").await;

        assert_eq!(status.last_success_at, success_at);
        let error = status.last_error.unwrap();
        assert!(error.contains("emp_002"));
        assert!(error.contains("1 error(s)"));
    }

    #[tokio::test]
    async fn test_busy_skip_updates_run_time_only() {
        let store = StatusStore::new();
        store.record_run(&failing_summary()).await;
        store.record_run(&RunSummary::busy()).await;

        let status = store.snapshot(true, 2, 30, "Australia/Sydney").await;
        assert!(status.last_run_at.is_some());
        // The busy skip neither clears the previous error nor claims success
        assert!(status.last_error.is_some());
        assert!(status.last_success_at.is_none());
        assert_eq!(status.last_summary.unwrap().reason, "busy");
    }

    #[tokio::test]
    async fn test_snapshot_carries_schedule_fields() {
        let store = StatusStore::new();
        let status = store.snapshot(false, 4, 15, "Europe/Madrid").await;
        assert!(!status.enabled);
        assert_eq!(status.schedule_hour_local, 4);
        assert_eq!(status.schedule_minute_local, 15);
        assert_eq!(status.timezone, "Europe/Madrid");
    }
}
