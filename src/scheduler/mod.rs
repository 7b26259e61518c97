//! The automation scheduler.
//!
//! A long-lived background task that wakes at the configured local
//! wall-clock time every day and runs one recompute cycle through
//! [`PayrollEngine::run_scheduled`]. Cluster-wide exclusivity comes from
//! the engine's lock acquisition; any number of sibling processes can run
//! this loop and exactly one performs writes per day.

mod status;

pub use status::{EngineStatus, StatusStore};

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveTime;
use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::AutomationConfig;
use crate::engine::PayrollEngine;

/// The daily payroll automation loop.
pub struct AutomationScheduler {
    engine: Arc<PayrollEngine>,
    automation: AutomationConfig,
    shutdown: CancellationToken,
}

impl AutomationScheduler {
    /// Creates a scheduler for the engine.
    ///
    /// Cancelling `shutdown` stops the loop at the next sleep boundary; an
    /// in-flight cycle finishes (and releases its lock) first.
    pub fn new(
        engine: Arc<PayrollEngine>,
        automation: AutomationConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            engine,
            automation,
            shutdown,
        }
    }

    /// Starts the loop on the runtime and returns its handle.
    ///
    /// Called once at process start when automation is enabled by
    /// configuration.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// The scheduler loop: sleep until the next local target time, run one
    /// cycle, repeat.
    pub async fn run(self) {
        tracing::info!(
            hour = self.automation.hour,
            minute = self.automation.minute,
            timezone = %self.automation.timezone,
            "Payroll scheduler started"
        );

        loop {
            let sleep_duration = duration_until_next_run(
                self.automation.hour,
                self.automation.minute,
                self.automation.timezone,
            );
            tracing::info!(
                "Next payroll cycle in {} minutes",
                sleep_duration.as_secs() / 60
            );

            tokio::select! {
                _ = tokio::time::sleep(sleep_duration) => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Payroll scheduler received shutdown signal");
                    return;
                }
            }

            let summary = self.engine.run_scheduled().await;
            if summary.reason == "busy" {
                tracing::info!("Payroll cycle skipped: another instance ran it");
            } else {
                tracing::info!(
                    created = summary.created,
                    updated = summary.updated,
                    skipped_paid = summary.skipped_paid,
                    error_count = summary.errors.len(),
                    "Payroll cycle finished"
                );
            }
        }
    }
}

/// Computes the time until the next occurrence of `hour:minute` local
/// wall-clock time in `tz`; if today's occurrence has passed, targets
/// tomorrow.
///
/// A DST gap that swallows the target time falls back to one minute past
/// it, then to an hour from now. The result is floored at 60 seconds so a
/// cycle can never spin.
pub fn duration_until_next_run(hour: u32, minute: u32, tz: Tz) -> Duration {
    let target_time = NaiveTime::from_hms_opt(hour, minute, 0)
        .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).expect("midnight is a valid time"));

    let now = chrono::Utc::now().with_timezone(&tz);
    let today = now.date_naive();

    let target_date = if now.time() >= target_time {
        today + chrono::Duration::days(1)
    } else {
        today
    };

    let target_datetime = target_date
        .and_time(target_time)
        .and_local_timezone(tz)
        .single()
        .unwrap_or_else(|| {
            // DST edge case: fall back to one minute past the target
            (target_date.and_time(target_time) + chrono::Duration::minutes(1))
                .and_local_timezone(tz)
                .latest()
                .unwrap_or_else(|| {
                    tracing::error!("Cannot resolve local run time, using fallback");
                    now + chrono::Duration::hours(1)
                })
        });

    let duration = target_datetime.signed_duration_since(now);
    if duration.num_seconds() <= 0 {
        Duration::from_secs(60)
    } else {
        duration.to_std().unwrap_or(Duration::from_secs(60))
    }
}
