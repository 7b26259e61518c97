//! The recompute core and manual-run facade.
//!
//! [`PayrollEngine`] wires the pure calculator, the record store, and the
//! external collaborators together. The automation scheduler drives
//! [`PayrollEngine::run_scheduled`]; operators reach the same recompute
//! logic through [`PayrollEngine::run_now`] without the cluster lock.

use std::sync::Arc;
use std::time::Instant;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_gross_pay;
use crate::config::{AutomationConfig, EngineConfig};
use crate::error::{PayrollError, PayrollResult};
use crate::external::{
    AttendanceLookup, AuditSink, ClusterLock, ContractLookup, LeaveLookup, SalesLookup,
    TransactionSink,
};
use crate::models::{Payroll, PayrollStatus, PayrollView, Period};
use crate::period::PeriodResolver;
use crate::scheduler::{EngineStatus, StatusStore};
use crate::store::{MarkPaidOutcome, PayrollStore, SettingsStore, UpsertOutcome};

mod summary;

pub use summary::{RunError, RunOptions, RunSummary};

/// The name of the cluster lock guarding the scheduled run.
pub const AUTO_RUN_LOCK: &str = "payroll_auto_run";

/// The external services the engine consumes.
pub struct Collaborators {
    /// Employee contract lookup.
    pub contracts: Arc<dyn ContractLookup>,
    /// Attendance lookup.
    pub attendance: Arc<dyn AttendanceLookup>,
    /// Approved-leave lookup.
    pub leave: Arc<dyn LeaveLookup>,
    /// Sales volume lookup for commission pay.
    pub sales: Arc<dyn SalesLookup>,
    /// The general ledger.
    pub transactions: Arc<dyn TransactionSink>,
    /// The audit log.
    pub audit: Arc<dyn AuditSink>,
    /// The cluster-wide lock for the scheduled run.
    pub lock: Arc<dyn ClusterLock>,
}

/// The payroll engine facade.
///
/// Exposes the operations the API layer wraps: manual runs, settlement
/// operations, status, and the cutoff-day setting. One instance per
/// process, shared between the scheduler task and request handlers.
pub struct PayrollEngine {
    contracts: Arc<dyn ContractLookup>,
    attendance: Arc<dyn AttendanceLookup>,
    leave: Arc<dyn LeaveLookup>,
    sales: Arc<dyn SalesLookup>,
    audit: Arc<dyn AuditSink>,
    lock: Arc<dyn ClusterLock>,
    store: PayrollStore,
    settings: SettingsStore,
    status: StatusStore,
    automation: AutomationConfig,
}

impl PayrollEngine {
    /// Creates an engine from configuration and collaborators.
    ///
    /// Rejects a configured cutoff day outside 1-31.
    pub fn new(config: &EngineConfig, collaborators: Collaborators) -> PayrollResult<Self> {
        let settings = SettingsStore::new(config.settings.salary_cutoff_day)?;
        let store = PayrollStore::new(
            Arc::clone(&collaborators.transactions),
            Arc::clone(&collaborators.audit),
        );
        Ok(Self {
            contracts: collaborators.contracts,
            attendance: collaborators.attendance,
            leave: collaborators.leave,
            sales: collaborators.sales,
            audit: collaborators.audit,
            lock: collaborators.lock,
            store,
            settings,
            status: StatusStore::new(),
            automation: config.automation.clone(),
        })
    }

    /// Runs the recompute on demand, without the cluster lock.
    ///
    /// Partial failure is data: per-pair errors land in the returned
    /// summary's `errors` list and the run keeps going. Only a malformed
    /// explicit target (month outside 1-12) is rejected up front.
    pub async fn run_now(&self, options: RunOptions) -> PayrollResult<RunSummary> {
        let resolver = self.settings.resolver().await;
        let periods = match options.month {
            Some(month) => {
                if !(1..=12).contains(&month) {
                    return Err(PayrollError::InvalidMonth { month });
                }
                let year = options.year.unwrap_or_else(|| self.local_today().year());
                vec![Period::new(month, year)]
            }
            None => self.default_periods(&resolver),
        };

        Ok(self
            .execute(
                &periods,
                options.employee_id,
                options.dry_run,
                "manual",
                "operator",
            )
            .await)
    }

    /// Runs one scheduled cycle under the cluster lock.
    ///
    /// When another instance holds the lock the cycle is skipped entirely
    /// and reported as `busy`; the lock is released on every exit path.
    pub async fn run_scheduled(&self) -> RunSummary {
        let lease = match self.lock.try_acquire(AUTO_RUN_LOCK).await {
            Ok(Some(lease)) => lease,
            Ok(None) => {
                info!(lock = AUTO_RUN_LOCK, "Scheduled cycle skipped: lock busy");
                let summary = RunSummary::busy();
                self.status.record_run(&summary).await;
                return summary;
            }
            Err(e) => {
                warn!(lock = AUTO_RUN_LOCK, error = %e, "Cluster lock acquisition failed");
                let mut summary = RunSummary::busy();
                summary.errors.push(RunError {
                    employee_id: "*".to_string(),
                    period: None,
                    message: e.to_string(),
                });
                self.status.record_run(&summary).await;
                return summary;
            }
        };

        let resolver = self.settings.resolver().await;
        let periods = self.default_periods(&resolver);
        let summary = self
            .execute(&periods, None, false, "scheduled", "scheduler")
            .await;

        lease.release().await;
        summary
    }

    /// Returns the distinct periods touched by any day in `start..=end`,
    /// for targeting recomputes after late attendance or leave
    /// corrections.
    pub async fn periods_touching(&self, start: NaiveDate, end: NaiveDate) -> Vec<Period> {
        self.settings.resolver().await.periods_in_range(start, end)
    }

    /// Records a payment against a payroll record.
    pub async fn record_payment(
        &self,
        payroll_id: Uuid,
        amount: Decimal,
        method: &str,
        reference: &str,
        actor: &str,
    ) -> PayrollResult<PayrollView> {
        self.store
            .record_payment(payroll_id, amount, method, reference, actor)
            .await
    }

    /// Moves a payroll record to the requested status.
    ///
    /// `Paid` settles the record (idempotent when already paid); `Draft`
    /// reopens a paid record. `Partial` is never a valid target: it is
    /// only entered by recording payments.
    pub async fn set_status(
        &self,
        payroll_id: Uuid,
        target: PayrollStatus,
        actor: &str,
    ) -> PayrollResult<PayrollView> {
        match target {
            PayrollStatus::Paid => match self.store.mark_paid(payroll_id, actor).await? {
                MarkPaidOutcome::Settled(view) | MarkPaidOutcome::Unchanged(view) => Ok(view),
            },
            PayrollStatus::Draft => self.store.reopen(payroll_id, actor).await,
            PayrollStatus::Partial => {
                let from = self
                    .store
                    .get(payroll_id)
                    .await
                    .ok_or(PayrollError::PayrollNotFound { payroll_id })?
                    .status;
                Err(PayrollError::InvalidStatusChange {
                    from,
                    to: PayrollStatus::Partial,
                })
            }
        }
    }

    /// Returns a payroll record with its ledger and outstanding balance.
    pub async fn payroll_view(&self, payroll_id: Uuid) -> PayrollResult<PayrollView> {
        self.store.view(payroll_id).await
    }

    /// Returns the record for `(employee, period)`, if any.
    pub async fn find_payroll(&self, employee_id: &str, period: Period) -> Option<Payroll> {
        self.store.find(employee_id, period).await
    }

    /// Returns the engine's schedule settings and run history.
    pub async fn status(&self) -> EngineStatus {
        self.status
            .snapshot(
                self.automation.enabled,
                self.automation.hour,
                self.automation.minute,
                &self.automation.timezone.to_string(),
            )
            .await
    }

    /// Returns the current salary cutoff day.
    pub async fn cutoff_day(&self) -> u32 {
        self.settings.cutoff_day().await
    }

    /// Sets the salary cutoff day (validated 1-31) and audits the change.
    pub async fn set_cutoff_day(&self, day: u32, actor: &str) -> PayrollResult<()> {
        self.settings.set_cutoff_day(day).await?;
        self.audit
            .record(
                actor,
                "payroll.cutoff_day_changed",
                "payroll_settings",
                serde_json::json!({ "salary_cutoff_day": day }),
            )
            .await;
        Ok(())
    }

    /// Today's date in the configured local timezone.
    fn local_today(&self) -> NaiveDate {
        Utc::now()
            .with_timezone(&self.automation.timezone)
            .date_naive()
    }

    /// The previous and current periods, resolved from local "today".
    fn default_periods(&self, resolver: &PeriodResolver) -> Vec<Period> {
        let current = resolver.resolve(self.local_today());
        vec![current.prev(), current]
    }

    /// The shared batch body: every (employee, period) pair is attempted,
    /// failures are collected, and processing order never affects any
    /// other pair's outcome.
    async fn execute(
        &self,
        periods: &[Period],
        employee_filter: Option<String>,
        dry_run: bool,
        reason: &str,
        actor: &str,
    ) -> RunSummary {
        let started = Instant::now();
        let run_id = Uuid::new_v4();
        let resolver = self.settings.resolver().await;

        let mut errors: Vec<RunError> = Vec::new();
        let employees = match employee_filter {
            Some(id) => vec![id],
            None => match self.contracts.list_contracted_employee_ids().await {
                Ok(ids) => ids,
                Err(e) => {
                    warn!(error = %e, "Failed to enumerate contracted employees");
                    errors.push(RunError {
                        employee_id: "*".to_string(),
                        period: None,
                        message: e.to_string(),
                    });
                    Vec::new()
                }
            },
        };

        let mut created = 0usize;
        let mut updated = 0usize;
        let mut skipped_paid = 0usize;

        for employee_id in &employees {
            for period in periods {
                if dry_run {
                    match self.store.find(employee_id, *period).await {
                        None => created += 1,
                        Some(p) if p.status == PayrollStatus::Paid => skipped_paid += 1,
                        Some(_) => updated += 1,
                    }
                    continue;
                }

                match self
                    .recompute_pair(employee_id, *period, &resolver, actor)
                    .await
                {
                    Ok(Some(UpsertOutcome::Created(_))) => created += 1,
                    Ok(Some(UpsertOutcome::Updated(_))) => updated += 1,
                    Ok(None) => skipped_paid += 1,
                    Err(e) => {
                        warn!(
                            employee_id = %employee_id,
                            period = %period,
                            error = %e,
                            "Recompute failed for employee/period"
                        );
                        errors.push(RunError {
                            employee_id: employee_id.clone(),
                            period: Some(*period),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        let summary = RunSummary {
            users_scanned: employees.len(),
            periods_scanned: periods.len(),
            created,
            updated,
            skipped_paid,
            errors,
            duration_ms: started.elapsed().as_millis() as u64,
            dry_run,
            reason: reason.to_string(),
        };

        info!(
            run_id = %run_id,
            reason = reason,
            dry_run = dry_run,
            users_scanned = summary.users_scanned,
            created = summary.created,
            updated = summary.updated,
            skipped_paid = summary.skipped_paid,
            error_count = summary.errors.len(),
            duration_ms = summary.duration_ms,
            "Payroll run completed"
        );

        self.audit
            .record(
                actor,
                "payroll.run_completed",
                &run_id.to_string(),
                serde_json::to_value(&summary).unwrap_or_default(),
            )
            .await;
        self.status.record_run(&summary).await;

        summary
    }

    /// Recomputes one (employee, period) pair.
    ///
    /// Returns `Ok(None)` when the period is already settled: a skip, not
    /// an error. The existing record's bonus survives the recompute; a
    /// fresh record starts with none.
    async fn recompute_pair(
        &self,
        employee_id: &str,
        period: Period,
        resolver: &PeriodResolver,
        actor: &str,
    ) -> PayrollResult<Option<UpsertOutcome>> {
        let contract = self
            .contracts
            .get(employee_id)
            .await?
            .ok_or_else(|| PayrollError::ContractNotFound {
                employee_id: employee_id.to_string(),
            })?;

        let bonus_pay = match self.store.find(employee_id, period).await {
            Some(existing) if existing.status == PayrollStatus::Paid => return Ok(None),
            Some(existing) => existing.bonus_pay,
            None => Decimal::ZERO,
        };

        let (start, end) = resolver.span(period);
        let attendance = self.attendance.for_period(employee_id, start, end).await?;
        let leave = self
            .leave
            .approved_overlapping(employee_id, start, end)
            .await?;
        let sales_volume = if contract.has_commission() {
            self.sales.volume_for_period(employee_id, start, end).await?
        } else {
            Decimal::ZERO
        };

        let breakdown = calculate_gross_pay(
            &contract,
            &attendance,
            &leave,
            start,
            end,
            sales_volume,
            bonus_pay,
        );

        match self.store.upsert(employee_id, period, &breakdown, actor).await {
            Ok(outcome) => Ok(Some(outcome)),
            // Settled by a racing operator between the find and the upsert
            Err(PayrollError::PayrollLocked { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
