//! The payroll record store and settlement state machine.
//!
//! States move Draft -> Partial -> Paid, with Paid -> Draft on reopen;
//! every other transition is rejected. A Paid record's monetary fields are
//! immutable until explicitly reopened, so a recompute can never silently
//! overwrite a settled period.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::external::{AuditSink, TransactionDirection, TransactionSink};
use crate::models::{PayBreakdown, Payroll, PayrollPayment, PayrollStatus, PayrollView, Period};

/// The outcome of an upsert: whether the period's record was created or
/// its monetary fields overwritten.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    /// A new Draft record was inserted.
    Created(Payroll),
    /// An existing Draft/Partial record was recomputed in place.
    Updated(Payroll),
}

/// The outcome of marking a record paid.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkPaidOutcome {
    /// The record transitioned to Paid and one journal transaction was
    /// posted.
    Settled(PayrollView),
    /// The record was already Paid; nothing changed.
    Unchanged(PayrollView),
}

#[derive(Default)]
struct StoreInner {
    /// Uniqueness invariant: one record per (employee, period).
    rows: HashMap<(String, Period), Payroll>,
    by_id: HashMap<Uuid, (String, Period)>,
    /// Append-only ledger rows, keyed by payroll id, oldest first.
    payments: HashMap<Uuid, Vec<PayrollPayment>>,
}

impl StoreInner {
    fn record(&self, payroll_id: Uuid) -> PayrollResult<&Payroll> {
        self.by_id
            .get(&payroll_id)
            .and_then(|key| self.rows.get(key))
            .ok_or(PayrollError::PayrollNotFound { payroll_id })
    }

    fn record_mut(&mut self, payroll_id: Uuid) -> PayrollResult<&mut Payroll> {
        let key = self
            .by_id
            .get(&payroll_id)
            .cloned()
            .ok_or(PayrollError::PayrollNotFound { payroll_id })?;
        self.rows
            .get_mut(&key)
            .ok_or(PayrollError::PayrollNotFound { payroll_id })
    }

    fn ledger(&self, payroll_id: Uuid) -> &[PayrollPayment] {
        self.payments
            .get(&payroll_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn view(&self, payroll_id: Uuid) -> PayrollResult<PayrollView> {
        let payroll = self.record(payroll_id)?.clone();
        let payments = self.ledger(payroll_id).to_vec();
        let pending_amount = payroll.pending_amount(&payments);
        Ok(PayrollView {
            payroll,
            payments,
            pending_amount,
        })
    }
}

/// The payroll record store.
///
/// One async mutex guards the whole table; every read-modify-write,
/// including the journal post a settlement makes, happens under it. That
/// single lock is the per-row transaction boundary the manual facade and
/// the scheduler both rely on when they race on the same period.
pub struct PayrollStore {
    inner: Mutex<StoreInner>,
    transactions: Arc<dyn TransactionSink>,
    audit: Arc<dyn AuditSink>,
}

impl PayrollStore {
    /// Creates an empty store writing settlements and audit entries to the
    /// given sinks.
    pub fn new(transactions: Arc<dyn TransactionSink>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
            transactions,
            audit,
        }
    }

    /// Inserts or recomputes the record for `(employee, period)`.
    ///
    /// A missing record is inserted as Draft with an empty ledger. A Draft
    /// or Partial record has its monetary fields overwritten in place, the
    /// ledger untouched. A Paid record rejects with
    /// [`PayrollError::PayrollLocked`].
    pub async fn upsert(
        &self,
        employee_id: &str,
        period: Period,
        breakdown: &PayBreakdown,
        actor: &str,
    ) -> PayrollResult<UpsertOutcome> {
        let mut inner = self.inner.lock().await;
        let key = (employee_id.to_string(), period);

        let (action, payroll) = if let Some(existing) = inner.rows.get_mut(&key) {
            if existing.status == PayrollStatus::Paid {
                return Err(PayrollError::PayrollLocked {
                    payroll_id: existing.id,
                });
            }
            existing.apply_breakdown(breakdown);
            ("payroll.recomputed", existing.clone())
        } else {
            let payroll = Payroll::from_breakdown(employee_id, period, breakdown);
            inner.by_id.insert(payroll.id, key.clone());
            inner.rows.insert(key, payroll.clone());
            ("payroll.computed", payroll)
        };
        drop(inner);

        self.audit
            .record(
                actor,
                action,
                &payroll.id.to_string(),
                serde_json::json!({
                    "employee_id": payroll.employee_id,
                    "period": payroll.period.to_string(),
                    "total_pay": payroll.total_pay.to_string(),
                }),
            )
            .await;

        if action == "payroll.computed" {
            Ok(UpsertOutcome::Created(payroll))
        } else {
            Ok(UpsertOutcome::Updated(payroll))
        }
    }

    /// Appends a payment to the record's ledger.
    ///
    /// Rejects non-positive amounts, amounts exceeding the outstanding
    /// balance, reused transaction references, and payments against Paid
    /// records. A successful payment moves a Draft record to Partial;
    /// reaching a zero balance does not mark the record Paid; that is the
    /// explicit [`PayrollStore::mark_paid`] action.
    pub async fn record_payment(
        &self,
        payroll_id: Uuid,
        amount: Decimal,
        method: &str,
        transaction_id: &str,
        actor: &str,
    ) -> PayrollResult<PayrollView> {
        let mut inner = self.inner.lock().await;

        let record = inner.record(payroll_id)?;
        if record.status == PayrollStatus::Paid {
            return Err(PayrollError::PayrollLocked { payroll_id });
        }
        if amount <= Decimal::ZERO {
            return Err(PayrollError::InvalidAmount { amount });
        }
        let duplicate = inner
            .payments
            .values()
            .flatten()
            .any(|p| p.transaction_id == transaction_id);
        if duplicate {
            return Err(PayrollError::DuplicateTransaction {
                transaction_id: transaction_id.to_string(),
            });
        }
        let record = inner.record(payroll_id)?;
        let pending = record.pending_amount(inner.ledger(payroll_id));
        if amount > pending {
            return Err(PayrollError::OverpaymentRejected {
                payroll_id,
                amount,
                pending,
            });
        }

        let payment = PayrollPayment {
            id: Uuid::new_v4(),
            payroll_id,
            amount,
            method: method.to_string(),
            transaction_id: transaction_id.to_string(),
            paid_at: Utc::now(),
            paid_by: actor.to_string(),
        };
        inner.payments.entry(payroll_id).or_default().push(payment);

        let record = inner.record_mut(payroll_id)?;
        if record.status == PayrollStatus::Draft {
            record.status = PayrollStatus::Partial;
        }

        let view = inner.view(payroll_id)?;
        drop(inner);

        self.audit
            .record(
                actor,
                "payroll.payment_recorded",
                &payroll_id.to_string(),
                serde_json::json!({
                    "amount": amount.to_string(),
                    "method": method,
                    "transaction_id": transaction_id,
                    "pending_amount": view.pending_amount.to_string(),
                }),
            )
            .await;

        Ok(view)
    }

    /// Marks a record Paid, posting exactly one salary journal
    /// transaction for `total_pay`.
    ///
    /// Legal when the ledger fully covers the total, or when the ledger is
    /// empty and the caller settles in one step. A partially covered
    /// ledger rejects with [`PayrollError::OutstandingBalance`]. Calling
    /// again on a Paid record returns
    /// [`MarkPaidOutcome::Unchanged`] without posting anything.
    pub async fn mark_paid(&self, payroll_id: Uuid, actor: &str) -> PayrollResult<MarkPaidOutcome> {
        let mut inner = self.inner.lock().await;

        let record = inner.record(payroll_id)?;
        if record.status == PayrollStatus::Paid {
            let view = inner.view(payroll_id)?;
            return Ok(MarkPaidOutcome::Unchanged(view));
        }

        let payments = inner.ledger(payroll_id);
        let pending = record.pending_amount(payments);
        if !payments.is_empty() && !pending.is_zero() {
            return Err(PayrollError::OutstandingBalance {
                payroll_id,
                pending,
            });
        }

        let employee_id = record.employee_id.clone();
        let period = record.period;
        let total_pay = record.total_pay;

        let transaction_id = self
            .transactions
            .post(
                total_pay,
                TransactionDirection::Expense,
                "salary",
                &format!("Salary settlement for {} ({})", employee_id, period),
                &employee_id,
            )
            .await?;

        let record = inner.record_mut(payroll_id)?;
        record.status = PayrollStatus::Paid;
        record.paid_transaction_id = Some(transaction_id.clone());
        record.paid_at = Some(Utc::now());
        record.paid_by = Some(actor.to_string());

        let view = inner.view(payroll_id)?;
        drop(inner);

        self.audit
            .record(
                actor,
                "payroll.paid",
                &payroll_id.to_string(),
                serde_json::json!({
                    "employee_id": view.payroll.employee_id,
                    "period": view.payroll.period.to_string(),
                    "total_pay": view.payroll.total_pay.to_string(),
                    "transaction_id": transaction_id,
                }),
            )
            .await;

        Ok(MarkPaidOutcome::Settled(view))
    }

    /// Reopens a Paid record, posting one reversing journal transaction.
    ///
    /// Clears the settlement fields and the payment ledger: the ledger is
    /// one-shot per settlement cycle, so a reopened period restarts
    /// settlement from zero. Only legal from Paid.
    pub async fn reopen(&self, payroll_id: Uuid, actor: &str) -> PayrollResult<PayrollView> {
        let mut inner = self.inner.lock().await;

        let record = inner.record(payroll_id)?;
        if record.status != PayrollStatus::Paid {
            return Err(PayrollError::InvalidStatusChange {
                from: record.status,
                to: PayrollStatus::Draft,
            });
        }

        let employee_id = record.employee_id.clone();
        let period = record.period;
        let total_pay = record.total_pay;

        let transaction_id = self
            .transactions
            .post(
                total_pay,
                TransactionDirection::Income,
                "salary_reversal",
                &format!("Salary settlement reversal for {} ({})", employee_id, period),
                &employee_id,
            )
            .await?;

        let record = inner.record_mut(payroll_id)?;
        record.status = PayrollStatus::Draft;
        record.paid_transaction_id = None;
        record.paid_at = None;
        record.paid_by = None;
        inner.payments.remove(&payroll_id);

        let view = inner.view(payroll_id)?;
        drop(inner);

        self.audit
            .record(
                actor,
                "payroll.reopened",
                &payroll_id.to_string(),
                serde_json::json!({
                    "employee_id": view.payroll.employee_id,
                    "period": view.payroll.period.to_string(),
                    "reversal_transaction_id": transaction_id,
                }),
            )
            .await;

        Ok(view)
    }

    /// Returns the record with the given id, if any.
    pub async fn get(&self, payroll_id: Uuid) -> Option<Payroll> {
        let inner = self.inner.lock().await;
        inner.record(payroll_id).ok().cloned()
    }

    /// Returns the record for `(employee, period)`, if any.
    pub async fn find(&self, employee_id: &str, period: Period) -> Option<Payroll> {
        let inner = self.inner.lock().await;
        inner
            .rows
            .get(&(employee_id.to_string(), period))
            .cloned()
    }

    /// Returns the record, its ledger, and the derived outstanding
    /// balance.
    pub async fn view(&self, payroll_id: Uuid) -> PayrollResult<PayrollView> {
        let inner = self.inner.lock().await;
        inner.view(payroll_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::str::FromStr;
    use std::sync::Mutex as StdMutex;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// Counts journal posts and hands out sequential transaction ids.
    #[derive(Default)]
    struct RecordingSink {
        posts: StdMutex<Vec<(Decimal, TransactionDirection, String)>>,
    }

    #[async_trait]
    impl TransactionSink for RecordingSink {
        async fn post(
            &self,
            amount: Decimal,
            direction: TransactionDirection,
            category: &str,
            _description: &str,
            _employee_id: &str,
        ) -> PayrollResult<String> {
            let mut posts = self.posts.lock().unwrap();
            posts.push((amount, direction, category.to_string()));
            Ok(format!("txn_{:03}", posts.len()))
        }
    }

    #[derive(Default)]
    struct NullAudit;

    #[async_trait]
    impl AuditSink for NullAudit {
        async fn record(
            &self,
            _actor: &str,
            _action: &str,
            _target_id: &str,
            _details: serde_json::Value,
        ) {
        }
    }

    fn create_store() -> (PayrollStore, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let store = PayrollStore::new(sink.clone(), Arc::new(NullAudit));
        (store, sink)
    }

    fn create_breakdown(total: &str) -> PayBreakdown {
        PayBreakdown {
            base_pay: dec(total),
            total_pay: dec(total),
            ..PayBreakdown::zero()
        }
    }

    async fn create_draft(store: &PayrollStore, total: &str) -> Payroll {
        match store
            .upsert("emp_001", Period::new(3, 2026), &create_breakdown(total), "test")
            .await
            .unwrap()
        {
            UpsertOutcome::Created(payroll) => payroll,
            UpsertOutcome::Updated(_) => panic!("expected a fresh record"),
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_draft_with_empty_ledger() {
        let (store, _) = create_store();
        let payroll = create_draft(&store, "1000").await;

        assert_eq!(payroll.status, PayrollStatus::Draft);
        let view = store.view(payroll.id).await.unwrap();
        assert!(view.payments.is_empty());
        assert_eq!(view.pending_amount, dec("1000"));
    }

    #[tokio::test]
    async fn test_upsert_overwrites_draft_in_place() {
        let (store, _) = create_store();
        let payroll = create_draft(&store, "1000").await;

        let outcome = store
            .upsert(
                "emp_001",
                Period::new(3, 2026),
                &create_breakdown("1200"),
                "test",
            )
            .await
            .unwrap();

        match outcome {
            UpsertOutcome::Updated(updated) => {
                assert_eq!(updated.id, payroll.id);
                assert_eq!(updated.total_pay, dec("1200"));
            }
            UpsertOutcome::Created(_) => panic!("expected an update"),
        }
    }

    #[tokio::test]
    async fn test_upsert_identical_inputs_is_idempotent() {
        let (store, _) = create_store();
        let first = create_draft(&store, "1000").await;

        let outcome = store
            .upsert(
                "emp_001",
                Period::new(3, 2026),
                &create_breakdown("1000"),
                "test",
            )
            .await
            .unwrap();

        match outcome {
            UpsertOutcome::Updated(second) => {
                assert_eq!(second.breakdown(), first.breakdown());
            }
            UpsertOutcome::Created(_) => panic!("expected an update"),
        }
    }

    #[tokio::test]
    async fn test_upsert_rejects_paid_record() {
        let (store, _) = create_store();
        let payroll = create_draft(&store, "1000").await;
        store.mark_paid(payroll.id, "operator").await.unwrap();

        let result = store
            .upsert(
                "emp_001",
                Period::new(3, 2026),
                &create_breakdown("9999"),
                "test",
            )
            .await;

        match result {
            Err(PayrollError::PayrollLocked { payroll_id }) => {
                assert_eq!(payroll_id, payroll.id);
            }
            other => panic!("Expected PayrollLocked, got {:?}", other),
        }

        // All monetary fields untouched
        let unchanged = store.get(payroll.id).await.unwrap();
        assert_eq!(unchanged.total_pay, dec("1000"));
        assert_eq!(unchanged.status, PayrollStatus::Paid);
    }

    #[tokio::test]
    async fn test_record_payment_moves_draft_to_partial() {
        let (store, _) = create_store();
        let payroll = create_draft(&store, "1000").await;

        let view = store
            .record_payment(payroll.id, dec("400"), "bank_transfer", "ref_1", "operator")
            .await
            .unwrap();

        assert_eq!(view.payroll.status, PayrollStatus::Partial);
        assert_eq!(view.pending_amount, dec("600"));
        assert_eq!(view.payments.len(), 1);
    }

    #[tokio::test]
    async fn test_record_payment_rejects_non_positive_amounts() {
        let (store, _) = create_store();
        let payroll = create_draft(&store, "1000").await;

        for amount in ["0", "-50"] {
            match store
                .record_payment(payroll.id, dec(amount), "cash", "ref_x", "operator")
                .await
            {
                Err(PayrollError::InvalidAmount { .. }) => {}
                other => panic!("Expected InvalidAmount, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_record_payment_rejects_overpayment() {
        let (store, _) = create_store();
        let payroll = create_draft(&store, "1000").await;
        store
            .record_payment(payroll.id, dec("400"), "cash", "ref_1", "operator")
            .await
            .unwrap();

        match store
            .record_payment(payroll.id, dec("700"), "cash", "ref_2", "operator")
            .await
        {
            Err(PayrollError::OverpaymentRejected {
                amount, pending, ..
            }) => {
                assert_eq!(amount, dec("700"));
                assert_eq!(pending, dec("600"));
            }
            other => panic!("Expected OverpaymentRejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_record_payment_rejects_duplicate_reference() {
        let (store, _) = create_store();
        let payroll = create_draft(&store, "1000").await;
        store
            .record_payment(payroll.id, dec("400"), "cash", "ref_1", "operator")
            .await
            .unwrap();

        match store
            .record_payment(payroll.id, dec("100"), "cash", "ref_1", "operator")
            .await
        {
            Err(PayrollError::DuplicateTransaction { transaction_id }) => {
                assert_eq!(transaction_id, "ref_1");
            }
            other => panic!("Expected DuplicateTransaction, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_full_cover_stays_partial_until_marked_paid() {
        let (store, _) = create_store();
        let payroll = create_draft(&store, "1000").await;
        store
            .record_payment(payroll.id, dec("400"), "cash", "ref_1", "operator")
            .await
            .unwrap();
        let view = store
            .record_payment(payroll.id, dec("600"), "cash", "ref_2", "operator")
            .await
            .unwrap();

        assert_eq!(view.pending_amount, Decimal::ZERO);
        assert_eq!(view.payroll.status, PayrollStatus::Partial);
    }

    #[tokio::test]
    async fn test_mark_paid_posts_exactly_one_expense_transaction() {
        let (store, sink) = create_store();
        let payroll = create_draft(&store, "1000").await;
        store
            .record_payment(payroll.id, dec("400"), "cash", "ref_1", "operator")
            .await
            .unwrap();
        store
            .record_payment(payroll.id, dec("600"), "cash", "ref_2", "operator")
            .await
            .unwrap();

        let outcome = store.mark_paid(payroll.id, "operator").await.unwrap();
        match outcome {
            MarkPaidOutcome::Settled(view) => {
                assert_eq!(view.payroll.status, PayrollStatus::Paid);
                assert_eq!(view.payroll.paid_by.as_deref(), Some("operator"));
                assert!(view.payroll.paid_transaction_id.is_some());
                assert!(view.payroll.paid_at.is_some());
            }
            MarkPaidOutcome::Unchanged(_) => panic!("expected settlement"),
        }

        let posts = sink.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].0, dec("1000"));
        assert_eq!(posts[0].1, TransactionDirection::Expense);
        assert_eq!(posts[0].2, "salary");
    }

    #[tokio::test]
    async fn test_mark_paid_with_empty_ledger_settles_in_one_step() {
        let (store, sink) = create_store();
        let payroll = create_draft(&store, "1000").await;

        let outcome = store.mark_paid(payroll.id, "operator").await.unwrap();
        assert!(matches!(outcome, MarkPaidOutcome::Settled(_)));
        assert_eq!(sink.posts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mark_paid_rejects_outstanding_balance() {
        let (store, sink) = create_store();
        let payroll = create_draft(&store, "1000").await;
        store
            .record_payment(payroll.id, dec("400"), "cash", "ref_1", "operator")
            .await
            .unwrap();

        match store.mark_paid(payroll.id, "operator").await {
            Err(PayrollError::OutstandingBalance { pending, .. }) => {
                assert_eq!(pending, dec("600"));
            }
            other => panic!("Expected OutstandingBalance, got {:?}", other),
        }
        assert!(sink.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_paid_twice_is_unchanged_and_posts_once() {
        let (store, sink) = create_store();
        let payroll = create_draft(&store, "1000").await;
        store.mark_paid(payroll.id, "operator").await.unwrap();

        let second = store.mark_paid(payroll.id, "operator").await.unwrap();
        assert!(matches!(second, MarkPaidOutcome::Unchanged(_)));
        assert_eq!(sink.posts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reopen_posts_reversal_and_clears_ledger() {
        let (store, sink) = create_store();
        let payroll = create_draft(&store, "1000").await;
        store
            .record_payment(payroll.id, dec("1000"), "cash", "ref_1", "operator")
            .await
            .unwrap();
        store.mark_paid(payroll.id, "operator").await.unwrap();

        let view = store.reopen(payroll.id, "admin").await.unwrap();

        assert_eq!(view.payroll.status, PayrollStatus::Draft);
        assert!(view.payroll.paid_transaction_id.is_none());
        assert!(view.payroll.paid_at.is_none());
        assert!(view.payroll.paid_by.is_none());
        assert!(view.payments.is_empty());
        assert_eq!(view.pending_amount, dec("1000"));

        let posts = sink.posts.lock().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].1, TransactionDirection::Income);
        assert_eq!(posts[1].2, "salary_reversal");
    }

    #[tokio::test]
    async fn test_reopen_rejects_unpaid_record() {
        let (store, _) = create_store();
        let payroll = create_draft(&store, "1000").await;

        match store.reopen(payroll.id, "admin").await {
            Err(PayrollError::InvalidStatusChange { from, to }) => {
                assert_eq!(from, PayrollStatus::Draft);
                assert_eq!(to, PayrollStatus::Draft);
            }
            other => panic!("Expected InvalidStatusChange, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_operations_on_unknown_id_return_not_found() {
        let (store, _) = create_store();
        let missing = Uuid::new_v4();

        assert!(matches!(
            store.mark_paid(missing, "operator").await,
            Err(PayrollError::PayrollNotFound { .. })
        ));
        assert!(matches!(
            store
                .record_payment(missing, dec("1"), "cash", "ref", "operator")
                .await,
            Err(PayrollError::PayrollNotFound { .. })
        ));
        assert!(store.get(missing).await.is_none());
    }

    #[tokio::test]
    async fn test_distinct_periods_get_distinct_records() {
        let (store, _) = create_store();
        store
            .upsert("emp_001", Period::new(3, 2026), &create_breakdown("1000"), "t")
            .await
            .unwrap();
        store
            .upsert("emp_001", Period::new(4, 2026), &create_breakdown("1100"), "t")
            .await
            .unwrap();

        let march = store.find("emp_001", Period::new(3, 2026)).await.unwrap();
        let april = store.find("emp_001", Period::new(4, 2026)).await.unwrap();
        assert_ne!(march.id, april.id);
        assert_eq!(march.total_pay, dec("1000"));
        assert_eq!(april.total_pay, dec("1100"));
    }
}
