//! Cutoff-day period resolution.
//!
//! The resolver is a pure function over calendar dates. Timezone handling
//! happens at the caller: the engine converts "now" to the configured local
//! timezone before asking which period a date belongs to.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{PayrollError, PayrollResult};
use crate::models::Period;

/// Resolves calendar dates to pay periods under a salary cutoff day.
///
/// With a cutoff day of 1 a period is simply the calendar month. With a
/// later cutoff, a pay cycle starts on the cutoff day: dates on or after
/// it belong to the **next** calendar month's period.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Period;
/// use payroll_engine::period::PeriodResolver;
/// use chrono::NaiveDate;
///
/// let resolver = PeriodResolver::new(25).unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 26).unwrap();
/// assert_eq!(resolver.resolve(date), Period::new(4, 2026));
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 24).unwrap();
/// assert_eq!(resolver.resolve(date), Period::new(3, 2026));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PeriodResolver {
    cutoff_day: u32,
}

impl PeriodResolver {
    /// Creates a resolver for the given cutoff day.
    ///
    /// Rejects values outside 1-31 with [`PayrollError::InvalidCutoffDay`].
    pub fn new(cutoff_day: u32) -> PayrollResult<Self> {
        if !(1..=31).contains(&cutoff_day) {
            return Err(PayrollError::InvalidCutoffDay { day: cutoff_day });
        }
        Ok(Self { cutoff_day })
    }

    /// Returns the configured cutoff day.
    pub fn cutoff_day(&self) -> u32 {
        self.cutoff_day
    }

    /// Returns the period the given calendar day belongs to.
    pub fn resolve(&self, date: NaiveDate) -> Period {
        let period = Period::new(date.month(), date.year());
        if self.cutoff_day == 1 {
            return period;
        }
        if date.day() >= self.cutoff_day {
            period.next()
        } else {
            period
        }
    }

    /// Returns the inclusive calendar date range covered by a period.
    ///
    /// With cutoff 1 this is the calendar month. Otherwise the period runs
    /// from the cutoff day of the preceding month through the day before
    /// the next period begins. When the cutoff day exceeds the preceding
    /// month's length no day of that month rolls forward, so the period
    /// starts on the 1st of its own month; every day in the span resolves
    /// back to the same period.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::Period;
    /// use payroll_engine::period::PeriodResolver;
    /// use chrono::NaiveDate;
    ///
    /// let resolver = PeriodResolver::new(25).unwrap();
    /// let (start, end) = resolver.span(Period::new(4, 2026));
    /// assert_eq!(start, NaiveDate::from_ymd_opt(2026, 3, 25).unwrap());
    /// assert_eq!(end, NaiveDate::from_ymd_opt(2026, 4, 24).unwrap());
    /// ```
    pub fn span(&self, period: Period) -> (NaiveDate, NaiveDate) {
        let start = self.period_start(period);
        let end = self
            .period_start(period.next())
            .pred_opt()
            .unwrap_or(start);
        (start, end)
    }

    /// Returns the first calendar day that resolves to the given period.
    fn period_start(&self, period: Period) -> NaiveDate {
        if self.cutoff_day > 1 {
            let prev = period.prev();
            if self.cutoff_day <= last_day_of_month(prev.year, prev.month) {
                return NaiveDate::from_ymd_opt(prev.year, prev.month, self.cutoff_day)
                    .expect("cutoff day within month length");
            }
        }
        NaiveDate::from_ymd_opt(period.year, period.month, 1).expect("valid first of month")
    }

    /// Returns the distinct periods touched by any day in the inclusive
    /// range `start..=end`, in first-seen order.
    ///
    /// Used to determine which periods a late-arriving attendance or leave
    /// correction must trigger a recompute for. An inverted range yields
    /// an empty set.
    pub fn periods_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<Period> {
        let mut periods = Vec::new();
        let mut day = start;
        while day <= end {
            let period = self.resolve(day);
            if periods.last() != Some(&period) {
                periods.push(period);
            }
            day = match day.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => break,
            };
        }
        periods
    }
}

/// Returns the number of days in the given month.
fn last_day_of_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid first of month");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid first of next month");
    (next - first).num_days() as u32
}
