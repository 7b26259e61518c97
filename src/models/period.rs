//! Pay period identity.
//!
//! A [`Period`] is the `(month, year)` cycle a payroll record belongs to.
//! Which calendar dates map into a period is decided by the cutoff-day
//! policy in [`crate::period::PeriodResolver`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(month, year)` pay cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    /// The year of the period.
    pub year: i32,
    /// The month of the period (1-12).
    pub month: u32,
}

impl Period {
    /// Creates a period for the given month and year.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `month` is 1-12; callers construct periods from
    /// already-valid calendar dates.
    pub fn new(month: u32, year: i32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    /// Returns the following period, rolling December into January of the
    /// next year.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::Period;
    ///
    /// assert_eq!(Period::new(12, 2026).next(), Period::new(1, 2027));
    /// assert_eq!(Period::new(6, 2026).next(), Period::new(7, 2026));
    /// ```
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self::new(1, self.year + 1)
        } else {
            Self::new(self.month + 1, self.year)
        }
    }

    /// Returns the preceding period, rolling January into December of the
    /// previous year.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::Period;
    ///
    /// assert_eq!(Period::new(1, 2026).prev(), Period::new(12, 2025));
    /// assert_eq!(Period::new(6, 2026).prev(), Period::new(5, 2026));
    /// ```
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self::new(12, self.year - 1)
        } else {
            Self::new(self.month - 1, self.year)
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
