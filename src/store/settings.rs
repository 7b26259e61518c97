//! Runtime payroll settings.
//!
//! A singleton holding the salary cutoff day. Seeded from configuration at
//! process start and mutable at runtime through the engine's settings
//! operations.

use tokio::sync::RwLock;

use crate::error::{PayrollError, PayrollResult};
use crate::period::PeriodResolver;

/// The mutable payroll settings singleton.
#[derive(Debug)]
pub struct SettingsStore {
    salary_cutoff_day: RwLock<u32>,
}

impl SettingsStore {
    /// Creates the store with the given cutoff day.
    ///
    /// Rejects values outside 1-31 with [`PayrollError::InvalidCutoffDay`].
    pub fn new(salary_cutoff_day: u32) -> PayrollResult<Self> {
        if !(1..=31).contains(&salary_cutoff_day) {
            return Err(PayrollError::InvalidCutoffDay {
                day: salary_cutoff_day,
            });
        }
        Ok(Self {
            salary_cutoff_day: RwLock::new(salary_cutoff_day),
        })
    }

    /// Returns the current salary cutoff day.
    pub async fn cutoff_day(&self) -> u32 {
        *self.salary_cutoff_day.read().await
    }

    /// Sets the salary cutoff day, validated to 1-31.
    pub async fn set_cutoff_day(&self, day: u32) -> PayrollResult<()> {
        if !(1..=31).contains(&day) {
            return Err(PayrollError::InvalidCutoffDay { day });
        }
        *self.salary_cutoff_day.write().await = day;
        Ok(())
    }

    /// Builds a period resolver for the current cutoff day.
    pub async fn resolver(&self) -> PeriodResolver {
        let day = self.cutoff_day().await;
        PeriodResolver::new(day).unwrap_or_else(|_| {
            // The stored value is always validated on the way in.
            unreachable!("settings store holds a validated cutoff day")
        })
    }
}

impl Default for SettingsStore {
    /// The default cutoff day is 1: periods are calendar months.
    fn default() -> Self {
        Self {
            salary_cutoff_day: RwLock::new(1),
        }
    }
}
