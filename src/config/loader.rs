//! Configuration loading functionality.
//!
//! Loads the [`EngineConfig`] from a YAML file and validates the schedule
//! and cutoff values before the engine starts.

use std::fs;
use std::path::Path;

use crate::error::{PayrollError, PayrollResult};

use super::types::EngineConfig;

impl EngineConfig {
    /// Loads and validates configuration from the specified YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file (e.g., "./config/payroll.yaml")
    ///
    /// # Returns
    ///
    /// Returns the parsed configuration on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML (`ConfigParseError`)
    /// - The schedule hour/minute or cutoff day is out of range
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::EngineConfig;
    ///
    /// let config = EngineConfig::load("./config/payroll.yaml")?;
    /// # Ok::<(), payroll_engine::error::PayrollError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config: EngineConfig =
            serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        config.validate(&path_str)?;
        Ok(config)
    }

    /// Validates the range constraints of the configuration.
    fn validate(&self, path: &str) -> PayrollResult<()> {
        if self.automation.hour > 23 {
            return Err(PayrollError::ConfigParseError {
                path: path.to_string(),
                message: format!("automation.hour {} is outside 0-23", self.automation.hour),
            });
        }
        if self.automation.minute > 59 {
            return Err(PayrollError::ConfigParseError {
                path: path.to_string(),
                message: format!(
                    "automation.minute {} is outside 0-59",
                    self.automation.minute
                ),
            });
        }
        if !(1..=31).contains(&self.settings.salary_cutoff_day) {
            return Err(PayrollError::InvalidCutoffDay {
                day: self.settings.salary_cutoff_day,
            });
        }
        Ok(())
    }
}
