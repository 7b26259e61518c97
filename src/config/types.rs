//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every field has a
//! default so the engine is usable without a file at all.

use chrono_tz::Tz;
use serde::Deserialize;

/// Schedule settings for the automated daily recompute.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Whether the background scheduler is started at process start.
    pub enabled: bool,
    /// Local wall-clock hour of the daily run (0-23).
    pub hour: u32,
    /// Local wall-clock minute of the daily run (0-59).
    pub minute: u32,
    /// The timezone the hour/minute are interpreted in.
    pub timezone: Tz,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hour: 2,
            minute: 30,
            timezone: chrono_tz::Australia::Sydney,
        }
    }
}

/// Seed values for the runtime payroll settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// The day-of-month on which a new pay period begins (1-31).
    pub salary_cutoff_day: u32,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            salary_cutoff_day: 1,
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Automation schedule settings.
    pub automation: AutomationConfig,
    /// Payroll settings seed values.
    pub settings: SettingsConfig,
}
