//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load the engine configuration
//! from a YAML file: the automation schedule, its timezone, and the seed
//! value for the salary cutoff day.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::EngineConfig;
//!
//! let config = EngineConfig::load("./config/payroll.yaml").unwrap();
//! println!("Automation enabled: {}", config.automation.enabled);
//! ```

mod loader;
mod types;

pub use types::{AutomationConfig, EngineConfig, SettingsConfig};
