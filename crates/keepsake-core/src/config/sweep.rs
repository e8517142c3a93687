//! Periodic dormancy sweep configuration.

use serde::{Deserialize, Serialize};

/// Settings for the background sweep that garbage-collects dormant
/// token records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Whether the periodic sweep loop runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval between sweep passes in minutes.
    #[serde(default = "default_interval")]
    pub interval_minutes: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_minutes: default_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    60
}
