//! Dead-reckoning configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Step detection and stride settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Minimum jump in accelerometer magnitude between samples (g)
    #[serde(default = "defaults::step_threshold")]
    pub step_threshold: f64,

    /// Minimum time between two steps (ms)
    #[serde(default = "defaults::step_cooldown_ms")]
    pub step_cooldown_ms: u64,

    /// Distance advanced per step (cm)
    #[serde(default = "defaults::step_length_cm")]
    pub step_length_cm: f64,

    /// Raw magnetometer headings averaged per estimate (1 disables smoothing)
    #[serde(default = "defaults::heading_window")]
    pub heading_window: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            step_threshold: defaults::step_threshold(),
            step_cooldown_ms: defaults::step_cooldown_ms(),
            step_length_cm: defaults::step_length_cm(),
            heading_window: defaults::heading_window(),
        }
    }
}
