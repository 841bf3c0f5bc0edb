//! Session-level configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Recording, anchor collection and planner scheduling
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Record RSSI into the heat map from session start
    #[serde(default = "defaults::enabled")]
    pub record_heatmap: bool,

    /// Interval between scheduled A* runs (ms)
    #[serde(default = "defaults::planner_interval_ms")]
    pub planner_interval_ms: u64,

    /// Position-tagged distance samples kept for trilateration
    #[serde(default = "defaults::max_anchors")]
    pub max_anchors: usize,

    /// Minimum spacing between kept anchors (cm)
    #[serde(default = "defaults::min_anchor_separation_cm")]
    pub min_anchor_separation_cm: f64,

    /// Readings after a step before its signal change is scored
    #[serde(default = "defaults::settle_readings")]
    pub settle_readings: usize,

    /// Refine with least squares over all anchors instead of the first three
    #[serde(default)]
    pub use_least_squares: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            record_heatmap: true,
            planner_interval_ms: defaults::planner_interval_ms(),
            max_anchors: defaults::max_anchors(),
            min_anchor_separation_cm: defaults::min_anchor_separation_cm(),
            settle_readings: defaults::settle_readings(),
            use_least_squares: false,
        }
    }
}
