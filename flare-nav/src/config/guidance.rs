//! Hot/cold guidance configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Trend windows and thresholds for movement guidance
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuidanceConfig {
    /// Readings kept per octant
    #[serde(default = "defaults::octant_window")]
    pub octant_window: usize,

    /// Movements kept in the global history
    #[serde(default = "defaults::movement_history_len")]
    pub history_len: usize,

    /// Recent movements averaged for the hot/cold state
    #[serde(default = "defaults::trend_window")]
    pub trend_window: usize,

    /// |average change| above which the state is Warmer/Colder (dB)
    #[serde(default = "defaults::trend_threshold_db")]
    pub trend_threshold_db: f64,

    /// Average change below which an octant is flagged as obstacle (dB)
    #[serde(default = "defaults::obstacle_threshold_db")]
    pub obstacle_threshold_db: f64,

    /// Average change above which an obstacle flag is cleared (dB)
    #[serde(default = "defaults::obstacle_clear_threshold_db")]
    pub obstacle_clear_threshold_db: f64,

    /// Samples required before an octant can be flagged
    #[serde(default = "defaults::obstacle_min_samples")]
    pub obstacle_min_samples: usize,

    /// Samples at which octant confidence reaches 1.0
    #[serde(default = "defaults::confidence_full_samples")]
    pub confidence_full_samples: usize,

    /// Minimum octant confidence to be suggested
    #[serde(default = "defaults::min_direction_confidence")]
    pub min_direction_confidence: f64,

    /// Distance treated as arrival (m)
    #[serde(default = "defaults::arrival_distance_m")]
    pub arrival_distance_m: f64,

    /// Distance at which messages get a proximity prefix (m)
    #[serde(default = "defaults::near_distance_m")]
    pub near_distance_m: f64,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            octant_window: defaults::octant_window(),
            history_len: defaults::movement_history_len(),
            trend_window: defaults::trend_window(),
            trend_threshold_db: defaults::trend_threshold_db(),
            obstacle_threshold_db: defaults::obstacle_threshold_db(),
            obstacle_clear_threshold_db: defaults::obstacle_clear_threshold_db(),
            obstacle_min_samples: defaults::obstacle_min_samples(),
            confidence_full_samples: defaults::confidence_full_samples(),
            min_direction_confidence: defaults::min_direction_confidence(),
            arrival_distance_m: defaults::arrival_distance_m(),
            near_distance_m: defaults::near_distance_m(),
        }
    }
}
