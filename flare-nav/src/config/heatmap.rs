//! Heat map configuration section.

use serde::{Deserialize, Serialize};

use crate::heatmap::PathHeuristic;

use super::defaults;

/// Grid geometry, cell classification and planner settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeatMapConfig {
    /// Cell edge length in world units (cm)
    #[serde(default = "defaults::cell_size_cm")]
    pub cell_size_cm: f64,

    /// Readings kept per cell (oldest evicted first)
    #[serde(default = "defaults::max_readings_per_cell")]
    pub max_readings_per_cell: usize,

    /// Reading variance above which a cell is Unstable (dB²)
    #[serde(default = "defaults::unstable_variance")]
    pub unstable_variance: f64,

    /// Mean RSSI at or above which a cell is Clear (dBm)
    #[serde(default = "defaults::clear_threshold_dbm")]
    pub clear_threshold_dbm: f64,

    /// Mean RSSI at or above which a non-clear cell is Unstable (dBm)
    #[serde(default = "defaults::unstable_threshold_dbm")]
    pub unstable_threshold_dbm: f64,

    /// A* heuristic: "manhattan" or "octile"
    #[serde(default = "defaults::path_heuristic")]
    pub heuristic: PathHeuristic,

    /// Maximum nodes expanded per search
    #[serde(default = "defaults::max_iterations")]
    pub max_iterations: usize,
}

impl Default for HeatMapConfig {
    fn default() -> Self {
        Self {
            cell_size_cm: defaults::cell_size_cm(),
            max_readings_per_cell: defaults::max_readings_per_cell(),
            unstable_variance: defaults::unstable_variance(),
            clear_threshold_dbm: defaults::clear_threshold_dbm(),
            unstable_threshold_dbm: defaults::unstable_threshold_dbm(),
            heuristic: defaults::path_heuristic(),
            max_iterations: defaults::max_iterations(),
        }
    }
}
