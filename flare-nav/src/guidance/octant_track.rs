//! Per-octant signal trend window.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::GuidanceConfig;

/// One movement filed under an octant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OctantReading {
    /// Smoothed RSSI after the move (dBm)
    pub rssi: f64,
    /// Change versus the previous movement (dB)
    pub rssi_change: f64,
}

/// Trend statistics for one direction.
///
/// `avg_change` and `confidence` are recomputed on every push; the obstacle
/// flag follows a hysteresis band so it does not flap around one threshold.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OctantTrack {
    pub readings: VecDeque<OctantReading>,
    pub avg_change: f64,
    /// `min(1, len / confidence_full_samples)`
    pub confidence: f64,
    pub is_obstacle: bool,
}

impl OctantTrack {
    /// Append a reading and update statistics.
    ///
    /// Returns `Some(flag)` when the obstacle flag changed.
    pub fn record(&mut self, reading: OctantReading, config: &GuidanceConfig) -> Option<bool> {
        if self.readings.len() >= config.octant_window {
            self.readings.pop_front();
        }
        self.readings.push_back(reading);

        let n = self.readings.len();
        self.avg_change = self.readings.iter().map(|r| r.rssi_change).sum::<f64>() / n as f64;
        self.confidence = (n as f64 / config.confidence_full_samples as f64).min(1.0);

        let was_obstacle = self.is_obstacle;
        if self.avg_change < config.obstacle_threshold_db && n >= config.obstacle_min_samples {
            self.is_obstacle = true;
        } else if self.avg_change > config.obstacle_clear_threshold_db {
            self.is_obstacle = false;
        }

        (was_obstacle != self.is_obstacle).then_some(self.is_obstacle)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
