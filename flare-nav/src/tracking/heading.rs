//! Compass heading from the magnetometer, with moving-average smoothing.

use std::collections::VecDeque;

use crate::core::{MagSample, circular_mean_degrees, normalize_degrees};

/// Planar heading `atan2(mag_y, mag_x)` in degrees, normalized to [0, 360).
///
/// Returns `None` when the reading is not finite.
pub fn heading_from_magnetometer(sample: &MagSample) -> Option<f64> {
    let heading = sample.y.atan2(sample.x).to_degrees();
    heading.is_finite().then(|| normalize_degrees(heading))
}

/// Simple moving average over the last N headings.
///
/// Averaging happens on the unit circle so 359° and 1° give 0°, not 180°.
#[derive(Clone, Debug)]
pub struct HeadingFilter {
    window: VecDeque<f64>,
    capacity: usize,
    current: Option<f64>,
}

impl HeadingFilter {
    /// Create a filter over `capacity` readings (1 disables smoothing)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            current: None,
        }
    }

    /// Add a raw heading and return the smoothed one
    pub fn push(&mut self, heading_deg: f64) -> Option<f64> {
        if !heading_deg.is_finite() {
            return self.current;
        }
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(normalize_degrees(heading_deg));

        let newest = self.window.back().copied();
        self.current = if self.window.len() == 1 {
            newest
        } else {
            // Opposing headings cancel; keep the newest raw one
            circular_mean_degrees(self.window.make_contiguous()).or(newest)
        };
        self.current
    }

    /// Current smoothed heading
    pub fn current(&self) -> Option<f64> {
        self.current
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.current = None;
    }
}
