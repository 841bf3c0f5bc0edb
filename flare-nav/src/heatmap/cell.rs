//! Heat map cells and signal-based classification.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::HeatMapConfig;
use crate::core::GridCoord;

/// What the signal history of a cell says about it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    /// No readings
    #[default]
    Unknown,
    /// Strong, steady signal
    Clear,
    /// Volatile or middling signal
    Unstable,
    /// Weak signal: likely shadowed by debris
    Obstacle,
}

impl CellStatus {
    /// A* cost of entering a cell with this status.
    ///
    /// `None` for obstacles, which are never expanded.
    #[inline]
    pub fn move_cost(self) -> Option<f64> {
        match self {
            CellStatus::Clear => Some(1.0),
            CellStatus::Unknown => Some(1.5),
            CellStatus::Unstable => Some(2.0),
            CellStatus::Obstacle => None,
        }
    }

    /// Check if traversable
    #[inline]
    pub fn is_traversable(self) -> bool {
        self != CellStatus::Obstacle
    }
}

/// Result of [`classify`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub status: CellStatus,
    pub avg_signal: Option<f64>,
    /// Population variance (dB²)
    pub variance: Option<f64>,
}

/// Classify readings with the default thresholds.
pub fn classify(readings: &[f64]) -> Classification {
    classify_with(readings.iter().copied(), &HeatMapConfig::default())
}

/// Classify readings.
///
/// Variance above the limit is `Unstable` no matter how strong the mean is;
/// otherwise the mean decides between `Clear`, `Unstable` and `Obstacle`.
pub fn classify_with<I>(readings: I, config: &HeatMapConfig) -> Classification
where
    I: IntoIterator<Item = f64>,
    I::IntoIter: Clone,
{
    let iter = readings.into_iter();
    let (count, sum) = iter.clone().fold((0usize, 0.0), |(n, s), r| (n + 1, s + r));
    if count == 0 {
        return Classification {
            status: CellStatus::Unknown,
            avg_signal: None,
            variance: None,
        };
    }

    let avg = sum / count as f64;
    let variance = iter.map(|r| (r - avg) * (r - avg)).sum::<f64>() / count as f64;

    let status = if variance > config.unstable_variance {
        CellStatus::Unstable
    } else if avg >= config.clear_threshold_dbm {
        CellStatus::Clear
    } else if avg >= config.unstable_threshold_dbm {
        CellStatus::Unstable
    } else {
        CellStatus::Obstacle
    };

    Classification {
        status,
        avg_signal: Some(avg),
        variance: Some(variance),
    }
}

/// One populated cell of the sparse heat map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
    /// Most recent readings, oldest first (bounded)
    pub readings: VecDeque<f64>,
    pub status: CellStatus,
    pub avg_signal: Option<f64>,
    /// Readings ever recorded here, including evicted ones
    pub visit_count: u32,
    /// Time of the latest reading (ms)
    pub last_updated: u64,
}

impl GridCell {
    pub(super) fn new(coord: GridCoord) -> Self {
        Self {
            x: coord.x,
            y: coord.y,
            readings: VecDeque::new(),
            status: CellStatus::Unknown,
            avg_signal: None,
            visit_count: 0,
            last_updated: 0,
        }
    }

    #[inline]
    pub fn coord(&self) -> GridCoord {
        GridCoord::new(self.x, self.y)
    }

    /// Append a reading, evict beyond the bound, and reclassify
    pub(super) fn push(&mut self, rssi: f64, timestamp_ms: u64, config: &HeatMapConfig) {
        while self.readings.len() >= config.max_readings_per_cell.max(1) {
            self.readings.pop_front();
        }
        self.readings.push_back(rssi);
        self.visit_count = self.visit_count.saturating_add(1);
        self.last_updated = timestamp_ms;
        self.reclassify(config);
    }

    /// Recompute the derived fields from the readings
    pub(super) fn reclassify(&mut self, config: &HeatMapConfig) {
        let result = classify_with(self.readings.iter().copied(), config);
        self.status = result.status;
        self.avg_signal = result.avg_signal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_clear() {
        let result = classify(&[-65.0, -66.0, -64.0]);
        assert_eq!(result.status, CellStatus::Clear);
        assert!((result.avg_signal.unwrap() - -65.0).abs() < 1e-9);
    }

    #[test]
    fn test_classify_volatile_is_unstable() {
        // one strong reading does not rescue a volatile cell
        let result = classify(&[-90.0, -40.0, -95.0]);
        assert_eq!(result.status, CellStatus::Unstable);
        assert!(result.variance.unwrap() > 100.0);
    }

    #[test]
    fn test_classify_by_mean() {
        assert_eq!(classify(&[-70.0]).status, CellStatus::Clear);
        assert_eq!(classify(&[-78.0, -80.0]).status, CellStatus::Unstable);
        assert_eq!(classify(&[-85.0]).status, CellStatus::Unstable);
        assert_eq!(classify(&[-90.0, -92.0]).status, CellStatus::Obstacle);
    }

    #[test]
    fn test_classify_empty() {
        let result = classify(&[]);
        assert_eq!(result.status, CellStatus::Unknown);
        assert_eq!(result.avg_signal, None);
    }

    #[test]
    fn test_cell_bounded_fifo() {
        let config = HeatMapConfig::default();
        let mut cell = GridCell::new(GridCoord::new(1, 2));
        for i in 0..25 {
            cell.push(-60.0 - i as f64 * 0.1, i, &config);
        }
        assert_eq!(cell.readings.len(), 20);
        assert_eq!(cell.visit_count, 25);
        assert_eq!(cell.last_updated, 24);
        // first five evicted
        assert!((cell.readings[0] - -60.5).abs() < 1e-9);
    }

    #[test]
    fn test_move_costs() {
        assert_eq!(CellStatus::Clear.move_cost(), Some(1.0));
        assert_eq!(CellStatus::Unknown.move_cost(), Some(1.5));
        assert_eq!(CellStatus::Unstable.move_cost(), Some(2.0));
        assert_eq!(CellStatus::Obstacle.move_cost(), None);
    }
}
