//! Sector sampling and bearing resolution.

use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::CalibrationConfig;
use crate::core::{Octant, normalize_degrees};

use super::SectorLayout;

/// Readings collected while facing one sector.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionSector {
    /// Sector index (0 starts at north, clockwise)
    pub sector_id: u8,
    /// Every RSSI recorded in this sector during the session
    pub readings: Vec<f64>,
    /// True once at least one reading landed here
    pub visited: bool,
}

impl DirectionSector {
    fn new(sector_id: u8) -> Self {
        Self {
            sector_id,
            readings: Vec::new(),
            visited: false,
        }
    }

    /// Mean RSSI, or `None` with no readings
    pub fn mean(&self) -> Option<f64> {
        if self.readings.is_empty() {
            return None;
        }
        Some(self.readings.iter().sum::<f64>() / self.readings.len() as f64)
    }
}

/// One calibration session's sectors and outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationState {
    pub sectors: Vec<DirectionSector>,
    /// Distinct sectors needed before calibration counts as done
    pub required_min_visited: u8,
    /// Set once by `resolve`; later samples are ignored
    pub is_complete: bool,
    pub resolved_bearing_deg: Option<f64>,
}

impl CalibrationState {
    fn new(layout: SectorLayout, required_min_visited: u8) -> Self {
        let count = layout.sector_count();
        Self {
            sectors: (0..count as u8).map(DirectionSector::new).collect(),
            // Required coverage can never exceed the sectors available
            required_min_visited: required_min_visited.min(count as u8),
            is_complete: false,
            resolved_bearing_deg: None,
        }
    }

    /// Number of distinct visited sectors
    pub fn visited_count(&self) -> usize {
        self.sectors.iter().filter(|s| s.visited).count()
    }
}

/// Calibration status for UI collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProgress {
    pub visited_count: usize,
    pub required_count: usize,
    /// Sector of the most recent accepted sample
    pub current_sector: Option<u8>,
    pub is_calibrated: bool,
    pub is_complete: bool,
    /// `min(1, visited / required)`
    pub progress: f64,
    pub resolved_bearing_deg: Option<f64>,
}

/// Rotation-based compass calibration.
///
/// Call [`record_sample`](Self::record_sample) while the rescuer turns,
/// then [`resolve`](Self::resolve) once [`is_calibrated`](Self::is_calibrated).
#[derive(Clone, Debug)]
pub struct DirectionEstimator {
    layout: SectorLayout,
    state: CalibrationState,
    current_sector: Option<u8>,
}

impl Default for DirectionEstimator {
    fn default() -> Self {
        Self::new(&CalibrationConfig::default())
    }
}

impl DirectionEstimator {
    /// Create from the calibration config section
    pub fn new(config: &CalibrationConfig) -> Self {
        Self::with_layout(config.layout, config.min_sectors)
    }

    /// Create with an explicit layout and required sector count
    pub fn with_layout(layout: SectorLayout, required_min_visited: u8) -> Self {
        Self {
            layout,
            state: CalibrationState::new(layout, required_min_visited),
            current_sector: None,
        }
    }

    pub fn layout(&self) -> SectorLayout {
        self.layout
    }

    pub fn state(&self) -> &CalibrationState {
        &self.state
    }

    /// File an RSSI reading under the sector for `heading_deg`.
    ///
    /// Returns `false` when the sample was ignored: calibration already
    /// resolved, heading not finite, or RSSI not finite.
    pub fn record_sample(&mut self, heading_deg: f64, rssi: f64) -> bool {
        if self.state.is_complete {
            return false;
        }
        if !rssi.is_finite() {
            return false;
        }
        let Some(sector) = self.layout.sector_for(heading_deg) else {
            warn!("Ignoring calibration sample with heading {}", heading_deg);
            return false;
        };

        let entry = &mut self.state.sectors[sector as usize];
        entry.readings.push(rssi);
        if !entry.visited {
            entry.visited = true;
            debug!(
                "Calibration sector {} visited ({}/{})",
                sector,
                self.state.visited_count(),
                self.state.required_min_visited
            );
        }
        self.current_sector = Some(sector);
        trace!("Calibration sample heading={:.1} sector={} rssi={}", heading_deg, sector, rssi);
        true
    }

    /// Enough distinct sectors have been visited
    pub fn is_calibrated(&self) -> bool {
        self.state.visited_count() >= self.state.required_min_visited as usize
    }

    /// Fraction of required coverage reached, in [0, 1]
    pub fn progress(&self) -> f64 {
        let required = self.state.required_min_visited as f64;
        if required <= 0.0 {
            return 1.0;
        }
        (self.state.visited_count() as f64 / required).min(1.0)
    }

    /// Bearing of the strongest sector.
    ///
    /// Picks the highest mean RSSI among sectors with readings; ties go to
    /// the lowest sector index. The first successful call completes the
    /// session and every later call returns the same bearing. Returns `None`
    /// while no sector has readings.
    pub fn resolve(&mut self) -> Option<f64> {
        if self.state.is_complete {
            return self.state.resolved_bearing_deg;
        }

        let mut best: Option<(u8, f64)> = None;
        for sector in &self.state.sectors {
            let Some(mean) = sector.mean() else {
                continue;
            };
            match best {
                Some((_, best_mean)) if mean <= best_mean => {}
                _ => best = Some((sector.sector_id, mean)),
            }
        }

        let (sector, mean) = best?;
        let bearing = self.layout.bearing(sector);
        self.state.is_complete = true;
        self.state.resolved_bearing_deg = Some(bearing);
        info!(
            "Calibration resolved: sector {} bearing {:.1}° (mean {:.1} dBm)",
            sector, bearing, mean
        );
        Some(bearing)
    }

    /// Resolved bearing, if calibration completed
    pub fn resolved_bearing(&self) -> Option<f64> {
        self.state.resolved_bearing_deg
    }

    /// Octant nearest the resolved bearing.
    ///
    /// Octant sector centers sit on octant boundaries (22.5°, 67.5°, ...);
    /// a bearing on a boundary maps to the counter-clockwise octant, the one
    /// the sector starts in.
    pub fn resolved_octant(&self) -> Option<Octant> {
        let bearing = self.state.resolved_bearing_deg?;
        let shifted = normalize_degrees(bearing + 22.5);
        let index = ((shifted / 45.0).ceil() as usize + Octant::COUNT - 1) % Octant::COUNT;
        Some(Octant::from_index(index))
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete
    }

    /// Snapshot for display
    pub fn calibration_progress(&self) -> CalibrationProgress {
        CalibrationProgress {
            visited_count: self.state.visited_count(),
            required_count: self.state.required_min_visited as usize,
            current_sector: self.current_sector,
            is_calibrated: self.is_calibrated(),
            is_complete: self.state.is_complete,
            progress: self.progress(),
            resolved_bearing_deg: self.state.resolved_bearing_deg,
        }
    }

    /// Discard all samples and start a new calibration session
    pub fn reset(&mut self) {
        self.state = CalibrationState::new(self.layout, self.state.required_min_visited);
        self.current_sector = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(estimator: &mut DirectionEstimator, headings: &[f64], rssi: f64) {
        for &h in headings {
            assert!(estimator.record_sample(h, rssi));
        }
    }

    #[test]
    fn test_calibrated_after_six_octants() {
        let mut estimator = DirectionEstimator::with_layout(SectorLayout::Octants, 6);
        visit(&mut estimator, &[0.0, 45.0, 90.0, 135.0, 180.0, 225.0], -70.0);
        assert!(estimator.is_calibrated());
        assert_eq!(estimator.progress(), 1.0);
    }

    #[test]
    fn test_partial_coverage() {
        let mut estimator = DirectionEstimator::with_layout(SectorLayout::Octants, 6);
        visit(&mut estimator, &[0.0, 45.0, 90.0], -70.0);
        assert!(!estimator.is_calibrated());
        assert!((estimator.progress() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_repeat_visits_count_once() {
        let mut estimator = DirectionEstimator::with_layout(SectorLayout::Octants, 6);
        visit(&mut estimator, &[10.0, 20.0, 30.0, 40.0], -70.0);
        let progress = estimator.calibration_progress();
        assert_eq!(progress.visited_count, 1);
        assert_eq!(progress.current_sector, Some(0));
        assert_eq!(estimator.state().sectors[0].readings.len(), 4);
    }

    #[test]
    fn test_resolve_picks_strongest_mean() {
        let mut estimator = DirectionEstimator::with_layout(SectorLayout::Octants, 6);
        estimator.record_sample(10.0, -80.0);
        estimator.record_sample(100.0, -60.0);
        estimator.record_sample(100.0, -64.0);
        estimator.record_sample(190.0, -75.0);
        // sector 2 mean -62 beats the rest
        assert_eq!(estimator.resolve(), Some(112.5));
        assert_eq!(estimator.resolved_octant(), Some(Octant::E));
    }

    #[test]
    fn test_resolve_tie_goes_to_lowest_index() {
        let mut estimator = DirectionEstimator::with_layout(SectorLayout::Octants, 2);
        estimator.record_sample(250.0, -65.0);
        estimator.record_sample(100.0, -65.0);
        assert_eq!(estimator.resolve(), Some(112.5));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut estimator = DirectionEstimator::with_layout(SectorLayout::Octants, 1);
        estimator.record_sample(0.0, -60.0);
        let first = estimator.resolve();
        let state = estimator.state().clone();

        // samples after completion are ignored
        assert!(!estimator.record_sample(180.0, -30.0));
        assert_eq!(estimator.resolve(), first);
        assert_eq!(estimator.state(), &state);
    }

    #[test]
    fn test_resolve_without_samples() {
        let mut estimator = DirectionEstimator::default();
        assert_eq!(estimator.resolve(), None);
        assert!(!estimator.is_complete());
        assert!(!estimator.is_calibrated());
    }

    #[test]
    fn test_nan_heading_ignored() {
        let mut estimator = DirectionEstimator::default();
        assert!(!estimator.record_sample(f64::NAN, -60.0));
        assert!(!estimator.record_sample(90.0, f64::NAN));
        assert_eq!(estimator.calibration_progress().visited_count, 0);
    }

    #[test]
    fn test_fine_layout() {
        let mut estimator = DirectionEstimator::new(&CalibrationConfig::fine());
        for i in 0..8 {
            estimator.record_sample(i as f64 * 30.0 + 1.0, -70.0 + i as f64);
        }
        assert!(estimator.is_calibrated());
        // strongest is sector 7
        assert_eq!(estimator.resolve(), Some(225.0));
    }

    #[test]
    fn test_reset_starts_recalibration() {
        let mut estimator = DirectionEstimator::with_layout(SectorLayout::Octants, 1);
        estimator.record_sample(0.0, -60.0);
        estimator.resolve();
        estimator.reset();
        assert!(!estimator.is_complete());
        assert_eq!(estimator.resolved_bearing(), None);
        assert!(estimator.record_sample(90.0, -60.0));
        assert_eq!(estimator.resolve(), Some(112.5));
    }

    #[test]
    fn test_required_clamped_to_sector_count() {
        let estimator = DirectionEstimator::with_layout(SectorLayout::Octants, 20);
        assert_eq!(estimator.calibration_progress().required_count, 8);
    }
}
