//! Step-and-heading position tracking.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::TrackingConfig;
use crate::core::{AccelSample, MagSample, Octant, Position, heading_to_vector, normalize_degrees};

use super::heading::{HeadingFilter, heading_from_magnetometer};
use super::step_detector::StepDetector;

/// Emitted for every step (or manual move) that changed the position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementEvent {
    /// Octant the rescuer moved toward
    pub octant: Octant,
    /// Exact movement heading (degrees)
    pub heading_deg: f64,
    /// Position after the move (cm)
    pub new_position: Position,
    /// Steps detected so far, including this one
    pub step_index: u64,
    pub timestamp_ms: u64,
}

/// Dead-reckoning tracker.
///
/// Owns the rescuer position in session world units (cm). The position
/// only changes through detected steps or [`manual_move`](Self::manual_move).
#[derive(Clone, Debug)]
pub struct DeadReckoningTracker {
    config: TrackingConfig,
    detector: StepDetector,
    filter: HeadingFilter,
    heading: Option<f64>,
    position: Position,
    step_count: u64,
}

impl Default for DeadReckoningTracker {
    fn default() -> Self {
        Self::new(TrackingConfig::default())
    }
}

impl DeadReckoningTracker {
    pub fn new(config: TrackingConfig) -> Self {
        Self {
            detector: StepDetector::new(config.step_threshold, config.step_cooldown_ms),
            filter: HeadingFilter::new(config.heading_window),
            heading: None,
            position: Position::ZERO,
            step_count: 0,
            config,
        }
    }

    /// Feed an accelerometer sample.
    ///
    /// Returns a movement event when a step is detected. Steps before the
    /// first heading reading cannot be placed and are dropped.
    pub fn on_accel(&mut self, sample: &AccelSample) -> Option<MovementEvent> {
        if !self.detector.on_sample(sample) {
            return None;
        }
        let Some(heading) = self.heading else {
            debug!("Step at {} ms dropped: no heading yet", sample.timestamp_ms);
            return None;
        };

        self.step_count += 1;
        let direction = heading_to_vector(heading);
        let stride = self.config.step_length_cm;
        self.position = Position::new(
            self.position.x + direction.x * stride,
            self.position.y + direction.y * stride,
        );
        trace!(
            "Step {} heading={:.1} -> ({:.1}, {:.1})",
            self.step_count, heading, self.position.x, self.position.y
        );

        Some(self.event(heading, sample.timestamp_ms))
    }

    /// Feed a magnetometer sample; returns the smoothed heading
    pub fn on_magnetometer(&mut self, sample: &MagSample) -> Option<f64> {
        if let Some(raw) = heading_from_magnetometer(sample) {
            self.heading = self.filter.push(raw);
        }
        self.heading
    }

    /// Use a heading from a platform compass directly (no smoothing).
    ///
    /// Non-finite headings are ignored.
    pub fn set_heading(&mut self, heading_deg: f64) {
        if heading_deg.is_finite() {
            self.heading = Some(normalize_degrees(heading_deg));
        }
    }

    /// Move by an explicit offset (cm), e.g. from a manual "I moved" input.
    ///
    /// Returns `None` for a zero or non-finite offset.
    pub fn manual_move(&mut self, dx: f64, dy: f64, timestamp_ms: u64) -> Option<MovementEvent> {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return None;
        }
        // Screen convention: north is -y
        let heading = normalize_degrees(dx.atan2(-dy).to_degrees());
        self.position = Position::new(self.position.x + dx, self.position.y + dy);
        debug!(
            "Manual move ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            dx, dy, self.position.x, self.position.y
        );
        Some(self.event(heading, timestamp_ms))
    }

    fn event(&self, heading: f64, timestamp_ms: u64) -> MovementEvent {
        MovementEvent {
            // heading is finite and normalized on every path that reaches here
            octant: Octant::from_heading(heading).unwrap_or(Octant::N),
            heading_deg: heading,
            new_position: self.position,
            step_index: self.step_count,
            timestamp_ms,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Current heading, if any reading arrived
    pub fn heading(&self) -> Option<f64> {
        self.heading
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Return to the origin and forget heading and step state
    pub fn reset(&mut self) {
        self.detector.reset();
        self.filter.reset();
        self.heading = None;
        self.position = Position::ZERO;
        self.step_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(tracker: &mut DeadReckoningTracker, t: u64) -> Option<MovementEvent> {
        // either edge of the 1.0 g / 2.5 g swing can complete the step
        let low = tracker.on_accel(&AccelSample::new(0.0, 0.0, 1.0, t));
        let high = tracker.on_accel(&AccelSample::new(0.0, 0.0, 2.5, t + 50));
        low.or(high)
    }

    #[test]
    fn test_step_north_moves_negative_y() {
        let mut tracker = DeadReckoningTracker::default();
        tracker.set_heading(0.0);
        let event = step(&mut tracker, 0).unwrap();
        assert_eq!(event.octant, Octant::N);
        assert_eq!(event.step_index, 1);
        assert!(event.new_position.x.abs() < 1e-9);
        assert!((event.new_position.y + 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_steps_accumulate() {
        let mut tracker = DeadReckoningTracker::default();
        tracker.set_heading(90.0);
        step(&mut tracker, 0).unwrap();
        step(&mut tracker, 1_000).unwrap();
        assert_eq!(tracker.step_count(), 2);
        assert!((tracker.position().x - 130.0).abs() < 1e-9);
        assert!(tracker.position().y.abs() < 1e-9);
    }

    #[test]
    fn test_step_without_heading_is_dropped() {
        let mut tracker = DeadReckoningTracker::default();
        assert!(step(&mut tracker, 0).is_none());
        assert_eq!(tracker.step_count(), 0);
        assert_eq!(tracker.position(), Position::ZERO);
    }

    #[test]
    fn test_magnetometer_heading() {
        let mut tracker = DeadReckoningTracker::default();
        let heading = tracker
            .on_magnetometer(&MagSample::new(1.0, 1.0, 0.0, 0))
            .unwrap();
        assert!((heading - 45.0).abs() < 1e-9);
        let event = step(&mut tracker, 0).unwrap();
        assert_eq!(event.octant, Octant::NE);
    }

    #[test]
    fn test_manual_move() {
        let mut tracker = DeadReckoningTracker::default();
        let event = tracker.manual_move(0.0, 100.0, 5).unwrap();
        assert_eq!(event.octant, Octant::S);
        assert_eq!(tracker.position(), Position::new(0.0, 100.0));
        assert!(tracker.manual_move(0.0, 0.0, 6).is_none());
        assert!(tracker.manual_move(f64::NAN, 1.0, 7).is_none());
    }

    #[test]
    fn test_reset() {
        let mut tracker = DeadReckoningTracker::default();
        tracker.set_heading(180.0);
        step(&mut tracker, 0);
        tracker.reset();
        assert_eq!(tracker.position(), Position::ZERO);
        assert_eq!(tracker.step_count(), 0);
        assert_eq!(tracker.heading(), None);
    }
}
