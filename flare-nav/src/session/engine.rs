//! Per-target navigation engine.

use std::collections::VecDeque;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::config::NavConfig;
use crate::core::{AccelSample, MagSample, Position, SignalSample, WorldPoint};
use crate::direction::{CalibrationProgress, DirectionEstimator};
use crate::guidance::{HotColdGuide, HotColdState, NavigationGuidance};
use crate::heatmap::{GridSnapshot, HeatMapGrid, PathResult};
use crate::signal::{SignalHistory, SignalModel, SignalSmoother, TimedRssi, UNKNOWN_DISTANCE};
use crate::tracking::{DeadReckoningTracker, MovementEvent};
use crate::trilateration::{Anchor, trilaterate, trilaterate_least_squares};

use super::epoch::SessionEpoch;
use super::planner::{PlanOutcome, PlanRequest};

/// Direction-finding state of the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    #[default]
    NoTarget,
    /// Rotating to find the strongest sector
    Calibrating,
    /// Bearing resolved
    Calibrated,
}

/// A step whose signal change has not been scored yet.
#[derive(Clone, Copy, Debug)]
struct PendingStep {
    event: MovementEvent,
    /// Accepted readings since the step
    readings: usize,
}

/// One navigation session: every component for the active target.
///
/// All inputs go through `&mut self` methods, so a single owner serializes
/// them. Wrap in [`SharedSession`](super::SharedSession) when callbacks
/// arrive from several threads.
///
/// A step is scored by the hot/cold guide only after
/// `session.settle_readings` readings at the new position, or when the next
/// step arrives, whichever comes first. A step followed by no reading at all
/// is never scored.
pub struct NavigationSession {
    config: NavConfig,
    model: SignalModel,
    smoother: SignalSmoother,
    history: SignalHistory,
    direction: DirectionEstimator,
    tracker: DeadReckoningTracker,
    guide: HotColdGuide,
    heatmap: HeatMapGrid,
    anchors: VecDeque<Anchor>,
    target: Option<String>,
    state: EngineState,
    recording: bool,
    heading: Option<f64>,
    last_timestamp_ms: u64,
    last_path: Option<PathResult>,
    pending_step: Option<PendingStep>,
    epoch: SessionEpoch,
    /// Anything changed since the last reset
    dirty: bool,
}

impl Default for NavigationSession {
    fn default() -> Self {
        Self::new(NavConfig::default())
    }
}

impl NavigationSession {
    pub fn new(config: NavConfig) -> Self {
        Self {
            model: SignalModel::from_config(&config.signal),
            smoother: SignalSmoother::new(config.signal.ema_alpha),
            history: SignalHistory::new(config.signal.history_len),
            direction: DirectionEstimator::new(&config.calibration),
            tracker: DeadReckoningTracker::new(config.tracking.clone()),
            guide: HotColdGuide::new(config.guidance.clone()),
            heatmap: HeatMapGrid::new(config.heatmap.clone()),
            anchors: VecDeque::with_capacity(config.session.max_anchors),
            target: None,
            state: EngineState::NoTarget,
            recording: config.session.record_heatmap,
            heading: None,
            last_timestamp_ms: 0,
            last_path: None,
            pending_step: None,
            epoch: SessionEpoch::default(),
            dirty: false,
            config,
        }
    }

    // ------------------------------------------------------------------
    // Target lifecycle
    // ------------------------------------------------------------------

    /// Start tracking a beacon. Clears per-target state and begins calibration.
    pub fn set_target(&mut self, id: impl Into<String>) -> SessionEpoch {
        let id = id.into();
        self.clear_target_state();
        info!("Tracking target {} (session {})", id, self.epoch.next());
        self.target = Some(id);
        self.state = EngineState::Calibrating;
        self.epoch = self.epoch.next();
        self.dirty = true;
        self.epoch
    }

    /// Stop tracking. Position and heading are kept.
    pub fn clear_target(&mut self) -> SessionEpoch {
        if self.target.is_none() {
            return self.epoch;
        }
        info!("Target cleared");
        self.clear_target_state();
        self.target = None;
        self.state = EngineState::NoTarget;
        self.epoch = self.epoch.next();
        self.dirty = true;
        self.epoch
    }

    /// Return to a fresh session. Calling it again has no further effect.
    pub fn reset(&mut self) -> SessionEpoch {
        if !self.dirty {
            return self.epoch;
        }
        self.clear_target_state();
        self.target = None;
        self.state = EngineState::NoTarget;
        self.tracker.reset();
        self.heading = None;
        self.recording = self.config.session.record_heatmap;
        self.last_timestamp_ms = 0;
        self.epoch = self.epoch.next();
        self.dirty = false;
        info!("Session reset ({})", self.epoch);
        self.epoch
    }

    fn clear_target_state(&mut self) {
        self.smoother.reset();
        self.history.clear();
        self.direction.reset();
        self.guide.reset();
        self.heatmap.clear();
        self.anchors.clear();
        self.last_path = None;
        self.pending_step = None;
    }

    /// Restart direction calibration for the current target
    pub fn start_calibration(&mut self) {
        if self.target.is_none() {
            return;
        }
        self.direction.reset();
        self.state = EngineState::Calibrating;
        self.dirty = true;
        debug!("Calibration restarted");
    }

    /// Enable or disable heat map recording
    pub fn set_recording(&mut self, enabled: bool) {
        self.recording = enabled;
        self.dirty = true;
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    /// Feed one RSSI reading. Returns the smoothed value.
    ///
    /// Ignored without a target.
    pub fn on_rssi(&mut self, sample: SignalSample) -> Option<f64> {
        if self.target.is_none() {
            trace!("RSSI ignored: no target");
            return None;
        }
        if !sample.is_finite() {
            return self.smoother.value();
        }
        self.last_timestamp_ms = self.last_timestamp_ms.max(sample.timestamp_ms);

        let smoothed = self.smoother.push(sample.rssi)?;
        self.history.push(TimedRssi::new(sample.rssi, sample.timestamp_ms));

        if self.state == EngineState::Calibrating {
            if let Some(heading) = self.heading {
                self.direction.record_sample(heading, smoothed);
            }
            if self.direction.is_calibrated() && self.direction.resolve().is_some() {
                self.state = EngineState::Calibrated;
            }
        }

        if self.recording {
            // a tagged reading is filed where it was taken; the marker follows the tracker
            match sample.position {
                Some(coord) => self.heatmap.record_at(coord, sample.rssi, sample.timestamp_ms),
                None => self
                    .heatmap
                    .record_reading(self.tracker.position(), sample.rssi, sample.timestamp_ms),
            };
        }

        if let Some(pending) = self.pending_step.as_mut() {
            pending.readings += 1;
            if pending.readings >= self.config.session.settle_readings {
                self.score_pending_step();
            }
        }

        self.collect_anchor(smoothed);
        Some(smoothed)
    }

    /// Feed a compass heading (degrees). Ignored without a target.
    pub fn on_heading(&mut self, heading_deg: f64, timestamp_ms: u64) {
        if self.target.is_none() || !heading_deg.is_finite() {
            return;
        }
        self.tracker.set_heading(heading_deg);
        self.heading = self.tracker.heading();
        self.last_timestamp_ms = self.last_timestamp_ms.max(timestamp_ms);
    }

    /// Feed a magnetometer sample. Returns the smoothed heading.
    pub fn on_magnetometer(&mut self, sample: &MagSample) -> Option<f64> {
        if self.target.is_none() {
            return None;
        }
        self.heading = self.tracker.on_magnetometer(sample);
        self.heading
    }

    /// Feed an accelerometer sample. Returns the movement if a step fired.
    pub fn on_accel(&mut self, sample: &AccelSample) -> Option<MovementEvent> {
        if self.target.is_none() {
            return None;
        }
        let event = self.tracker.on_accel(sample)?;
        self.apply_movement(&event);
        Some(event)
    }

    /// Move by an explicit offset (cm)
    pub fn manual_move(&mut self, dx: f64, dy: f64, timestamp_ms: u64) -> Option<MovementEvent> {
        if self.target.is_none() {
            return None;
        }
        let event = self.tracker.manual_move(dx, dy, timestamp_ms)?;
        self.apply_movement(&event);
        Some(event)
    }

    fn apply_movement(&mut self, event: &MovementEvent) {
        self.last_timestamp_ms = self.last_timestamp_ms.max(event.timestamp_ms);
        self.heatmap.set_rescuer_position(event.new_position);

        match self.pending_step {
            Some(pending) if pending.readings > 0 => self.score_pending_step(),
            Some(pending) => trace!(
                "Step {} toward {} dropped: no reading before the next step",
                pending.event.step_index,
                pending.event.octant
            ),
            None => {}
        }
        self.pending_step = Some(PendingStep {
            event: *event,
            readings: 0,
        });
    }

    /// Score the pending step against the signal measured after it
    fn score_pending_step(&mut self) {
        let Some(pending) = self.pending_step.take() else {
            return;
        };
        let Some(rssi) = self.smoother.value() else {
            return;
        };
        let event = pending.event;
        let state = self.guide.record_movement(event.octant, event.new_position, rssi);
        trace!(
            "Step {} toward {} scored at {:.1} dBm after {} readings: {:?}",
            event.step_index,
            event.octant,
            rssi,
            pending.readings,
            state
        );
    }

    /// Track a position-tagged distance.
    ///
    /// Within the separation radius of an existing anchor the newest estimate
    /// replaces that anchor's distance, so a stop converges as the smoother
    /// settles. Otherwise a new anchor is added, evicting the oldest when full.
    fn collect_anchor(&mut self, smoothed_rssi: f64) {
        let distance_cm = self.model.distance_cm(smoothed_rssi);
        if distance_cm >= UNKNOWN_DISTANCE * 100.0 {
            return;
        }
        let position = self.tracker.position();
        let min_sep = self.config.session.min_anchor_separation_cm;

        if let Some(anchor) = self
            .anchors
            .iter_mut()
            .find(|a| a.position().distance(&position) < min_sep)
        {
            anchor.distance = distance_cm;
            return;
        }

        if self.anchors.len() >= self.config.session.max_anchors {
            self.anchors.pop_front();
        }
        self.anchors.push_back(Anchor::at(position, distance_cm));
        trace!(
            "Anchor at ({:.0}, {:.0}) distance {:.0} cm ({} kept)",
            position.x,
            position.y,
            distance_cm,
            self.anchors.len()
        );
    }

    // ------------------------------------------------------------------
    // Outputs
    // ------------------------------------------------------------------

    /// Guidance for the current target
    pub fn guidance(&self) -> NavigationGuidance {
        let rssi = self.smoother.value();
        let distance = rssi.map(|r| self.model.distance(r));
        self.guide.guidance(distance, rssi)
    }

    pub fn calibration_progress(&self) -> CalibrationProgress {
        self.direction.calibration_progress()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        self.heatmap.snapshot()
    }

    /// A* from the rescuer to the victim cell, computed now
    pub fn suggested_path(&self) -> Option<PathResult> {
        self.heatmap.suggested_path()
    }

    /// Set a known victim position (e.g. reported by the victim's device)
    pub fn set_victim_position(&mut self, point: WorldPoint) {
        self.heatmap.set_victim_position(point);
        self.dirty = true;
    }

    /// Trilaterate the victim from collected anchors.
    ///
    /// On success the victim marker in the heat map moves there.
    pub fn estimate_victim_position(&mut self) -> Option<WorldPoint> {
        let anchors = self.anchors.make_contiguous();
        let estimate = if self.config.session.use_least_squares {
            trilaterate_least_squares(anchors)
        } else {
            trilaterate(anchors)
        }?;
        self.heatmap.set_victim_position(estimate);
        debug!("Victim estimate ({:.0}, {:.0})", estimate.x, estimate.y);
        Some(estimate)
    }

    /// Half-life weighted RSSI relative to the newest input
    pub fn weighted_rssi(&mut self) -> Option<f64> {
        let now = self.last_timestamp_ms;
        self.history.weighted(now, self.config.signal.half_life_seconds)
    }

    /// Work item for the background planner, if both markers are known
    pub fn plan_request(&self, requested_at_ms: u64) -> Option<PlanRequest> {
        let start = self.heatmap.rescuer_cell()?;
        let goal = self.heatmap.victim_cell()?;
        Some(PlanRequest {
            epoch: self.epoch,
            grid: self.heatmap.clone(),
            start,
            goal,
            requested_at_ms,
        })
    }

    /// Store a planner result. Results from an older epoch are discarded.
    pub fn apply_plan(&mut self, outcome: PlanOutcome) -> bool {
        if outcome.epoch != self.epoch {
            debug!(
                "Discarding plan from {} (current {})",
                outcome.epoch, self.epoch
            );
            return false;
        }
        self.last_path = outcome.path;
        true
    }

    /// Most recent background planner result
    pub fn last_path(&self) -> Option<&PathResult> {
        self.last_path.as_ref()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    pub fn engine_state(&self) -> EngineState {
        self.state
    }

    pub fn hot_cold_state(&self) -> HotColdState {
        self.guide.state()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn position(&self) -> Position {
        self.tracker.position()
    }

    pub fn heading(&self) -> Option<f64> {
        self.heading
    }

    pub fn smoothed_rssi(&self) -> Option<f64> {
        self.smoother.value()
    }

    /// Smoothed distance estimate in meters
    pub fn distance_meters(&self) -> Option<f64> {
        self.smoother.value().map(|r| self.model.distance(r))
    }

    pub fn anchors(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter()
    }

    pub fn heatmap(&self) -> &HeatMapGrid {
        &self.heatmap
    }

    pub fn direction(&self) -> &DirectionEstimator {
        &self.direction
    }

    pub fn guide(&self) -> &HotColdGuide {
        &self.guide
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }
}
