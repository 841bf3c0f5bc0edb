//! Hot/cold state machine with per-direction obstacle inference.

use std::collections::{BTreeSet, VecDeque};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::GuidanceConfig;
use crate::core::{Octant, Position};
use crate::signal::SignalQuality;

use super::message::{MessageInputs, NavigationGuidance, compose};
use super::octant_track::{OctantReading, OctantTrack};

/// Global proximity trend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotColdState {
    /// Fewer movements than the trend window
    #[default]
    Calibrating,
    Warmer,
    Colder,
    Stable,
}

/// One entry of the global movement history.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub octant: Octant,
    pub position: Position,
    pub rssi: f64,
    pub rssi_change: f64,
}

/// Snapshot of the guide's derived state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    pub hot_cold: HotColdState,
    pub best_direction: Option<Octant>,
    pub obstacle_directions: BTreeSet<Octant>,
    /// Oldest first
    pub movement_history: Vec<MovementRecord>,
}

/// Tracks signal change per movement and turns it into guidance.
#[derive(Clone, Debug)]
pub struct HotColdGuide {
    config: GuidanceConfig,
    tracks: [OctantTrack; Octant::COUNT],
    history: VecDeque<MovementRecord>,
    prev_rssi: Option<f64>,
    state: HotColdState,
}

impl Default for HotColdGuide {
    fn default() -> Self {
        Self::new(GuidanceConfig::default())
    }
}

impl HotColdGuide {
    pub fn new(config: GuidanceConfig) -> Self {
        Self {
            history: VecDeque::with_capacity(config.history_len),
            config,
            tracks: Default::default(),
            prev_rssi: None,
            state: HotColdState::Calibrating,
        }
    }

    /// Record a movement toward `direction` ending at `new_position` with
    /// smoothed signal `rssi`.
    ///
    /// The change is measured against the previous movement's RSSI; the very
    /// first movement counts as no change. Non-finite RSSI is ignored.
    pub fn record_movement(
        &mut self,
        direction: Octant,
        new_position: Position,
        rssi: f64,
    ) -> HotColdState {
        if !rssi.is_finite() {
            return self.state;
        }

        let rssi_change = self.prev_rssi.map_or(0.0, |prev| rssi - prev);
        self.prev_rssi = Some(rssi);

        let track = &mut self.tracks[direction.index()];
        if let Some(flag) = track.record(OctantReading { rssi, rssi_change }, &self.config) {
            if flag {
                debug!(
                    "Obstacle suspected toward {} (avg change {:.1} dB)",
                    direction, track.avg_change
                );
            } else {
                debug!("Obstacle cleared toward {}", direction);
            }
        }

        if self.history.len() >= self.config.history_len {
            self.history.pop_front();
        }
        self.history.push_back(MovementRecord {
            octant: direction,
            position: new_position,
            rssi,
            rssi_change,
        });

        let next = self.compute_state();
        if next != self.state {
            debug!("Hot/cold {:?} -> {:?}", self.state, next);
            self.state = next;
        }
        trace!("Movement {} rssi={:.1} change={:+.1}", direction, rssi, rssi_change);
        self.state
    }

    /// Average change over the trend window, if it is full
    fn recent_trend(&self) -> Option<f64> {
        let window = self.config.trend_window;
        if window == 0 || self.history.len() < window {
            return None;
        }
        let sum: f64 = self
            .history
            .iter()
            .rev()
            .take(window)
            .map(|m| m.rssi_change)
            .sum();
        Some(sum / window as f64)
    }

    fn compute_state(&self) -> HotColdState {
        match self.recent_trend() {
            None => HotColdState::Calibrating,
            Some(avg) if avg > self.config.trend_threshold_db => HotColdState::Warmer,
            Some(avg) if avg < -self.config.trend_threshold_db => HotColdState::Colder,
            Some(_) => HotColdState::Stable,
        }
    }

    pub fn state(&self) -> HotColdState {
        self.state
    }

    /// Statistics for one direction
    pub fn track(&self, octant: Octant) -> &OctantTrack {
        &self.tracks[octant.index()]
    }

    /// Most promising direction.
    ///
    /// Among non-obstacle octants with enough confidence, the one with the
    /// highest average change; ties go to the lowest octant index.
    pub fn best_direction(&self) -> Option<Octant> {
        let mut best: Option<(Octant, f64)> = None;
        for octant in Octant::ALL {
            let track = &self.tracks[octant.index()];
            if track.is_obstacle || track.confidence < self.config.min_direction_confidence {
                continue;
            }
            match best {
                Some((_, avg)) if track.avg_change <= avg => {}
                _ => best = Some((octant, track.avg_change)),
            }
        }
        best.map(|(octant, _)| octant)
    }

    /// Octants currently flagged as obstacles, in index order
    pub fn obstacle_directions(&self) -> Vec<Octant> {
        Octant::ALL
            .into_iter()
            .filter(|o| self.tracks[o.index()].is_obstacle)
            .collect()
    }

    /// Movement history, oldest first
    pub fn movement_history(&self) -> impl Iterator<Item = &MovementRecord> {
        self.history.iter()
    }

    /// Snapshot of the derived state
    pub fn navigation_state(&self) -> NavigationState {
        NavigationState {
            hot_cold: self.state,
            best_direction: self.best_direction(),
            obstacle_directions: self.obstacle_directions().into_iter().collect(),
            movement_history: self.history.iter().copied().collect(),
        }
    }

    /// Build guidance for the UI.
    ///
    /// `distance_meters` enables the arrival / proximity overrides; `rssi`
    /// fills in the signal quality band.
    pub fn guidance(&self, distance_meters: Option<f64>, rssi: Option<f64>) -> NavigationGuidance {
        let obstacles = self.obstacle_directions();
        let best = self.best_direction();
        let (message, icon_hint, confidence) = compose(&MessageInputs {
            state: self.state,
            trend_db: self.recent_trend().unwrap_or(0.0),
            heading_toward: self.history.back().map(|m| m.octant),
            best,
            obstacles: &obstacles,
        });

        NavigationGuidance {
            state: self.state,
            message,
            icon_hint,
            confidence,
            distance_meters: None,
            formatted_distance: None,
            signal_quality: rssi.filter(|r| r.is_finite()).map(SignalQuality::from_rssi),
            suggested_direction: best,
            obstacle_directions: obstacles,
        }
        .with_distance(
            distance_meters,
            self.config.arrival_distance_m,
            self.config.near_distance_m,
        )
    }

    /// Forget all tracks, history and the previous RSSI
    pub fn reset(&mut self) {
        for track in &mut self.tracks {
            track.clear();
        }
        self.history.clear();
        self.prev_rssi = None;
        self.state = HotColdState::Calibrating;
    }
}
