//! Default value functions for serde deserialization.

use crate::direction::SectorLayout;
use crate::heatmap::PathHeuristic;

// Signal model

pub fn tx_power() -> f64 {
    -59.0
}

pub fn path_loss_exponent() -> f64 {
    2.0
}

pub fn ema_alpha() -> f64 {
    0.3
}

pub fn half_life_seconds() -> f64 {
    10.0
}

pub fn signal_history_len() -> usize {
    50
}

// Calibration

pub fn sector_layout() -> SectorLayout {
    SectorLayout::Octants
}

pub fn min_sectors() -> u8 {
    6
}

// Dead reckoning

pub fn step_threshold() -> f64 {
    1.15
}

pub fn step_cooldown_ms() -> u64 {
    300
}

pub fn step_length_cm() -> f64 {
    65.0
}

pub fn heading_window() -> usize {
    5
}

// Hot/cold guidance

pub fn octant_window() -> usize {
    10
}

pub fn movement_history_len() -> usize {
    50
}

pub fn trend_window() -> usize {
    3
}

pub fn trend_threshold_db() -> f64 {
    2.0
}

pub fn obstacle_threshold_db() -> f64 {
    -5.0
}

pub fn obstacle_clear_threshold_db() -> f64 {
    -2.0
}

pub fn obstacle_min_samples() -> usize {
    3
}

pub fn confidence_full_samples() -> usize {
    5
}

pub fn min_direction_confidence() -> f64 {
    0.4
}

pub fn arrival_distance_m() -> f64 {
    2.0
}

pub fn near_distance_m() -> f64 {
    5.0
}

// Heat map

pub fn cell_size_cm() -> f64 {
    100.0
}

pub fn max_readings_per_cell() -> usize {
    20
}

pub fn unstable_variance() -> f64 {
    100.0
}

pub fn clear_threshold_dbm() -> f64 {
    -70.0
}

pub fn unstable_threshold_dbm() -> f64 {
    -85.0
}

pub fn path_heuristic() -> PathHeuristic {
    PathHeuristic::Manhattan
}

pub fn max_iterations() -> usize {
    100_000
}

// Session

pub fn planner_interval_ms() -> u64 {
    2000
}

pub fn max_anchors() -> usize {
    20
}

pub fn min_anchor_separation_cm() -> f64 {
    100.0
}

pub fn settle_readings() -> usize {
    5
}

pub fn enabled() -> bool {
    true
}
