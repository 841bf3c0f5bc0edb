//! Test utilities for flare-nav integration tests.
//!
//! Synthetic radio and motion for a rescuer walking toward a beacon.

#![allow(dead_code)]

use flare_nav::{GridCoord, HeatMapGrid, NavConfig, WorldPoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Log-distance RSSI at `distance_m` (the inverse of `distance_from_rssi`).
pub fn rssi_at(distance_m: f64, tx_power: f64, path_loss_exponent: f64) -> f64 {
    tx_power - 10.0 * path_loss_exponent * distance_m.max(0.01).log10()
}

/// Deterministic noise source.
pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0x5EED_F1A2)
}

/// Uniform noise in `[-amplitude, amplitude]`.
pub fn jitter(rng: &mut StdRng, amplitude: f64) -> f64 {
    if amplitude <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-amplitude..=amplitude)
}

/// Indoor config: steeper path loss so each meter matters.
pub fn indoor_config() -> NavConfig {
    let mut config = NavConfig::default();
    config.signal.path_loss_exponent = 3.0;
    config
}

/// World point at the center of a cell for the default 100 cm grid.
pub fn cell_center(x: i32, y: i32) -> WorldPoint {
    WorldPoint::new(x as f64 * 100.0 + 50.0, y as f64 * 100.0 + 50.0)
}

/// Record `rssi` a few times into the cell at `(x, y)`.
pub fn paint(grid: &mut HeatMapGrid, x: i32, y: i32, rssi: f64) {
    for t in 0..3 {
        grid.record_reading(cell_center(x, y), rssi, t);
    }
}

/// 3×3 grid of clear cells with the middle row blocked except `openings`.
pub fn walled_grid(openings: &[i32]) -> HeatMapGrid {
    let mut grid = HeatMapGrid::default();
    for y in 0..3 {
        for x in 0..3 {
            let blocked = y == 1 && !openings.contains(&x);
            paint(&mut grid, x, y, if blocked { -95.0 } else { -60.0 });
        }
    }
    grid
}

pub fn coord(x: i32, y: i32) -> GridCoord {
    GridCoord::new(x, y)
}
