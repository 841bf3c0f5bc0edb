//! Compass octants and heading helpers.
//!
//! Headings are compass degrees: 0° = north, 90° = east, clockwise positive.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::WorldPoint;

/// One of the eight 45° compass partitions.
///
/// Discriminants double as array indices for per-direction state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Octant {
    /// North
    N = 0,
    /// North-east
    NE = 1,
    /// East
    E = 2,
    /// South-east
    SE = 3,
    /// South
    S = 4,
    /// South-west
    SW = 5,
    /// West
    W = 6,
    /// North-west
    NW = 7,
}

impl Octant {
    /// Number of octants
    pub const COUNT: usize = 8;

    /// All octants in index order
    pub const ALL: [Octant; 8] = [
        Octant::N,
        Octant::NE,
        Octant::E,
        Octant::SE,
        Octant::S,
        Octant::SW,
        Octant::W,
        Octant::NW,
    ];

    /// Array index of this octant
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Octant for an index (wraps modulo 8)
    #[inline]
    pub fn from_index(index: usize) -> Octant {
        Self::ALL[index % Self::COUNT]
    }

    /// Octant centered on a compass heading (N covers 337.5°..22.5°).
    ///
    /// Returns `None` for non-finite headings.
    pub fn from_heading(heading_deg: f64) -> Option<Octant> {
        if !heading_deg.is_finite() {
            return None;
        }
        let shifted = normalize_degrees(heading_deg + 22.5);
        Some(Self::from_index((shifted / 45.0).floor() as usize))
    }

    /// Center bearing of this octant in degrees
    #[inline]
    pub fn bearing(self) -> f64 {
        self.index() as f64 * 45.0
    }

    /// The opposite direction
    #[inline]
    pub fn opposite(self) -> Octant {
        Self::from_index(self.index() + 4)
    }

    /// Short compass label ("N", "NE", ...)
    pub fn label(self) -> &'static str {
        match self {
            Octant::N => "N",
            Octant::NE => "NE",
            Octant::E => "E",
            Octant::SE => "SE",
            Octant::S => "S",
            Octant::SW => "SW",
            Octant::W => "W",
            Octant::NW => "NW",
        }
    }

    /// Spoken name for guidance messages
    pub fn name(self) -> &'static str {
        match self {
            Octant::N => "north",
            Octant::NE => "north-east",
            Octant::E => "east",
            Octant::SE => "south-east",
            Octant::S => "south",
            Octant::SW => "south-west",
            Octant::W => "west",
            Octant::NW => "north-west",
        }
    }
}

impl fmt::Display for Octant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalize a heading to [0, 360).
#[inline]
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit movement vector for a compass heading in screen coordinates.
///
/// 0° (north) maps to (0, -1), 90° (east) to (1, 0).
#[inline]
pub fn heading_to_vector(heading_deg: f64) -> WorldPoint {
    let rad = heading_deg.to_radians();
    WorldPoint::new(rad.sin(), -rad.cos())
}

/// Circular mean of headings in degrees, in [0, 360).
///
/// Returns `None` for an empty slice or when the headings cancel out.
pub fn circular_mean_degrees(headings: &[f64]) -> Option<f64> {
    if headings.is_empty() {
        return None;
    }
    let (sin_sum, cos_sum) = headings.iter().fold((0.0, 0.0), |(s, c), h| {
        let rad = h.to_radians();
        (s + rad.sin(), c + rad.cos())
    });
    if sin_sum.abs() < 1e-12 && cos_sum.abs() < 1e-12 {
        return None;
    }
    Some(normalize_degrees(sin_sum.atan2(cos_sum).to_degrees()))
}
