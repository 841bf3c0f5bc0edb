//! Grid and world coordinate types.

use serde::{Deserialize, Serialize};

/// Integer cell index in the sparse heat map grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column index (may be negative)
    pub x: i32,
    /// Row index (may be negative)
    pub y: i32,
}

/// Offsets to the 8-connected neighbors, cardinal moves first.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

impl GridCoord {
    /// Largest cell index on either axis that a world point maps to.
    ///
    /// Snapshots carrying cells beyond it are rejected on import.
    pub const LIMIT: i32 = 1 << 24;

    /// Create a new grid coordinate
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True if both indices are within [`LIMIT`](Self::LIMIT)
    #[inline]
    pub fn in_range(&self) -> bool {
        self.x.unsigned_abs() <= Self::LIMIT as u32 && self.y.unsigned_abs() <= Self::LIMIT as u32
    }

    /// Cell offset by `(dx, dy)`, `None` past the end of the index range
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Option<GridCoord> {
        Some(GridCoord::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// 8-connected neighbors, cardinal before diagonal.
    ///
    /// Neighbors that would leave the `i32` index range are skipped.
    pub fn neighbors_8(self) -> impl Iterator<Item = GridCoord> {
        NEIGHBOR_OFFSETS
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy))
    }

    /// True if `other` differs from `self` on both axes
    #[inline]
    pub fn is_diagonal_to(&self, other: &GridCoord) -> bool {
        self.x != other.x && self.y != other.y
    }
}

/// A point in rescuer-centered world units (centimeters).
///
/// The origin is wherever the rescuer stood when the session started.
/// Screen convention: +x to the east, +y to the south (down on a map view),
/// so north is -y.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// East offset (cm)
    pub x: f64,
    /// South offset (cm)
    pub y: f64,
}

/// Rescuer or victim position. Same representation as [`WorldPoint`].
pub type Position = WorldPoint;

impl WorldPoint {
    /// Session origin
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    /// Create a new point
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &WorldPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
