//! Inclusive rectangular grid bounds.

use serde::{Deserialize, Serialize};

use crate::core::GridCoord;

/// Inclusive bounding box in grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min: GridCoord,
    pub max: GridCoord,
}

impl GridBounds {
    /// Bounds of a single cell
    pub fn at(coord: GridCoord) -> Self {
        Self {
            min: coord,
            max: coord,
        }
    }

    /// Smallest bounds containing every coordinate, `None` if empty
    pub fn from_coords<I: IntoIterator<Item = GridCoord>>(coords: I) -> Option<Self> {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::at(first), |b, c| b.including(c)))
    }

    /// Grow to include a coordinate
    pub fn including(self, coord: GridCoord) -> Self {
        Self {
            min: GridCoord::new(self.min.x.min(coord.x), self.min.y.min(coord.y)),
            max: GridCoord::new(self.max.x.max(coord.x), self.max.y.max(coord.y)),
        }
    }

    #[inline]
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= self.min.x && coord.x <= self.max.x && coord.y >= self.min.y && coord.y <= self.max.y
    }

    /// Columns
    #[inline]
    pub fn width(&self) -> usize {
        span(self.min.x, self.max.x)
    }

    /// Rows
    #[inline]
    pub fn height(&self) -> usize {
        span(self.min.y, self.max.y)
    }

    /// Cell count, saturating at `usize::MAX`
    #[inline]
    pub fn area(&self) -> usize {
        self.width().saturating_mul(self.height())
    }
}

fn span(min: i32, max: i32) -> usize {
    usize::try_from(i64::from(max) - i64::from(min) + 1).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_coords() {
        let bounds = GridBounds::from_coords([
            GridCoord::new(2, -1),
            GridCoord::new(-3, 4),
            GridCoord::new(0, 0),
        ])
        .unwrap();
        assert_eq!(bounds.min, GridCoord::new(-3, -1));
        assert_eq!(bounds.max, GridCoord::new(2, 4));
        assert_eq!(bounds.width(), 6);
        assert_eq!(bounds.height(), 6);
        assert!(bounds.contains(GridCoord::new(0, 3)));
        assert!(!bounds.contains(GridCoord::new(3, 0)));
        assert!(GridBounds::from_coords(std::iter::empty()).is_none());
    }

    #[test]
    fn test_full_index_range() {
        let bounds = GridBounds::from_coords([
            GridCoord::new(i32::MIN, i32::MIN),
            GridCoord::new(i32::MAX, i32::MAX),
        ])
        .unwrap();
        assert_eq!(bounds.width() as u64, 1u64 << 32);
        assert_eq!(bounds.area(), (1usize << 32).saturating_mul(1usize << 32));
    }
}
