//! Sparse heat map storage.

use std::collections::HashMap;

use log::{debug, trace};

use crate::config::HeatMapConfig;
use crate::core::{GridCoord, WorldPoint};

use super::astar::{PathPlanner, PathResult};
use super::bounds::GridBounds;
use super::cell::{CellStatus, GridCell};

/// Sparse grid of signal readings keyed by cell coordinate.
///
/// Cells are created on the first reading that lands in them and only
/// removed by [`clear`](Self::clear). World coordinates are session-relative
/// centimeters; cell `(i, j)` covers `[i·size, (i+1)·size)` on each axis.
#[derive(Clone, Debug)]
pub struct HeatMapGrid {
    config: HeatMapConfig,
    cells: HashMap<GridCoord, GridCell>,
    rescuer: Option<GridCoord>,
    victim: Option<GridCoord>,
}

impl Default for HeatMapGrid {
    fn default() -> Self {
        Self::new(HeatMapConfig::default())
    }
}

impl HeatMapGrid {
    pub fn new(config: HeatMapConfig) -> Self {
        Self {
            config,
            cells: HashMap::new(),
            rescuer: None,
            victim: None,
        }
    }

    pub fn config(&self) -> &HeatMapConfig {
        &self.config
    }

    /// Cell edge length (world units)
    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.config.cell_size_cm
    }

    /// Cell containing a world point: `floor(x / size), floor(y / size)`.
    ///
    /// `None` for non-finite points and for points whose cell index would
    /// exceed [`GridCoord::LIMIT`].
    #[inline]
    pub fn world_to_grid(&self, point: WorldPoint) -> Option<GridCoord> {
        let size = self.cell_size();
        let limit = f64::from(GridCoord::LIMIT);
        let x = (point.x / size).floor();
        let y = (point.y / size).floor();
        if !(x.abs() <= limit && y.abs() <= limit) {
            return None;
        }
        Some(GridCoord::new(x as i32, y as i32))
    }

    /// Center of a cell in world units
    #[inline]
    pub fn grid_to_world(&self, coord: GridCoord) -> WorldPoint {
        let size = self.cell_size();
        WorldPoint::new(
            (coord.x as f64 + 0.5) * size,
            (coord.y as f64 + 0.5) * size,
        )
    }

    /// Record an RSSI reading taken at a world position.
    ///
    /// The rescuer marker moves to that cell. Returns the cell's new status,
    /// or `None` when the position is off the grid or the reading is not
    /// finite.
    pub fn record_reading(&mut self, point: WorldPoint, rssi: f64, timestamp_ms: u64) -> Option<CellStatus> {
        let Some(coord) = self.world_to_grid(point) else {
            trace!("Skipping heat map reading rssi={} at {:?}", rssi, point);
            return None;
        };
        let status = self.record_at(coord, rssi, timestamp_ms)?;
        self.rescuer = Some(coord);
        Some(status)
    }

    /// File a reading into a known cell. The rescuer marker stays put.
    pub fn record_at(&mut self, coord: GridCoord, rssi: f64, timestamp_ms: u64) -> Option<CellStatus> {
        if !rssi.is_finite() || !coord.in_range() {
            trace!("Skipping heat map reading rssi={} at {:?}", rssi, coord);
            return None;
        }

        let cell = self
            .cells
            .entry(coord)
            .or_insert_with(|| GridCell::new(coord));
        let previous = cell.status;
        cell.push(rssi, timestamp_ms, &self.config);

        if previous != cell.status {
            debug!(
                "Cell ({},{}) {:?} -> {:?} (avg {:.1})",
                coord.x,
                coord.y,
                previous,
                cell.status,
                cell.avg_signal.unwrap_or(f64::NAN)
            );
        }
        Some(cell.status)
    }

    pub fn cell(&self, coord: GridCoord) -> Option<&GridCell> {
        self.cells.get(&coord)
    }

    /// Status of a cell; unmapped cells are `Unknown`
    #[inline]
    pub fn status_at(&self, coord: GridCoord) -> CellStatus {
        self.cells.get(&coord).map_or(CellStatus::Unknown, |c| c.status)
    }

    /// Populated cells in arbitrary order
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.values()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounds of populated cells
    pub fn bounds(&self) -> Option<GridBounds> {
        GridBounds::from_coords(self.cells.keys().copied())
    }

    /// Move the rescuer marker without recording a reading
    pub fn set_rescuer_position(&mut self, point: WorldPoint) {
        if let Some(coord) = self.world_to_grid(point) {
            self.rescuer = Some(coord);
        }
    }

    pub fn rescuer_cell(&self) -> Option<GridCoord> {
        self.rescuer
    }

    /// Set the last known or estimated victim position
    pub fn set_victim_position(&mut self, point: WorldPoint) {
        if let Some(coord) = self.world_to_grid(point) {
            if self.victim != Some(coord) {
                debug!("Victim cell set to ({},{})", coord.x, coord.y);
            }
            self.victim = Some(coord);
        }
    }

    pub fn clear_victim(&mut self) {
        self.victim = None;
    }

    pub fn victim_cell(&self) -> Option<GridCoord> {
        self.victim
    }

    /// A* between two cells with the configured heuristic
    pub fn find_path(&self, start: GridCoord, goal: GridCoord) -> Option<PathResult> {
        PathPlanner::new(self).find_path(start, goal).ok()
    }

    /// Path from the rescuer cell to the victim cell.
    ///
    /// `None` without both markers or when the victim is unreachable.
    pub fn suggested_path(&self) -> Option<PathResult> {
        let start = self.rescuer?;
        let goal = self.victim?;
        self.find_path(start, goal)
    }

    /// Drop every cell and marker
    pub fn clear(&mut self) {
        self.cells.clear();
        self.rescuer = None;
        self.victim = None;
    }

    pub(super) fn insert_cell(&mut self, cell: GridCell) {
        self.cells.insert(cell.coord(), cell);
    }

    pub(super) fn set_markers(&mut self, rescuer: Option<GridCoord>, victim: Option<GridCoord>) {
        self.rescuer = rescuer;
        self.victim = victim;
    }
}
