//! Rendering snapshots, statistics and export/import records.
//!
//! The engine performs no I/O: [`HeatMapExport`] is a plain serde record
//! handed to whatever persistence the host application uses.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::HeatMapConfig;
use crate::core::GridCoord;

use super::bounds::GridBounds;
use super::cell::{CellStatus, GridCell};
use super::grid::HeatMapGrid;

/// Import validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    #[error("Invalid cell size: {0}")]
    InvalidCellSize(f64),

    #[error("Cell ({x},{y}) has no readings")]
    EmptyCell { x: i32, y: i32 },

    #[error("Cell ({x},{y}) has {count} readings, limit is {max}")]
    TooManyReadings {
        x: i32,
        y: i32,
        count: usize,
        max: usize,
    },

    #[error("Cell ({x},{y}) contains a non-finite reading")]
    InvalidReading { x: i32, y: i32 },

    #[error("Cell ({x},{y}) appears more than once")]
    DuplicateCell { x: i32, y: i32 },

    #[error("Coordinate ({x},{y}) is outside the grid index range")]
    CoordinateOutOfRange { x: i32, y: i32 },
}

/// Cell counts by status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatMapStatistics {
    pub total_cells: usize,
    pub clear: usize,
    pub unstable: usize,
    pub obstacle: usize,
    pub unknown: usize,
    /// Mean of per-cell averages over cells with data
    pub mean_signal: Option<f64>,
    /// Populated cells / bounding box area, in [0, 1]
    pub coverage: f64,
}

/// One rendered cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotCell {
    pub status: CellStatus,
    pub avg_signal: Option<f64>,
    pub is_rescuer: bool,
    pub is_victim: bool,
}

/// Dense rows × cols view for rendering.
///
/// Row `r`, column `c` is grid cell `(bounds.min.x + c, bounds.min.y + r)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// `None` for an empty map without markers
    pub bounds: Option<GridBounds>,
    pub rows: Vec<Vec<SnapshotCell>>,
    pub rescuer: Option<GridCoord>,
    pub victim: Option<GridCoord>,
}

impl GridSnapshot {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Cell at a grid coordinate, if inside the snapshot
    pub fn get(&self, coord: GridCoord) -> Option<&SnapshotCell> {
        let bounds = self.bounds?;
        if !bounds.contains(coord) {
            return None;
        }
        let row = (coord.y - bounds.min.y) as usize;
        let col = (coord.x - bounds.min.x) as usize;
        self.rows.get(row)?.get(col)
    }
}

/// Serializable heat map record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeatMapExport {
    pub cell_size: f64,
    pub bounds: Option<GridBounds>,
    /// Sorted by (y, x)
    pub cells: Vec<GridCell>,
    pub statistics: HeatMapStatistics,
    #[serde(default)]
    pub rescuer: Option<GridCoord>,
    #[serde(default)]
    pub victim: Option<GridCoord>,
}

impl HeatMapGrid {
    /// Counts per status, mean signal and coverage
    pub fn statistics(&self) -> HeatMapStatistics {
        let mut stats = HeatMapStatistics::default();
        let mut signal_sum = 0.0;
        let mut signal_count = 0usize;

        for cell in self.cells() {
            stats.total_cells += 1;
            match cell.status {
                CellStatus::Clear => stats.clear += 1,
                CellStatus::Unstable => stats.unstable += 1,
                CellStatus::Obstacle => stats.obstacle += 1,
                CellStatus::Unknown => stats.unknown += 1,
            }
            if let Some(avg) = cell.avg_signal {
                signal_sum += avg;
                signal_count += 1;
            }
        }

        if signal_count > 0 {
            stats.mean_signal = Some(signal_sum / signal_count as f64);
        }
        if let Some(bounds) = self.bounds() {
            stats.coverage = stats.total_cells as f64 / bounds.area() as f64;
        }
        stats
    }

    /// Dense view over populated cells and both markers
    pub fn snapshot(&self) -> GridSnapshot {
        let rescuer = self.rescuer_cell();
        let victim = self.victim_cell();
        let bounds = GridBounds::from_coords(
            self.cells()
                .map(GridCell::coord)
                .chain(rescuer)
                .chain(victim),
        );

        let rows = match bounds {
            None => Vec::new(),
            Some(b) => (b.min.y..=b.max.y)
                .map(|y| {
                    (b.min.x..=b.max.x)
                        .map(|x| {
                            let coord = GridCoord::new(x, y);
                            let cell = self.cell(coord);
                            SnapshotCell {
                                status: cell.map_or(CellStatus::Unknown, |c| c.status),
                                avg_signal: cell.and_then(|c| c.avg_signal),
                                is_rescuer: rescuer == Some(coord),
                                is_victim: victim == Some(coord),
                            }
                        })
                        .collect()
                })
                .collect(),
        };

        GridSnapshot {
            bounds,
            rows,
            rescuer,
            victim,
        }
    }

    /// Serializable copy of the whole map
    pub fn export(&self) -> HeatMapExport {
        let mut cells: Vec<GridCell> = self.cells().cloned().collect();
        cells.sort_by_key(|c| (c.y, c.x));
        HeatMapExport {
            cell_size: self.cell_size(),
            bounds: self.bounds(),
            cells,
            statistics: self.statistics(),
            rescuer: self.rescuer_cell(),
            victim: self.victim_cell(),
        }
    }

    /// Rebuild a map from an export.
    ///
    /// The export's cell size overrides the config. Averages and statuses are
    /// recomputed from the readings; the exported ones are not trusted.
    pub fn import(export: HeatMapExport, mut config: HeatMapConfig) -> Result<Self, SnapshotError> {
        if !(export.cell_size.is_finite() && export.cell_size > 0.0) {
            return Err(SnapshotError::InvalidCellSize(export.cell_size));
        }
        config.cell_size_cm = export.cell_size;
        let max = config.max_readings_per_cell;

        let markers = [export.rescuer, export.victim];
        if let Some(far) = markers.into_iter().flatten().find(|c| !c.in_range()) {
            return Err(SnapshotError::CoordinateOutOfRange { x: far.x, y: far.y });
        }

        let mut grid = HeatMapGrid::new(config);
        for mut cell in export.cells {
            let (x, y) = (cell.x, cell.y);
            if !cell.coord().in_range() {
                return Err(SnapshotError::CoordinateOutOfRange { x, y });
            }
            if cell.readings.is_empty() {
                return Err(SnapshotError::EmptyCell { x, y });
            }
            if cell.readings.len() > max {
                return Err(SnapshotError::TooManyReadings {
                    x,
                    y,
                    count: cell.readings.len(),
                    max,
                });
            }
            if cell.readings.iter().any(|r| !r.is_finite()) {
                return Err(SnapshotError::InvalidReading { x, y });
            }
            if grid.cell(cell.coord()).is_some() {
                return Err(SnapshotError::DuplicateCell { x, y });
            }
            cell.reclassify(grid.config());
            grid.insert_cell(cell);
        }
        grid.set_markers(export.rescuer, export.victim);
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorldPoint;

    fn sample_grid() -> HeatMapGrid {
        let mut grid = HeatMapGrid::default();
        grid.record_reading(WorldPoint::new(50.0, 50.0), -60.0, 0);
        grid.record_reading(WorldPoint::new(250.0, 50.0), -95.0, 1);
        grid.record_reading(WorldPoint::new(250.0, 150.0), -80.0, 2);
        grid
    }

    #[test]
    fn test_statistics() {
        let stats = sample_grid().statistics();
        assert_eq!(stats.total_cells, 3);
        assert_eq!(stats.clear, 1);
        assert_eq!(stats.obstacle, 1);
        assert_eq!(stats.unstable, 1);
        assert!((stats.mean_signal.unwrap() - -235.0 / 3.0).abs() < 1e-9);
        // 3 populated of a 3 × 2 box
        assert!((stats.coverage - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_statistics_empty() {
        let stats = HeatMapGrid::default().statistics();
        assert_eq!(stats.total_cells, 0);
        assert_eq!(stats.mean_signal, None);
        assert_eq!(stats.coverage, 0.0);
    }

    #[test]
    fn test_snapshot_dense_with_markers() {
        let mut grid = sample_grid();
        grid.set_victim_position(WorldPoint::new(450.0, 150.0));
        let snapshot = grid.snapshot();

        assert_eq!(snapshot.row_count(), 2);
        assert_eq!(snapshot.col_count(), 5);
        assert_eq!(snapshot.get(GridCoord::new(1, 0)).unwrap().status, CellStatus::Unknown);
        assert_eq!(snapshot.get(GridCoord::new(2, 0)).unwrap().status, CellStatus::Obstacle);
        // last reading put the rescuer at (2, 1)
        assert!(snapshot.get(GridCoord::new(2, 1)).unwrap().is_rescuer);
        assert!(snapshot.get(GridCoord::new(4, 1)).unwrap().is_victim);
        assert!(snapshot.get(GridCoord::new(5, 1)).is_none());
    }

    #[test]
    fn test_snapshot_empty() {
        let snapshot = HeatMapGrid::default().snapshot();
        assert!(snapshot.bounds.is_none());
        assert_eq!(snapshot.row_count(), 0);
        assert_eq!(snapshot.col_count(), 0);
    }

    #[test]
    fn test_export_import_rebuilds_derived_fields() {
        let grid = sample_grid();
        let mut export = grid.export();
        // tamper with derived fields; import recomputes them
        for cell in &mut export.cells {
            cell.status = CellStatus::Unknown;
            cell.avg_signal = None;
        }
        let restored = HeatMapGrid::import(export, HeatMapConfig::default()).unwrap();
        assert_eq!(restored.len(), 3);
        assert_eq!(restored.status_at(GridCoord::new(2, 0)), CellStatus::Obstacle);
        assert_eq!(restored.statistics(), grid.statistics());
        assert_eq!(restored.rescuer_cell(), grid.rescuer_cell());
    }

    #[test]
    fn test_export_is_serde_friendly() {
        let export = sample_grid().export();
        let yaml = serde_yaml::to_string(&export).unwrap();
        let parsed: HeatMapExport = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, export);
    }

    #[test]
    fn test_import_rejects_bad_records() {
        let grid = sample_grid();

        let mut export = grid.export();
        export.cell_size = 0.0;
        assert_eq!(
            HeatMapGrid::import(export, HeatMapConfig::default()).unwrap_err(),
            SnapshotError::InvalidCellSize(0.0)
        );

        let mut export = grid.export();
        export.cells[0].readings.clear();
        assert!(matches!(
            HeatMapGrid::import(export, HeatMapConfig::default()),
            Err(SnapshotError::EmptyCell { .. })
        ));

        let mut export = grid.export();
        export.cells[0].readings = std::iter::repeat(-60.0).take(21).collect();
        assert!(matches!(
            HeatMapGrid::import(export, HeatMapConfig::default()),
            Err(SnapshotError::TooManyReadings { count: 21, max: 20, .. })
        ));

        let mut export = grid.export();
        let dup = export.cells[0].clone();
        export.cells.push(dup);
        assert!(matches!(
            HeatMapGrid::import(export, HeatMapConfig::default()),
            Err(SnapshotError::DuplicateCell { .. })
        ));
    }

    #[test]
    fn test_import_rejects_far_coordinates() {
        let grid = sample_grid();

        let mut export = grid.export();
        export.cells[0].x = i32::MAX;
        assert_eq!(
            HeatMapGrid::import(export, HeatMapConfig::default()).unwrap_err(),
            SnapshotError::CoordinateOutOfRange { x: i32::MAX, y: 0 }
        );

        let mut export = grid.export();
        export.victim = Some(GridCoord::new(0, i32::MIN));
        assert_eq!(
            HeatMapGrid::import(export, HeatMapConfig::default()).unwrap_err(),
            SnapshotError::CoordinateOutOfRange { x: 0, y: i32::MIN }
        );

        // the edge of the range is still accepted
        let mut export = grid.export();
        export.rescuer = Some(GridCoord::new(GridCoord::LIMIT, -GridCoord::LIMIT));
        assert!(HeatMapGrid::import(export, HeatMapConfig::default()).is_ok());
    }
}
