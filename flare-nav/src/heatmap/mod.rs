//! Sparse signal heat map with obstacle-aware path search.
//!
//! Each RSSI reading is filed under the grid cell the rescuer stood in.
//! A cell's readings classify it:
//!
//! | Condition (in order) | Status |
//! |----------------------|--------|
//! | variance > 100 dB² | Unstable |
//! | mean ≥ -70 dBm | Clear |
//! | mean ≥ -85 dBm | Unstable |
//! | otherwise | Obstacle |
//!
//! A* then routes the rescuer toward the victim cell through Clear cells
//! where it can, avoiding Obstacle cells entirely.

mod astar;
mod bounds;
mod cell;
mod grid;
mod snapshot;

pub use astar::{PathFailure, PathHeuristic, PathPlanner, PathResult};
pub use bounds::GridBounds;
pub use cell::{CellStatus, Classification, GridCell, classify, classify_with};
pub use grid::HeatMapGrid;
pub use snapshot::{GridSnapshot, HeatMapExport, HeatMapStatistics, SnapshotCell, SnapshotError};
