//! A* search over the heat map.
//!
//! Movement is 8-connected. Entering a cell costs by its status (Clear 1,
//! Unknown 1.5, Unstable 2); Obstacle cells are never expanded. Unmapped
//! cells count as Unknown but only inside the search domain: the bounding
//! box of populated cells, start and goal.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::f64::consts::SQRT_2;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::core::{GridCoord, WorldPoint};

use super::bounds::GridBounds;
use super::grid::HeatMapGrid;

/// Distance estimate used to guide the search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathHeuristic {
    /// |dx| + |dy| with unit diagonal cost.
    ///
    /// Overestimates on diagonal runs, so paths may be slightly longer
    /// than optimal.
    #[default]
    Manhattan,
    /// Octile distance with √2 diagonal cost. Admissible.
    Octile,
}

impl PathHeuristic {
    /// Estimated remaining cost from `from` to `to`
    #[inline]
    pub fn estimate(self, from: GridCoord, to: GridCoord) -> f64 {
        let dx = (i64::from(from.x) - i64::from(to.x)).abs() as f64;
        let dy = (i64::from(from.y) - i64::from(to.y)).abs() as f64;
        match self {
            PathHeuristic::Manhattan => dx + dy,
            PathHeuristic::Octile => {
                let min = dx.min(dy);
                let max = dx.max(dy);
                min * SQRT_2 + (max - min)
            }
        }
    }

    /// Multiplier for diagonal moves
    #[inline]
    pub fn diagonal_factor(self) -> f64 {
        match self {
            PathHeuristic::Manhattan => 1.0,
            PathHeuristic::Octile => SQRT_2,
        }
    }
}

/// A found path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// Start to goal, inclusive
    pub cells: Vec<GridCoord>,
    /// Cell centers in world units
    pub world_points: Vec<WorldPoint>,
    pub cost: f64,
    pub nodes_expanded: usize,
}

impl PathResult {
    /// Path length in cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Why a search returned no path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathFailure {
    /// Goal cell is classified as obstacle
    GoalBlocked,
    /// Open set exhausted
    NoPath,
    /// Expansion budget used up
    MaxIterationsExceeded,
}

/// Open-set entry.
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    coord: GridCoord,
    g_cost: f64,
    f_cost: f64,
    seq: u64,
}

impl Eq for SearchNode {}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: lowest f first, then deepest g, then oldest
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| self.g_cost.total_cmp(&other.g_cost))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* planner borrowing a heat map.
pub struct PathPlanner<'a> {
    grid: &'a HeatMapGrid,
    heuristic: PathHeuristic,
    max_iterations: usize,
}

impl<'a> PathPlanner<'a> {
    /// Planner using the grid's configured heuristic and budget
    pub fn new(grid: &'a HeatMapGrid) -> Self {
        Self {
            grid,
            heuristic: grid.config().heuristic,
            max_iterations: grid.config().max_iterations,
        }
    }

    pub fn with_heuristic(mut self, heuristic: PathHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Search from `start` to `goal`.
    ///
    /// The start cell is always allowed (the rescuer is standing on it).
    pub fn find_path(&self, start: GridCoord, goal: GridCoord) -> Result<PathResult, PathFailure> {
        trace!(
            "[AStar] find_path: start=({},{}) goal=({},{})",
            start.x, start.y, goal.x, goal.y
        );

        if start != goal && !self.grid.status_at(goal).is_traversable() {
            debug!("[AStar] FAILED: GoalBlocked at ({},{})", goal.x, goal.y);
            return Err(PathFailure::GoalBlocked);
        }

        let domain = self
            .grid
            .bounds()
            .map_or(GridBounds::at(start), |b| b.including(start))
            .including(goal);

        let mut open_set = BinaryHeap::new();
        let mut closed_set = HashSet::new();
        let mut came_from: HashMap<GridCoord, GridCoord> = HashMap::new();
        let mut g_scores: HashMap<GridCoord, f64> = HashMap::new();
        let mut seq = 0u64;

        open_set.push(SearchNode {
            coord: start,
            g_cost: 0.0,
            f_cost: self.heuristic.estimate(start, goal),
            seq,
        });
        g_scores.insert(start, 0.0);

        let mut nodes_expanded = 0;

        while let Some(current) = open_set.pop() {
            if !closed_set.insert(current.coord) {
                continue;
            }

            nodes_expanded += 1;
            if nodes_expanded > self.max_iterations {
                debug!(
                    "[AStar] FAILED: MaxIterationsExceeded ({} nodes)",
                    nodes_expanded
                );
                return Err(PathFailure::MaxIterationsExceeded);
            }

            if current.coord == goal {
                return Ok(self.reconstruct_path(&came_from, goal, current.g_cost, nodes_expanded));
            }

            for neighbor in current.coord.neighbors_8() {
                if closed_set.contains(&neighbor) || !domain.contains(neighbor) {
                    continue;
                }
                let Some(step_cost) = self.grid.status_at(neighbor).move_cost() else {
                    continue;
                };
                let move_cost = if current.coord.is_diagonal_to(&neighbor) {
                    step_cost * self.heuristic.diagonal_factor()
                } else {
                    step_cost
                };

                let tentative_g = current.g_cost + move_cost;
                let known_g = g_scores.get(&neighbor).copied().unwrap_or(f64::INFINITY);
                if tentative_g < known_g {
                    came_from.insert(neighbor, current.coord);
                    g_scores.insert(neighbor, tentative_g);
                    seq += 1;
                    open_set.push(SearchNode {
                        coord: neighbor,
                        g_cost: tentative_g,
                        f_cost: tentative_g + self.heuristic.estimate(neighbor, goal),
                        seq,
                    });
                }
            }
        }

        debug!(
            "[AStar] FAILED: NoPath after expanding {} nodes",
            nodes_expanded
        );
        Err(PathFailure::NoPath)
    }

    fn reconstruct_path(
        &self,
        came_from: &HashMap<GridCoord, GridCoord>,
        goal: GridCoord,
        cost: f64,
        nodes_expanded: usize,
    ) -> PathResult {
        let mut cells = vec![goal];
        let mut current = goal;
        while let Some(&prev) = came_from.get(&current) {
            cells.push(prev);
            current = prev;
        }
        cells.reverse();

        let world_points = cells.iter().map(|c| self.grid.grid_to_world(*c)).collect();

        trace!(
            "[AStar] SUCCESS: path length={} cells, cost={:.2}, nodes_expanded={}",
            cells.len(),
            cost,
            nodes_expanded
        );

        PathResult {
            cells,
            world_points,
            cost,
            nodes_expanded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeatMapConfig;
    use crate::heatmap::CellStatus;

    const CLEAR: f64 = -60.0;
    const BLOCKED: f64 = -95.0;

    /// 3×3 grid, 1 m cells; row 1 blocked except where `open` is true
    fn three_by_three(open: [bool; 3]) -> HeatMapGrid {
        let mut grid = HeatMapGrid::new(HeatMapConfig::default());
        for y in 0..3 {
            for x in 0..3 {
                let rssi = if y == 1 && !open[x as usize] { BLOCKED } else { CLEAR };
                grid.record_reading(WorldPoint::new(x as f64 * 100.0 + 50.0, y as f64 * 100.0 + 50.0), rssi, 0);
            }
        }
        grid
    }

    #[test]
    fn test_routes_through_opening() {
        let grid = three_by_three([false, true, false]);
        let path = PathPlanner::new(&grid)
            .find_path(GridCoord::new(0, 0), GridCoord::new(2, 2))
            .unwrap();
        assert!(path.cells.contains(&GridCoord::new(1, 1)));
        for cell in &path.cells {
            assert_ne!(grid.status_at(*cell), CellStatus::Obstacle);
        }
        assert_eq!(path.cells.first(), Some(&GridCoord::new(0, 0)));
        assert_eq!(path.cells.last(), Some(&GridCoord::new(2, 2)));
    }

    #[test]
    fn test_sealed_row_has_no_path() {
        let grid = three_by_three([false, false, false]);
        let result = PathPlanner::new(&grid).find_path(GridCoord::new(0, 0), GridCoord::new(2, 2));
        assert_eq!(result, Err(PathFailure::NoPath));
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = three_by_three([true, true, true]);
        let path = PathPlanner::new(&grid)
            .find_path(GridCoord::new(1, 1), GridCoord::new(1, 1))
            .unwrap();
        assert_eq!(path.cells, vec![GridCoord::new(1, 1)]);
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn test_goal_blocked() {
        let grid = three_by_three([false, false, false]);
        let result = PathPlanner::new(&grid).find_path(GridCoord::new(0, 0), GridCoord::new(0, 1));
        assert_eq!(result, Err(PathFailure::GoalBlocked));
    }

    #[test]
    fn test_octile_diagonal_cost() {
        let grid = three_by_three([true, true, true]);
        let path = PathPlanner::new(&grid)
            .with_heuristic(PathHeuristic::Octile)
            .find_path(GridCoord::new(0, 0), GridCoord::new(2, 2))
            .unwrap();
        assert_eq!(path.len(), 3);
        assert!((path.cost - 2.0 * SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_cells_cost_more() {
        // straight corridor of unmapped cells between two clear cells
        let mut grid = HeatMapGrid::new(HeatMapConfig::default());
        grid.record_reading(WorldPoint::new(50.0, 50.0), CLEAR, 0);
        grid.record_reading(WorldPoint::new(350.0, 50.0), CLEAR, 0);
        let path = PathPlanner::new(&grid)
            .find_path(GridCoord::new(0, 0), GridCoord::new(3, 0))
            .unwrap();
        assert_eq!(path.len(), 4);
        assert!((path.cost - (1.5 + 1.5 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_iteration_cap() {
        let grid = three_by_three([true, true, true]);
        let result = PathPlanner::new(&grid)
            .with_max_iterations(1)
            .find_path(GridCoord::new(0, 0), GridCoord::new(2, 2));
        assert_eq!(result, Err(PathFailure::MaxIterationsExceeded));
    }

    #[test]
    fn test_search_at_index_edge() {
        let grid = HeatMapGrid::new(HeatMapConfig::default());
        let start = GridCoord::new(i32::MAX, 0);
        let goal = GridCoord::new(i32::MAX - 3, 0);
        let path = PathPlanner::new(&grid).find_path(start, goal).unwrap();
        assert_eq!(path.len(), 4);
        assert!((path.cost - 3.0 * 1.5).abs() < 1e-9);

        let corner = GridCoord::new(i32::MIN, i32::MIN);
        let path = PathPlanner::new(&grid)
            .find_path(corner, GridCoord::new(i32::MIN + 2, i32::MIN + 2))
            .unwrap();
        assert_eq!(path.cells.first(), Some(&corner));
    }

    #[test]
    fn test_heuristics() {
        let a = GridCoord::new(0, 0);
        let b = GridCoord::new(3, 4);
        assert_eq!(PathHeuristic::Manhattan.estimate(a, b), 7.0);
        assert!((PathHeuristic::Octile.estimate(a, b) - (3.0 * SQRT_2 + 1.0)).abs() < 1e-12);

        let far = PathHeuristic::Manhattan.estimate(GridCoord::new(i32::MIN, 0), GridCoord::new(i32::MAX, 0));
        assert_eq!(far, u32::MAX as f64);
    }
}
