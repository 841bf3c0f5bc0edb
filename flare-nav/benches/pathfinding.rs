//! Benchmark A* over recorded heat maps.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use flare_nav::heatmap::PathPlanner;
use flare_nav::{GridCoord, HeatMapGrid, PathHeuristic, WorldPoint};

/// Square map of `size` cells with a wall across the middle and one gap.
///
/// Every third cell is weak enough to read as unstable.
fn walled_map(size: i32) -> HeatMapGrid {
    let mut grid = HeatMapGrid::default();
    let wall = size / 2;
    let gap = size - 2;
    for y in 0..size {
        for x in 0..size {
            let rssi = if y == wall && x != gap {
                -95.0
            } else if (x + y) % 3 == 0 {
                -80.0
            } else {
                -62.0
            };
            let point = WorldPoint::new(x as f64 * 100.0 + 50.0, y as f64 * 100.0 + 50.0);
            for t in 0..3 {
                grid.record_reading(point, rssi, t);
            }
        }
    }
    grid
}

fn bench_astar_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("astar_walled");

    for size in [16, 32, 64].iter() {
        let grid = walled_map(*size);
        let start = GridCoord::new(0, 0);
        let goal = GridCoord::new(0, size - 1);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let path = grid.find_path(black_box(start), black_box(goal));
                black_box(path)
            })
        });
    }

    group.finish();
}

fn bench_astar_heuristics(c: &mut Criterion) {
    let grid = walled_map(48);
    let start = GridCoord::new(0, 0);
    let goal = GridCoord::new(0, 47);
    let mut group = c.benchmark_group("astar_heuristic");

    for heuristic in [PathHeuristic::Manhattan, PathHeuristic::Octile] {
        let planner = PathPlanner::new(&grid).with_heuristic(heuristic);
        group.bench_function(format!("{:?}", heuristic), |b| {
            b.iter(|| {
                let result = planner.find_path(black_box(start), black_box(goal));
                black_box(result)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_astar_sizes, bench_astar_heuristics);
criterion_main!(benches);
