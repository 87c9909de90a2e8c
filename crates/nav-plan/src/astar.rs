//! Global planning: A* over the 8-connected cell grid.
//!
//! Axis moves cost `1.0`, diagonal moves `√2`, and the heuristic is the
//! Euclidean distance to the goal cell — admissible and consistent for this
//! edge-cost model.  Blocked cells are whatever
//! [`Environment::is_obstacle`] reports at query time, so continuous obstacle
//! positions are sampled onto the lattice once per query.
//!
//! # Visited-at-generation
//!
//! A cell is marked visited when it is *pushed*, not when it is popped.  Each
//! cell therefore enters the open set at most once and is never re-keyed,
//! which keeps the search compact at the cost of occasionally missing a
//! cheaper route to an already-generated cell.  Path shape on open grids is
//! unaffected (the step *count* stays Chebyshev-optimal; see the crate
//! tests, which pin this behavior).

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::SQRT_2;

use nav_core::{Cell, Point};
use nav_world::{Environment, Grid};

/// Pluggable global route planner.
///
/// Implementations must be `Send + Sync` so hosts can share one planner
/// across whatever driver structure they use.
pub trait GlobalPlanner: Send + Sync {
    /// Plan a route of 8-connected cell centers from `from` to `to`.
    ///
    /// The returned sequence starts at `from` and ends at `to`.  An empty
    /// vector means no route currently exists — that is a normal outcome,
    /// not an error; callers hold position and retry after the world
    /// changes.
    fn plan(&self, env: &Environment, from: Cell, to: Cell) -> Vec<Point>;
}

// ── AStarPlanner ──────────────────────────────────────────────────────────────

/// Eight neighbor offsets with step costs, axis and diagonal interleaved.
const DIRECTIONS: [(i32, i32, f64); 8] = [
    (-1, 0, 1.0),
    (-1, 1, SQRT_2),
    (0, 1, 1.0),
    (1, 1, SQRT_2),
    (1, 0, 1.0),
    (1, -1, SQRT_2),
    (0, -1, 1.0),
    (-1, -1, SQRT_2),
];

/// A* search over the grid.  Stateless; one instance serves any number of
/// queries.
#[derive(Default)]
pub struct AStarPlanner;

impl AStarPlanner {
    pub fn new() -> Self {
        AStarPlanner
    }
}

impl GlobalPlanner for AStarPlanner {
    fn plan(&self, env: &Environment, from: Cell, to: Cell) -> Vec<Point> {
        let grid = env.grid();
        if !grid.contains_cell(from) || !grid.contains_cell(to) {
            return Vec::new();
        }
        // A blocked goal can never be popped; skip the exhaustive search.
        if env.is_obstacle(to) {
            return Vec::new();
        }

        let cells = grid.cell_count();
        let mut visited = vec![false; cells];
        // Row-major index of the cell each cell was generated from;
        // u32::MAX marks the start (and ungenerated cells).
        let mut parent: Vec<u32> = vec![u32::MAX; cells];
        let mut open: BinaryHeap<OpenNode> = BinaryHeap::new();
        let mut seq: u64 = 0;

        let start_idx = grid.cell_index(from);
        visited[start_idx] = true;
        open.push(OpenNode {
            f: from.euclidean(to),
            g: 0.0,
            seq,
            cell: start_idx as u32,
        });

        while let Some(node) = open.pop() {
            let cell = cell_at(&grid, node.cell);
            if cell == to {
                return reconstruct(&grid, &parent, node.cell);
            }

            for (dx, dy, cost) in DIRECTIONS {
                let next = Cell::new(cell.x + dx, cell.y + dy);
                if !grid.contains_cell(next) {
                    continue;
                }
                let idx = grid.cell_index(next);
                if visited[idx] || env.is_obstacle(next) {
                    continue;
                }
                // Mark at generation so the cell is pushed exactly once.
                visited[idx] = true;
                parent[idx] = node.cell;
                seq += 1;
                let g = node.g + cost;
                open.push(OpenNode {
                    f: g + next.euclidean(to),
                    g,
                    seq,
                    cell: idx as u32,
                });
            }
        }

        // Open set exhausted: the goal is unreachable right now.
        Vec::new()
    }
}

#[inline]
fn cell_at(grid: &Grid, idx: u32) -> Cell {
    Cell::new(
        (idx % grid.width()) as i32,
        (idx / grid.width()) as i32,
    )
}

/// Walk parent pointers from the goal back to the start, then flip.
fn reconstruct(grid: &Grid, parent: &[u32], goal_idx: u32) -> Vec<Point> {
    let mut cells = Vec::new();
    let mut idx = goal_idx;
    loop {
        cells.push(cell_at(grid, idx).to_point());
        match parent[idx as usize] {
            u32::MAX => break,
            prev => idx = prev,
        }
    }
    cells.reverse();
    cells
}

// ── Open-set ordering ─────────────────────────────────────────────────────────

/// Heap entry: `f = g + h` primary, push sequence secondary.
///
/// `BinaryHeap` is a max-heap, so both keys compare reversed: the node with
/// the lowest `f` pops first, and equal-`f` nodes pop in push order (FIFO).
struct OpenNode {
    f: f64,
    g: f64,
    seq: u64,
    cell: u32,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
