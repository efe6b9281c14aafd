//! Grid search over an 8-connected map: A* shortest paths and Dijkstra
//! distance fields. Walkability and occupancy arrive as oracles; nothing in
//! this module mutates map state.
//!
//! Movement is king-move: every step, diagonal or not, costs 1, so path cost
//! equals Chebyshev distance on open ground.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, VecDeque};

use serde::Serialize;

/// One grid coordinate. Ordered so search results are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// King-move distance: max(|dx|, |dy|).
    pub fn chebyshev(self, other: Cell) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn euclidean(self, other: Cell) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// The eight neighbors, in a fixed order (row-major, skipping self).
    pub fn neighbors(self) -> [Cell; 8] {
        [
            Cell::new(self.x - 1, self.y - 1),
            Cell::new(self.x, self.y - 1),
            Cell::new(self.x + 1, self.y - 1),
            Cell::new(self.x - 1, self.y),
            Cell::new(self.x + 1, self.y),
            Cell::new(self.x - 1, self.y + 1),
            Cell::new(self.x, self.y + 1),
            Cell::new(self.x + 1, self.y + 1),
        ]
    }
}

/// Ordered cells from just after `start` through the goal, with total step cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    pub cells: Vec<Cell>,
    pub cost: u32,
}

/// A* over the 8-connected grid with the Chebyshev heuristic.
///
/// `is_walkable` rejects walls and out-of-bounds cells; `is_blocked` rejects
/// cells occupied by entities the walker may not pass through. The goal cell
/// itself is exempt from `is_blocked` so callers can path *to* an occupied
/// tile (the last step is then up to the caller). Returns `None` when no
/// route exists.
pub fn find_path(
    start: Cell,
    goal: Cell,
    is_walkable: &dyn Fn(Cell) -> bool,
    is_blocked: &dyn Fn(Cell) -> bool,
) -> Option<PathResult> {
    if start == goal {
        return Some(PathResult {
            cells: Vec::new(),
            cost: 0,
        });
    }
    if !is_walkable(goal) {
        return None;
    }

    let passable = |cell: Cell| is_walkable(cell) && (cell == goal || !is_blocked(cell));

    let mut open = BinaryHeap::new();
    let mut best_cost: BTreeMap<Cell, u32> = BTreeMap::new();
    let mut came_from: BTreeMap<Cell, Cell> = BTreeMap::new();

    best_cost.insert(start, 0);
    open.push(Reverse((start.chebyshev(goal) as u32, 0u32, start)));

    while let Some(Reverse((_, cost, cell))) = open.pop() {
        if cell == goal {
            let mut cells = Vec::with_capacity(cost as usize);
            let mut cursor = cell;
            while cursor != start {
                cells.push(cursor);
                cursor = came_from[&cursor];
            }
            cells.reverse();
            return Some(PathResult { cells, cost });
        }
        if best_cost.get(&cell).copied().unwrap_or(u32::MAX) < cost {
            continue;
        }
        for neighbor in cell.neighbors() {
            if !passable(neighbor) {
                continue;
            }
            let next_cost = cost + 1;
            if next_cost < best_cost.get(&neighbor).copied().unwrap_or(u32::MAX) {
                best_cost.insert(neighbor, next_cost);
                came_from.insert(neighbor, cell);
                let estimate = next_cost + neighbor.chebyshev(goal) as u32;
                open.push(Reverse((estimate, next_cost, neighbor)));
            }
        }
    }
    None
}

/// Walking distances from one or more source cells; unreached cells are +inf.
#[derive(Debug, Clone, Default)]
pub struct DistanceField {
    distances: BTreeMap<Cell, u32>,
}

impl DistanceField {
    pub fn get(&self, cell: Cell) -> Option<u32> {
        self.distances.get(&cell).copied()
    }

    pub fn distance(&self, cell: Cell) -> f64 {
        self.get(cell).map_or(f64::INFINITY, f64::from)
    }

    /// The reached cell nearest to any source that satisfies `predicate`
    /// (e.g. nearest unexplored tile, nearest item). Ties break by cell order
    /// so results are stable.
    pub fn nearest_matching(&self, predicate: impl Fn(Cell) -> bool) -> Option<Cell> {
        self.distances
            .iter()
            .filter(|(cell, _)| predicate(**cell))
            .min_by_key(|(cell, dist)| (**dist, **cell))
            .map(|(cell, _)| *cell)
    }
}

/// Uniform-cost flood fill (Dijkstra with unit edges) from `sources`.
pub fn build_distance_field(sources: &[Cell], is_walkable: &dyn Fn(Cell) -> bool) -> DistanceField {
    let mut field = DistanceField::default();
    let mut queue = VecDeque::new();
    for &source in sources {
        if is_walkable(source) && !field.distances.contains_key(&source) {
            field.distances.insert(source, 0);
            queue.push_back(source);
        }
    }
    while let Some(cell) = queue.pop_front() {
        let next = field.distances[&cell] + 1;
        for neighbor in cell.neighbors() {
            if is_walkable(neighbor) && !field.distances.contains_key(&neighbor) {
                field.distances.insert(neighbor, next);
                queue.push_back(neighbor);
            }
        }
    }
    field
}

/// Whether a sound at `source` carries to `listener`: the walking distance
/// (per `field`, built with `source` among its sources) must not exceed 1.5x
/// the straight-line distance. Lets sounds pass thin walls but not wind
/// through long corridors.
pub fn within_earshot(field: &DistanceField, source: Cell, listener: Cell) -> bool {
    let walking = field.distance(listener);
    walking.is_finite() && walking <= 1.5 * source.euclidean(listener)
}
