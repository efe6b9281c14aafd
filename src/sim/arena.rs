//! Minimal encounter map: a rectangular floor, optional pillar walls, and the
//! walkability / line-of-sight queries the core consumes. In the full game
//! these come from the dungeon and visibility collaborators; the harness only
//! needs enough terrain for movement and cover to matter.

use std::collections::BTreeSet;

use crate::path::Cell;

#[derive(Debug, Clone)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
    walls: BTreeSet<Cell>,
}

impl Arena {
    pub fn open(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            walls: BTreeSet::new(),
        }
    }

    /// The arena every simulated trial runs in: 20x12 with two pillar columns
    /// so pursuit and searching have corners to work around.
    pub fn standard() -> Self {
        let mut arena = Self::open(20, 12);
        for y in [3, 4, 7, 8] {
            arena.walls.insert(Cell::new(7, y));
            arena.walls.insert(Cell::new(12, y));
        }
        arena
    }

    pub fn add_wall(&mut self, cell: Cell) {
        self.walls.insert(cell);
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.walls.contains(&cell)
    }

    /// Bresenham line walk; a wall on any intermediate cell blocks sight.
    /// Endpoints do not block themselves.
    pub fn line_of_sight(&self, from: Cell, to: Cell) -> bool {
        if !self.in_bounds(from) || !self.in_bounds(to) {
            return false;
        }
        let dx = (to.x - from.x).abs();
        let dy = (to.y - from.y).abs();
        let step_x = if to.x > from.x { 1 } else { -1 };
        let step_y = if to.y > from.y { 1 } else { -1 };
        let mut err = dx - dy;
        let mut cursor = from;
        loop {
            if cursor != from && cursor != to && self.walls.contains(&cursor) {
                return false;
            }
            if cursor == to {
                return true;
            }
            let doubled = 2 * err;
            if doubled > -dy {
                err -= dy;
                cursor.x += step_x;
            }
            if doubled < dx {
                err += dx;
                cursor.y += step_y;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_and_walls_gate_walkability() {
        let arena = Arena::standard();
        assert!(arena.is_walkable(Cell::new(0, 0)));
        assert!(!arena.is_walkable(Cell::new(-1, 0)));
        assert!(!arena.is_walkable(Cell::new(20, 5)));
        assert!(!arena.is_walkable(Cell::new(7, 3)));
    }

    #[test]
    fn sight_is_clear_on_open_floor() {
        let arena = Arena::open(10, 10);
        assert!(arena.line_of_sight(Cell::new(0, 0), Cell::new(9, 9)));
        assert!(arena.line_of_sight(Cell::new(3, 7), Cell::new(3, 1)));
    }

    #[test]
    fn walls_block_sight_but_not_endpoints() {
        let mut arena = Arena::open(10, 3);
        arena.add_wall(Cell::new(5, 1));
        assert!(!arena.line_of_sight(Cell::new(0, 1), Cell::new(9, 1)));
        // Standing next to the wall can still see the wall-adjacent cells.
        assert!(arena.line_of_sight(Cell::new(4, 1), Cell::new(4, 0)));
    }

    #[test]
    fn sight_is_symmetric_across_the_pillars() {
        let arena = Arena::standard();
        let a = Cell::new(5, 3);
        let b = Cell::new(10, 3);
        assert_eq!(arena.line_of_sight(a, b), arena.line_of_sight(b, a));
    }
}
