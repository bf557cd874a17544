//! Square grid geometry: cells, cardinal directions, and the static battlefield

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Grid cell (x grows east, y grows south)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: max(|dx|, |dy|)
    pub fn chebyshev_to(&self, other: Cell) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// Manhattan distance: |dx| + |dy|
    pub fn manhattan_to(&self, other: Cell) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Neighbor one step in direction
    pub fn step(&self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    /// Cardinal neighbors, in `Direction::ALL` order
    pub fn neighbors(&self) -> impl Iterator<Item = Cell> + '_ {
        Direction::ALL.iter().map(move |&d| self.step(d))
    }
}

/// Cardinal movement direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Enumeration order used by the action generator
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction vector (dx, dy)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Map bounds and obstacles. Never changes for the lifetime of a skirmish.
#[derive(Clone, Debug)]
pub struct Battlefield {
    width: i32,
    height: i32,
    obstacles: FxHashSet<Cell>,
}

impl Battlefield {
    pub fn new(width: i32, height: i32, obstacles: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            width,
            height,
            obstacles: obstacles.into_iter().collect(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn obstacles(&self) -> &FxHashSet<Cell> {
        &self.obstacles
    }

    /// Check if cell lies inside [0, width) x [0, height)
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    /// In bounds and not an obstacle
    pub fn is_open(&self, cell: Cell) -> bool {
        self.contains(cell) && !self.is_obstacle(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distances() {
        let a = Cell::new(0, 0);
        let b = Cell::new(3, -2);
        assert_eq!(a.chebyshev_to(b), 3);
        assert_eq!(a.manhattan_to(b), 5);
        assert_eq!(b.manhattan_to(a), 5);
        assert_eq!(a.chebyshev_to(a), 0);
    }

    #[test]
    fn test_step_and_neighbors() {
        let c = Cell::new(2, 2);
        assert_eq!(c.step(Direction::North), Cell::new(2, 1));
        assert_eq!(c.step(Direction::West), Cell::new(1, 2));
        let around: Vec<_> = c.neighbors().collect();
        assert_eq!(around.len(), 4);
        assert!(around.iter().all(|n| n.manhattan_to(c) == 1));
    }

    #[test]
    fn test_battlefield_bounds() {
        let field = Battlefield::new(4, 3, [Cell::new(1, 1)]);
        assert!(field.contains(Cell::new(0, 0)));
        assert!(field.contains(Cell::new(3, 2)));
        assert!(!field.contains(Cell::new(4, 0)));
        assert!(!field.contains(Cell::new(0, -1)));
        assert!(field.is_obstacle(Cell::new(1, 1)));
        assert!(!field.is_open(Cell::new(1, 1)));
        assert!(field.is_open(Cell::new(2, 1)));
    }
}
