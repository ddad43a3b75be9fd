//! Board geometry: positions, bounds, and 8-neighborhoods

use serde::{Deserialize, Serialize};

/// A cell position on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev (king-move) distance to another position
    pub fn chebyshev(&self, other: Pos) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Neighbor offsets for the 8-neighborhood (dx, dy)
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Rectangular board bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Total number of cells
    pub fn cell_count(&self) -> i32 {
        self.width * self.height
    }

    /// Check if a position is on the board
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Linear index of an in-bounds position (row-major)
    pub fn index(&self, pos: Pos) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    /// Position of a linear index
    pub fn pos(&self, index: usize) -> Pos {
        let i = index as i32;
        Pos::new(i % self.width, i / self.width)
    }

    /// Up to 8 positions at Chebyshev distance 1, clipped to bounds
    pub fn neighbors(&self, pos: Pos) -> Vec<Pos> {
        NEIGHBOR_OFFSETS
            .iter()
            .map(|&(dx, dy)| Pos::new(pos.x + dx, pos.y + dy))
            .filter(|p| self.contains(*p))
            .collect()
    }

    /// The four corners in probe priority order:
    /// top-left, bottom-left, top-right, bottom-right
    pub fn corners(&self) -> [Pos; 4] {
        [
            Pos::new(0, 0),
            Pos::new(0, self.height - 1),
            Pos::new(self.width - 1, 0),
            Pos::new(self.width - 1, self.height - 1),
        ]
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.cell_count()).map(|i| self.pos(i as usize))
    }
}
