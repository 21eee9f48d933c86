//! Directions and connectivity masks
//!
//! Up is towards negative y, matching level cell coordinates.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tilepath_core::GridPos;

/// One side of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Up,
    Left,
    Down,
}

impl Direction {
    /// Every direction, in the order neighbours are processed
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
    ];

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
        }
    }

    /// Cell delta of one step in this direction
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
        }
    }

    /// The neighbouring cell in this direction
    pub fn step(self, pos: GridPos) -> GridPos {
        let (dx, dy) = self.offset();
        pos.offset(dx, dy)
    }

    /// Direction of a single step from `from` to `to`, if they are adjacent
    pub fn between(from: GridPos, to: GridPos) -> Option<Direction> {
        match (to.x - from.x, to.y - from.y) {
            (1, 0) => Some(Direction::Right),
            (0, -1) => Some(Direction::Up),
            (-1, 0) => Some(Direction::Left),
            (0, 1) => Some(Direction::Down),
            _ => None,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }

    pub const fn flag(self) -> Directions {
        match self {
            Direction::Right => Directions::RIGHT,
            Direction::Up => Directions::UP,
            Direction::Left => Directions::LEFT,
            Direction::Down => Directions::DOWN,
        }
    }
}

bitflags! {
    /// Which sides of a cell connect to a neighbour
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Directions: u8 {
        const RIGHT = 0b0001;
        const UP    = 0b0010;
        const LEFT  = 0b0100;
        const DOWN  = 0b1000;

        const HORIZONTAL = Self::RIGHT.bits() | Self::LEFT.bits();
        const VERTICAL   = Self::UP.bits() | Self::DOWN.bits();
    }
}

impl Directions {
    /// Number of connected sides
    pub fn count(self) -> u32 {
        self.bits().count_ones()
    }

    pub fn has(self, dir: Direction) -> bool {
        self.contains(dir.flag())
    }

    pub fn has_horizontal(self) -> bool {
        self.intersects(Directions::HORIZONTAL)
    }

    pub fn has_vertical(self) -> bool {
        self.intersects(Directions::VERTICAL)
    }

    /// A turn connects on both axes
    pub fn is_turn(self) -> bool {
        self.has_horizontal() && self.has_vertical()
    }

    /// The connected directions, in `Direction::ALL` order
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.has(*d))
    }
}

impl Default for Directions {
    fn default() -> Self {
        Directions::empty()
    }
}

impl From<Direction> for Directions {
    fn from(dir: Direction) -> Self {
        dir.flag()
    }
}
