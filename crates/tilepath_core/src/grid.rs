//! Grid coordinates and the grid collaborator interface

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use crate::level::TileRoot;
use crate::placement::{PlacementError, PlacementMode};

/// A cell in a level layer. `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this position by a delta
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan (taxicab) distance between two cells
    pub fn manhattan_distance(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// True when `other` shares an edge with this cell
    pub fn is_adjacent(self, other: GridPos) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl Add for GridPos {
    type Output = GridPos;

    fn add(self, rhs: GridPos) -> GridPos {
        GridPos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for GridPos {
    type Output = GridPos;

    fn sub(self, rhs: GridPos) -> GridPos {
        GridPos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An inclusive rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRect {
    pub min: GridPos,
    pub max: GridPos,
}

impl GridRect {
    /// Build the bounding rectangle of two opposite corners in any order
    pub fn from_corners(a: GridPos, b: GridPos) -> Self {
        Self {
            min: GridPos::new(a.x.min(b.x), a.y.min(b.y)),
            max: GridPos::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> u32 {
        self.min.x.abs_diff(self.max.x) + 1
    }

    pub fn height(&self) -> u32 {
        self.min.y.abs_diff(self.max.y) + 1
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// Iterate over every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        (self.min.y..=self.max.y)
            .flat_map(move |y| (self.min.x..=self.max.x).map(move |x| GridPos::new(x, y)))
    }
}

/// The level grid as seen by the autotiler.
///
/// Writes are immediate: a tile placed by one call is visible to every
/// following read. There is no transaction or rollback.
pub trait TileGrid {
    /// Whether the cell exists in the level
    fn in_bounds(&self, pos: GridPos) -> bool;

    /// Name of the tile whose head sits at `pos`, if any
    fn tile_identity_at(&self, layer: usize, pos: GridPos) -> Option<String>;

    /// The tile covering `pos`, head or body, identified by its head cell
    fn has_tile_at(&self, layer: usize, pos: GridPos) -> Option<TileRoot>;

    /// Validate and place a tile with its head at `pos`
    fn place_tile(
        &mut self,
        tile: &str,
        layer: usize,
        pos: GridPos,
        mode: PlacementMode,
    ) -> Result<(), PlacementError>;

    /// Swap the tile whose head sits at `pos` for another one.
    ///
    /// Used to turn an existing path tile into a junction. Overlap checks
    /// against the tile being replaced are skipped.
    fn replace_tile(&mut self, tile: &str, layer: usize, pos: GridPos)
        -> Result<(), PlacementError>;

    /// Hand a rectangle to the rectangular autotiler of the level
    fn place_rect(
        &mut self,
        bounds: GridRect,
        layer: usize,
        mode: PlacementMode,
        place_geometry: bool,
    ) -> Result<(), PlacementError>;
}
