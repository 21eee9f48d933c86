//! Layered cell storage for a level

use serde::{Deserialize, Serialize};

use crate::grid::GridPos;

/// Number of work layers in a level
pub const LAYER_COUNT: usize = 3;

/// Geometry of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GeoType {
    #[default]
    Air,
    Solid,
}

/// Reference from a tile body cell back to the head that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRoot {
    pub pos: GridPos,
    pub layer: usize,
}

/// A single cell on one layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub geo: GeoType,
    /// Name of the tile whose head sits in this cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_head: Option<String>,
    /// Head of the tile whose body covers this cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_body: Option<TileRoot>,
}

impl Cell {
    /// Whether any tile (head or body) occupies this cell
    pub fn has_tile(&self) -> bool {
        self.tile_head.is_some() || self.tile_body.is_some()
    }
}

/// A level: `LAYER_COUNT` layers of `width * height` cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub width: u32,
    pub height: u32,
    cells: Vec<Cell>,
}

impl Level {
    /// Create an empty level filled with air
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize * LAYER_COUNT;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    fn index(&self, layer: usize, pos: GridPos) -> Option<usize> {
        if layer >= LAYER_COUNT || !self.in_bounds(pos) {
            return None;
        }
        let layer_size = (self.width * self.height) as usize;
        Some(layer * layer_size + (pos.y as u32 * self.width + pos.x as u32) as usize)
    }

    /// Get a cell, `None` when out of bounds
    pub fn cell(&self, layer: usize, pos: GridPos) -> Option<&Cell> {
        self.index(layer, pos).map(|i| &self.cells[i])
    }

    /// Get a mutable cell, `None` when out of bounds
    pub fn cell_mut(&mut self, layer: usize, pos: GridPos) -> Option<&mut Cell> {
        self.index(layer, pos).map(move |i| &mut self.cells[i])
    }

    /// Geometry at a cell. Cells outside the level count as solid.
    pub fn geometry(&self, layer: usize, pos: GridPos) -> GeoType {
        self.cell(layer, pos).map(|c| c.geo).unwrap_or(GeoType::Solid)
    }

    pub fn set_geometry(&mut self, layer: usize, pos: GridPos, geo: GeoType) {
        if let Some(cell) = self.cell_mut(layer, pos) {
            cell.geo = geo;
        }
    }

    /// Set the geometry of every cell on a layer
    pub fn fill_geometry(&mut self, layer: usize, geo: GeoType) {
        if layer >= LAYER_COUNT {
            return;
        }
        let layer_size = (self.width * self.height) as usize;
        for cell in &mut self.cells[layer * layer_size..(layer + 1) * layer_size] {
            cell.geo = geo;
        }
    }

    /// Name of the tile whose head sits at `pos`
    pub fn tile_head_at(&self, layer: usize, pos: GridPos) -> Option<&str> {
        self.cell(layer, pos).and_then(|c| c.tile_head.as_deref())
    }

    /// Count the tile heads on a layer
    pub fn tile_count(&self, layer: usize) -> usize {
        if layer >= LAYER_COUNT {
            return 0;
        }
        let layer_size = (self.width * self.height) as usize;
        self.cells[layer * layer_size..(layer + 1) * layer_size]
            .iter()
            .filter(|c| c.tile_head.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_level() {
        let level = Level::new(10, 8);

        assert_eq!(level.width, 10);
        assert_eq!(level.height, 8);
        assert!(level.in_bounds(GridPos::new(9, 7)));
        assert!(!level.in_bounds(GridPos::new(10, 0)));
        assert!(!level.in_bounds(GridPos::new(0, -1)));
        assert_eq!(level.geometry(0, GridPos::new(3, 3)), GeoType::Air);
        assert_eq!(level.tile_count(0), 0);
    }

    #[test]
    fn test_layers_are_independent() {
        let mut level = Level::new(4, 4);
        level.fill_geometry(1, GeoType::Solid);
        level.set_geometry(2, GridPos::new(1, 1), GeoType::Solid);

        assert_eq!(level.geometry(0, GridPos::new(1, 1)), GeoType::Air);
        assert_eq!(level.geometry(1, GridPos::new(1, 1)), GeoType::Solid);
        assert_eq!(level.geometry(2, GridPos::new(1, 1)), GeoType::Solid);
        assert_eq!(level.geometry(2, GridPos::new(0, 1)), GeoType::Air);
        assert!(level.cell(LAYER_COUNT, GridPos::ZERO).is_none());
    }

    #[test]
    fn test_out_of_bounds_geometry_is_solid() {
        let level = Level::new(2, 2);
        assert_eq!(level.geometry(0, GridPos::new(-1, 0)), GeoType::Solid);
    }
}
