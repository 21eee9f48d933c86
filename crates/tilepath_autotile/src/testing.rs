//! Shared test fixtures

use std::collections::{HashMap, HashSet};

use tilepath_core::{
    GridPos, GridRect, PlacementError, PlacementMode, TileDatabase, TileGrid, TileInit, TileRoot,
};

use crate::definition::AutotileDefinition;
use crate::table::{PathTile, PathTileTable};

/// A pipe table with every slot filled, junctions and caps enabled
pub fn full_table() -> PathTileTable {
    PathTileTable::new(
        "Pipe LD",
        "Pipe LU",
        "Pipe RD",
        "Pipe RU",
        "Pipe Vertical",
        "Pipe Horizontal",
    )
    .with_junctions("Pipe TR", "Pipe TL", "Pipe TU", "Pipe TD", "Pipe X")
    .with_caps(
        "Pipe Cap Right",
        "Pipe Cap Up",
        "Pipe Cap Left",
        "Pipe Cap Down",
    )
}

/// Every tile of [`full_table`] as a 1x1 tile, plus a 2x1 "Wide Pipe"
pub fn tile_database() -> TileDatabase {
    tile_database_for(1, 1).with_tile(TileInit::new("Wide Pipe", 2, 1).with_category("Pipes"))
}

/// Every tile of [`full_table`], sized for the given path dimensions
pub fn tile_database_for(thickness: u32, segment_length: u32) -> TileDatabase {
    let table = full_table();
    let mut db = TileDatabase::new();
    for slot in PathTile::ALL {
        let (width, height) = slot.role().expected_size(thickness, segment_length);
        db.insert(TileInit::new(table.name(slot), width, height).with_category("Pipes"));
    }
    db
}

/// A validated path definition over [`full_table`]
pub fn pipe_definition(allow_junctions: bool, place_caps: bool) -> AutotileDefinition {
    let mut table = full_table();
    table.allow_junctions = allow_junctions;
    table.place_caps = place_caps;
    let mut definition = AutotileDefinition::path("Pipes", table);
    definition.validate(&tile_database());
    definition
}

/// A call made against a [`RecordingGrid`]
#[derive(Debug, Clone, PartialEq)]
pub enum GridCall {
    Place {
        tile: String,
        layer: usize,
        pos: GridPos,
        mode: PlacementMode,
    },
    Replace {
        tile: String,
        layer: usize,
        pos: GridPos,
    },
    Rect {
        bounds: GridRect,
        layer: usize,
        mode: PlacementMode,
        place_geometry: bool,
    },
}

/// Grid fake that records every write and refuses placements at chosen cells
#[derive(Debug, Default)]
pub struct RecordingGrid {
    width: i32,
    height: i32,
    tiles: HashMap<(usize, GridPos), String>,
    refused: HashSet<GridPos>,
    pub calls: Vec<GridCall>,
}

impl RecordingGrid {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Put a tile in place without recording a call
    pub fn with_tile(mut self, tile: &str, layer: usize, pos: GridPos) -> Self {
        self.tiles.insert((layer, pos), tile.to_string());
        self
    }

    /// Make every placement at `pos` fail as out of bounds
    pub fn refuse_at(mut self, pos: GridPos) -> Self {
        self.refused.insert(pos);
        self
    }

    pub fn tile(&self, layer: usize, pos: GridPos) -> Option<&str> {
        self.tiles.get(&(layer, pos)).map(String::as_str)
    }

    /// Positions of every attempted `place_tile` call, in order
    pub fn placement_attempts(&self) -> Vec<GridPos> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                GridCall::Place { pos, .. } => Some(*pos),
                _ => None,
            })
            .collect()
    }

    fn check(&self, pos: GridPos) -> Result<(), PlacementError> {
        if self.refused.contains(&pos) || !self.in_bounds(pos) {
            return Err(PlacementError::OutOfBounds { x: pos.x, y: pos.y });
        }
        Ok(())
    }
}

impl TileGrid for RecordingGrid {
    fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn tile_identity_at(&self, layer: usize, pos: GridPos) -> Option<String> {
        self.tiles.get(&(layer, pos)).cloned()
    }

    fn has_tile_at(&self, layer: usize, pos: GridPos) -> Option<TileRoot> {
        self.tiles
            .contains_key(&(layer, pos))
            .then_some(TileRoot { pos, layer })
    }

    fn place_tile(
        &mut self,
        tile: &str,
        layer: usize,
        pos: GridPos,
        mode: PlacementMode,
    ) -> Result<(), PlacementError> {
        self.calls.push(GridCall::Place {
            tile: tile.to_string(),
            layer,
            pos,
            mode,
        });
        self.check(pos)?;
        self.tiles.insert((layer, pos), tile.to_string());
        Ok(())
    }

    fn replace_tile(
        &mut self,
        tile: &str,
        layer: usize,
        pos: GridPos,
    ) -> Result<(), PlacementError> {
        self.calls.push(GridCall::Replace {
            tile: tile.to_string(),
            layer,
            pos,
        });
        self.check(pos)?;
        match self.tiles.get_mut(&(layer, pos)) {
            Some(existing) => {
                *existing = tile.to_string();
                Ok(())
            }
            None => Err(PlacementError::NoTile { x: pos.x, y: pos.y }),
        }
    }

    fn place_rect(
        &mut self,
        bounds: GridRect,
        layer: usize,
        mode: PlacementMode,
        place_geometry: bool,
    ) -> Result<(), PlacementError> {
        self.calls.push(GridCall::Rect {
            bounds,
            layer,
            mode,
            place_geometry,
        });
        self.check(bounds.min)?;
        self.check(bounds.max)
    }
}
