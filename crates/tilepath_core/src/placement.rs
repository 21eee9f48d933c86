//! Tile placement rules for the in-memory level

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{GridPos, GridRect, TileGrid};
use crate::level::{GeoType, Level, TileRoot, LAYER_COUNT};
use crate::tile::{TileDatabase, TileInit};

/// How strictly a placement respects existing level content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlacementMode {
    /// Refuse to overlap tiles or to sit on mismatched geometry
    #[default]
    Normal,
    /// Overwrite tile bodies, ignore geometry requirements
    Force,
    /// Like `Force`, and also rewrite geometry to match the tile
    Geometry,
}

impl PlacementMode {
    /// Pick the mode from the editor's force/geometry modifiers
    pub fn from_modifiers(force: bool, geometry: bool) -> Self {
        if geometry {
            PlacementMode::Geometry
        } else if force {
            PlacementMode::Force
        } else {
            PlacementMode::Normal
        }
    }

    pub fn is_forced(self) -> bool {
        self != PlacementMode::Normal
    }
}

/// Why the grid refused a placement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("position ({x}, {y}) is out of bounds")]
    OutOfBounds { x: i32, y: i32 },
    #[error("tile overlaps existing content at ({x}, {y})")]
    Overlap { x: i32, y: i32 },
    #[error("geometry does not match tile requirements at ({x}, {y})")]
    Geometry { x: i32, y: i32 },
    #[error("tile '{0}' is not recognized")]
    UnknownTile(String),
    #[error("no tile at ({x}, {y})")]
    NoTile { x: i32, y: i32 },
}

impl PlacementError {
    fn out_of_bounds(pos: GridPos) -> Self {
        PlacementError::OutOfBounds { x: pos.x, y: pos.y }
    }
}

/// A [`Level`] paired with the [`TileDatabase`] that gives tiles their footprint
pub struct LevelGrid<'a> {
    level: &'a mut Level,
    database: &'a TileDatabase,
}

impl<'a> LevelGrid<'a> {
    pub fn new(level: &'a mut Level, database: &'a TileDatabase) -> Self {
        Self { level, database }
    }

    pub fn level(&self) -> &Level {
        self.level
    }

    fn tile(&self, name: &str) -> Result<&'a TileInit, PlacementError> {
        let database: &'a TileDatabase = self.database;
        database
            .get(name)
            .ok_or_else(|| PlacementError::UnknownTile(name.to_string()))
    }

    /// Top-left corner of a tile whose head sits at `root`
    fn tile_origin(tile: &TileInit, root: GridPos) -> GridPos {
        let (cx, cy) = tile.center();
        root.offset(-(cx as i32), -(cy as i32))
    }

    /// Check a tile against the cells it would cover
    pub fn validate(
        &self,
        tile: &TileInit,
        layer: usize,
        root: GridPos,
        force: bool,
    ) -> Result<(), PlacementError> {
        if layer >= LAYER_COUNT || !self.level.in_bounds(root) {
            return Err(PlacementError::out_of_bounds(root));
        }

        let origin = Self::tile_origin(tile, root);
        let center = tile.center();

        for y in 0..tile.height {
            for x in 0..tile.width {
                let pos = origin.offset(x as i32, y as i32);
                let requirement = tile.requirement(x, y);

                if let Some(cell) = self.level.cell(layer, pos) {
                    // a tile head is never overwritten, even when forced
                    if requirement.is_some() && cell.tile_head.is_some() {
                        return Err(PlacementError::Overlap { x: pos.x, y: pos.y });
                    }

                    let is_head = (x, y) == center;
                    if (is_head || requirement.is_some()) && !force && cell.has_tile() {
                        return Err(PlacementError::Overlap { x: pos.x, y: pos.y });
                    }
                }

                if !force {
                    if let Some(geo) = requirement {
                        if self.level.geometry(layer, pos) != geo {
                            return Err(PlacementError::Geometry { x: pos.x, y: pos.y });
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn write_tile(&mut self, tile: &TileInit, layer: usize, root: GridPos, place_geometry: bool) {
        let origin = Self::tile_origin(tile, root);

        for y in 0..tile.height {
            for x in 0..tile.width {
                let Some(geo) = tile.requirement(x, y) else {
                    continue;
                };
                let pos = origin.offset(x as i32, y as i32);
                if let Some(cell) = self.level.cell_mut(layer, pos) {
                    if place_geometry {
                        cell.geo = geo;
                    }
                    cell.tile_body = Some(TileRoot { pos: root, layer });
                }
            }
        }

        if let Some(cell) = self.level.cell_mut(layer, root) {
            cell.tile_head = Some(tile.name.clone());
        }
    }

    /// Remove the tile whose head sits at `root`, returning its name
    pub fn remove_tile(&mut self, layer: usize, root: GridPos) -> Option<String> {
        let name = self.level.cell_mut(layer, root)?.tile_head.take()?;

        if let Some(tile) = self.database.get(&name) {
            let origin = Self::tile_origin(tile, root);
            let owner = TileRoot { pos: root, layer };
            for y in 0..tile.height {
                for x in 0..tile.width {
                    let pos = origin.offset(x as i32, y as i32);
                    if let Some(cell) = self.level.cell_mut(layer, pos) {
                        if cell.tile_body == Some(owner) {
                            cell.tile_body = None;
                        }
                    }
                }
            }
        }

        Some(name)
    }
}

impl TileGrid for LevelGrid<'_> {
    fn in_bounds(&self, pos: GridPos) -> bool {
        self.level.in_bounds(pos)
    }

    fn tile_identity_at(&self, layer: usize, pos: GridPos) -> Option<String> {
        self.level.tile_head_at(layer, pos).map(str::to_string)
    }

    fn has_tile_at(&self, layer: usize, pos: GridPos) -> Option<TileRoot> {
        let cell = self.level.cell(layer, pos)?;
        if cell.tile_head.is_some() {
            return Some(TileRoot { pos, layer });
        }
        cell.tile_body
    }

    fn place_tile(
        &mut self,
        tile: &str,
        layer: usize,
        pos: GridPos,
        mode: PlacementMode,
    ) -> Result<(), PlacementError> {
        let tile = self.tile(tile)?;
        self.validate(tile, layer, pos, mode.is_forced())?;
        self.write_tile(tile, layer, pos, mode == PlacementMode::Geometry);
        Ok(())
    }

    fn replace_tile(
        &mut self,
        tile: &str,
        layer: usize,
        pos: GridPos,
    ) -> Result<(), PlacementError> {
        let database = self.database;
        let new_tile = self.tile(tile)?;
        let old_name = self
            .remove_tile(layer, pos)
            .ok_or(PlacementError::NoTile { x: pos.x, y: pos.y })?;

        if let Err(err) = self.validate(new_tile, layer, pos, true) {
            if let Some(old_tile) = database.get(&old_name) {
                self.write_tile(old_tile, layer, pos, false);
            } else if let Some(cell) = self.level.cell_mut(layer, pos) {
                cell.tile_head = Some(old_name);
            }
            return Err(err);
        }

        self.write_tile(new_tile, layer, pos, false);
        Ok(())
    }

    fn place_rect(
        &mut self,
        bounds: GridRect,
        layer: usize,
        mode: PlacementMode,
        place_geometry: bool,
    ) -> Result<(), PlacementError> {
        for corner in [bounds.min, bounds.max] {
            if layer >= LAYER_COUNT || !self.level.in_bounds(corner) {
                return Err(PlacementError::out_of_bounds(corner));
            }
        }

        if !mode.is_forced() {
            if let Some(pos) = bounds.cells().find(|&pos| {
                self.level
                    .cell(layer, pos)
                    .map(|c| c.has_tile())
                    .unwrap_or(false)
            }) {
                return Err(PlacementError::Overlap { x: pos.x, y: pos.y });
            }
        } else {
            for pos in bounds.cells() {
                self.remove_tile(layer, pos);
            }
        }

        if place_geometry {
            for pos in bounds.cells() {
                self.level.set_geometry(layer, pos, GeoType::Solid);
            }
        }

        Ok(())
    }
}
