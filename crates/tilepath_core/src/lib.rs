//! Core data structures for the tilepath level editor
//!
//! This crate provides the level-side types the autotiler works against:
//! - `GridPos` / `GridRect` - Cell coordinates and inclusive rectangles
//! - `TileCatalog` / `TileGrid` - The tile database and level grid as seen by the autotiler
//! - `TileDatabase` - In-memory tile database, loadable from JSON
//! - `Level` - Layered cell storage with geometry and tiles
//! - `LevelGrid` - A `Level` + `TileDatabase` pair implementing the placement rules

mod grid;
mod level;
mod placement;
mod tile;

pub use grid::{GridPos, GridRect, TileGrid};
pub use level::{Cell, GeoType, Level, TileRoot, LAYER_COUNT};
pub use placement::{LevelGrid, PlacementError, PlacementMode};
pub use tile::{DatabaseError, TileCatalog, TileDatabase, TileInit};
