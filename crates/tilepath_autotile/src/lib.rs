//! Path and rectangle autotiling for grid level editors
//!
//! This crate turns a dragged cursor into tile placements:
//! - a path autotile follows the cursor cell by cell, picks the straight,
//!   turn, junction or cap tile each node needs, and joins onto paths of the
//!   same autotile already on the grid
//! - a rect autotile fills the dragged rectangle through the grid's own
//!   rectangle routine
//!
//! # Features
//! - Thick paths and segment lengths, for tiles larger than one cell
//! - T and X junctions, optional end caps
//! - Autotile catalog in a line-based text format
//!
//! # Example
//!
//! ```rust,ignore
//! use tilepath_autotile::{begin_path_session, AutotileCatalog};
//! use tilepath_core::{GridPos, Level, LevelGrid, PlacementMode, TileDatabase};
//!
//! let tiles = TileDatabase::load(Path::new("tiles.json"))?;
//! let mut catalog = AutotileCatalog::load(Path::new("autotiles.txt"))?;
//! catalog.revalidate(&tiles);
//!
//! let pipes = catalog.find("Pipes").unwrap();
//! let mut session = begin_path_session(pipes)?;
//! for cell in [(0, 0), (1, 0), (2, 0), (2, 1)] {
//!     session.update(GridPos::from(cell));
//! }
//!
//! let mut level = Level::new(32, 32);
//! let report = session.finish(&mut LevelGrid::new(&mut level, &tiles), 0, PlacementMode::Normal);
//! ```

pub mod catalog;
pub mod definition;
pub mod direction;
pub mod path;
pub mod placement;
pub mod rect;
pub mod segment;
pub mod session;
pub mod table;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use catalog::{AutotileCatalog, AutotileCategory, CatalogError, DEFAULT_CATEGORY};
pub use definition::{AutotileDefinition, AutotileShape};
pub use direction::{Direction, Directions};
pub use path::{path_directions, PathBuilder, PathState, PathUpdate};
pub use placement::{
    place_instructions, PlacementOutcome, PlacementRecord, PlacementReport,
};
pub use rect::{rect_bounds, square_end, RectSession};
pub use segment::{resolve_segments, PlacementInstruction};
pub use session::{begin_path_session, begin_rect_session, AutotileError, PathSession};
pub use table::{ConfigError, PathTile, PathTileTable, TileRole};

// Re-export tilepath_core
pub use tilepath_core;
