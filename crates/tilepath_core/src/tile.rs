//! Tile definitions and the tile database

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::level::GeoType;

/// Errors that can occur when loading a tile database
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid tile '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

/// Read-only view of the tile/asset database used by the autotiler
pub trait TileCatalog {
    /// Whether a tile with this name exists
    fn tile_exists(&self, name: &str) -> bool;

    /// Width and height of a tile in cells
    fn tile_dimensions(&self, name: &str) -> Option<(u32, u32)>;
}

/// A single tile: its footprint and the geometry it requires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileInit {
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub width: u32,
    pub height: u32,
    /// Row-major, `width * height` entries. `None` = cell not covered by the tile.
    #[serde(default)]
    pub requirements: Vec<Option<GeoType>>,
}

fn default_category() -> String {
    "Misc".to_string()
}

impl TileInit {
    /// Create a tile that covers its whole footprint with solid geometry
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            category: default_category(),
            width,
            height,
            requirements: vec![Some(GeoType::Solid); (width * height) as usize],
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Replace every covered cell's requirement with `geo`
    pub fn with_geometry(mut self, geo: GeoType) -> Self {
        for req in self.requirements.iter_mut().flatten() {
            *req = geo;
        }
        self
    }

    /// Offset of the head cell inside the footprint
    pub fn center(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    /// Requirement of the cell at local (x, y)
    pub fn requirement(&self, x: u32, y: u32) -> Option<GeoType> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.requirements
            .get((y * self.width + x) as usize)
            .copied()
            .flatten()
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.width == 0 || self.height == 0 {
            return Err(DatabaseError::Invalid {
                name: self.name.clone(),
                reason: "tile has an empty footprint".to_string(),
            });
        }
        if self.requirements.len() != (self.width * self.height) as usize {
            return Err(DatabaseError::Invalid {
                name: self.name.clone(),
                reason: format!(
                    "expected {} requirements, got {}",
                    self.width * self.height,
                    self.requirements.len()
                ),
            });
        }
        Ok(())
    }
}

/// All tiles known to the editor, by name
#[derive(Debug, Clone, Default)]
pub struct TileDatabase {
    tiles: HashMap<String, TileInit>,
}

impl TileDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tile, replacing any tile with the same name
    pub fn insert(&mut self, tile: TileInit) {
        self.tiles.insert(tile.name.clone(), tile);
    }

    /// Builder-style insert
    pub fn with_tile(mut self, tile: TileInit) -> Self {
        self.insert(tile);
        self
    }

    /// Get a tile by name
    pub fn get(&self, name: &str) -> Option<&TileInit> {
        self.tiles.get(name)
    }

    /// Number of tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate over the tiles of a category
    pub fn tiles_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a TileInit> {
        self.tiles.values().filter(move |t| t.category == category)
    }

    /// Parse a database from a JSON array of tiles.
    ///
    /// Tiles without a `requirements` list are treated as fully solid.
    pub fn from_json(json: &str) -> Result<Self, DatabaseError> {
        let tiles: Vec<TileInit> =
            serde_json::from_str(json).map_err(|e| DatabaseError::Parse(e.to_string()))?;

        let mut database = Self::new();
        for mut tile in tiles {
            if tile.requirements.is_empty() {
                tile.requirements = vec![Some(GeoType::Solid); (tile.width * tile.height) as usize];
            }
            tile.check()?;
            database.insert(tile);
        }

        Ok(database)
    }

    /// Load a database from a JSON file
    pub fn load(path: &Path) -> Result<Self, DatabaseError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DatabaseError::Io(e.to_string()))?;
        let database = Self::from_json(&content)?;
        tracing::info!(
            "Loaded {} tiles from {}",
            database.len(),
            path.display()
        );
        Ok(database)
    }
}

impl TileCatalog for TileDatabase {
    fn tile_exists(&self, name: &str) -> bool {
        self.tiles.contains_key(name)
    }

    fn tile_dimensions(&self, name: &str) -> Option<(u32, u32)> {
        self.tiles.get(name).map(|t| (t.width, t.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_center_and_requirements() {
        let tile = TileInit::new("Pipe", 3, 1);
        assert_eq!(tile.center(), (1, 0));
        assert_eq!(tile.requirement(2, 0), Some(GeoType::Solid));
        assert_eq!(tile.requirement(3, 0), None);

        let air = TileInit::new("Vine", 1, 2).with_geometry(GeoType::Air);
        assert_eq!(air.requirement(0, 1), Some(GeoType::Air));
    }

    #[test]
    fn test_database_catalog() {
        let db = TileDatabase::new()
            .with_tile(TileInit::new("Wide", 2, 1))
            .with_tile(TileInit::new("Tall", 1, 2).with_category("Pipes"));

        assert!(db.tile_exists("Wide"));
        assert!(!db.tile_exists("Missing"));
        assert_eq!(db.tile_dimensions("Tall"), Some((1, 2)));
        assert_eq!(db.tile_dimensions("Missing"), None);
        assert_eq!(db.tiles_in_category("Pipes").count(), 1);
    }

    #[test]
    fn test_database_from_json() {
        let json = r#"[
            { "name": "Block", "width": 1, "height": 1 },
            { "name": "Hook", "category": "Props", "width": 2, "height": 1,
              "requirements": ["Solid", null] }
        ]"#;

        let db = TileDatabase::from_json(json).unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(db.get("Block").unwrap().requirement(0, 0), Some(GeoType::Solid));

        let hook = db.get("Hook").unwrap();
        assert_eq!(hook.category, "Props");
        assert_eq!(hook.requirement(1, 0), None);
    }

    #[test]
    fn test_database_rejects_bad_requirements() {
        let json = r#"[{ "name": "Broken", "width": 2, "height": 2, "requirements": ["Solid"] }]"#;
        let result = TileDatabase::from_json(json);
        assert!(matches!(result, Err(DatabaseError::Invalid { .. })));
    }
}
