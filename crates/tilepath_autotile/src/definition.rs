//! Autotile definitions
//!
//! A definition is one configured autotile family: its name, the geometry
//! of the paths it draws, and either a path tile table or the rectangle mode.

use serde::{Deserialize, Serialize};
use tilepath_core::TileCatalog;
use uuid::Uuid;

use crate::table::{ConfigError, PathTileTable};

/// How an autotile turns user input into tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutotileShape {
    /// Follow a drawn path, resolving tiles from the table
    Path(PathTileTable),
    /// Fill a dragged rectangle through the grid's rectangle routine
    Rect,
}

/// Configuration of one autotile family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutotileDefinition {
    pub id: Uuid,
    pub name: String,
    /// Width of the path in cells
    #[serde(default = "default_one")]
    pub path_thickness: u32,
    /// Minimum straight run between turns, and the spacing of straight tiles
    #[serde(default = "default_one")]
    pub segment_length: u32,
    /// Rect mode only: drag out squares instead of rectangles
    #[serde(default)]
    pub constrain_to_square: bool,
    pub shape: AutotileShape,
    /// Set by [`AutotileDefinition::validate`]
    #[serde(skip)]
    ready: bool,
}

fn default_one() -> u32 {
    1
}

/// Definitions compare by configuration; `id` and validation state are ignored.
impl PartialEq for AutotileDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.path_thickness == other.path_thickness
            && self.segment_length == other.segment_length
            && self.constrain_to_square == other.constrain_to_square
            && self.shape == other.shape
    }
}

impl AutotileDefinition {
    /// Create a path autotile with thickness and segment length 1.
    ///
    /// The definition is not ready until it has been validated.
    pub fn path(name: impl Into<String>, table: PathTileTable) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            path_thickness: 1,
            segment_length: 1,
            constrain_to_square: false,
            shape: AutotileShape::Path(table),
            ready: false,
        }
    }

    /// Create a rectangle autotile
    pub fn rect(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            path_thickness: 1,
            segment_length: 1,
            constrain_to_square: false,
            shape: AutotileShape::Rect,
            ready: true,
        }
    }

    pub fn with_thickness(mut self, thickness: u32) -> Self {
        self.path_thickness = thickness;
        self.ready = false;
        self
    }

    pub fn with_segment_length(mut self, segment_length: u32) -> Self {
        self.segment_length = segment_length;
        self.ready = false;
        self
    }

    pub fn with_square_constraint(mut self, constrain: bool) -> Self {
        self.constrain_to_square = constrain;
        self
    }

    pub fn is_path(&self) -> bool {
        matches!(self.shape, AutotileShape::Path(_))
    }

    pub fn path_table(&self) -> Option<&PathTileTable> {
        match &self.shape {
            AutotileShape::Path(table) => Some(table),
            AutotileShape::Rect => None,
        }
    }

    /// Mutable access to the table. Edits mark the definition as needing validation.
    pub fn path_table_mut(&mut self) -> Option<&mut PathTileTable> {
        match &mut self.shape {
            AutotileShape::Path(table) => {
                self.ready = false;
                Some(table)
            }
            AutotileShape::Rect => None,
        }
    }

    /// Whether sessions may be started with this definition
    pub fn can_activate(&self) -> bool {
        match self.shape {
            AutotileShape::Path(_) => self.ready,
            AutotileShape::Rect => true,
        }
    }

    /// Check the definition against the tile catalog and update [`can_activate`].
    ///
    /// [`can_activate`]: AutotileDefinition::can_activate
    pub fn validate(&mut self, catalog: &impl TileCatalog) -> Vec<ConfigError> {
        let AutotileShape::Path(table) = &self.shape else {
            self.ready = true;
            return Vec::new();
        };

        let mut errors = Vec::new();
        if self.path_thickness == 0 {
            errors.push(ConfigError::InvalidThickness);
        }
        if self.segment_length == 0 {
            errors.push(ConfigError::InvalidSegmentLength);
        }
        if errors.is_empty() {
            errors = table.validate(catalog, self.path_thickness, self.segment_length);
        }

        self.ready = errors.is_empty();
        if !self.ready {
            tracing::warn!(
                "Autotile '{}' is not ready: {} problem(s), first: {}",
                self.name,
                errors.len(),
                errors[0]
            );
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::PathTile;
    use crate::testing::{full_table, tile_database};
    use tilepath_core::{TileDatabase, TileInit};

    #[test]
    fn test_path_definition_needs_validation() {
        let mut definition = AutotileDefinition::path("Pipes", full_table());
        assert!(definition.is_path());
        assert!(!definition.can_activate());

        assert!(definition.validate(&tile_database()).is_empty());
        assert!(definition.can_activate());

        definition.path_table_mut().unwrap().set(PathTile::LeftDown, "Gone");
        assert!(!definition.can_activate());

        let errors = definition.validate(&tile_database());
        assert_eq!(
            errors,
            vec![ConfigError::MissingTile {
                slot: PathTile::LeftDown,
                name: "Gone".to_string(),
            }]
        );
        assert!(!definition.can_activate());
    }

    #[test]
    fn test_thickness_changes_expected_sizes() {
        let db = thick_database();
        let mut definition = AutotileDefinition::path(
            "Thick",
            PathTileTable::new("T", "T", "T", "T", "V", "H"),
        )
        .with_thickness(3)
        .with_segment_length(2);

        assert!(definition.validate(&db).is_empty());

        let mut thin = definition.clone().with_thickness(1);
        let errors = thin.validate(&db);
        assert_eq!(errors.len(), 6);
        assert!(!thin.can_activate());
    }

    #[test]
    fn test_zero_dimensions_are_invalid() {
        let mut definition = AutotileDefinition::path("Pipes", full_table()).with_thickness(0);
        assert_eq!(
            definition.validate(&tile_database()),
            vec![ConfigError::InvalidThickness]
        );

        let mut definition = AutotileDefinition::path("Pipes", full_table()).with_segment_length(0);
        assert_eq!(
            definition.validate(&tile_database()),
            vec![ConfigError::InvalidSegmentLength]
        );
    }

    #[test]
    fn test_rect_definition_is_always_ready() {
        let mut definition = AutotileDefinition::rect("Blocks").with_square_constraint(true);
        assert!(definition.can_activate());
        assert!(definition.path_table().is_none());
        assert!(definition.validate(&tile_database()).is_empty());
        assert!(definition.can_activate());
    }

    #[test]
    fn test_equality_ignores_id() {
        let a = AutotileDefinition::path("Pipes", full_table());
        let b = AutotileDefinition::path("Pipes", full_table());
        assert_ne!(a.id, b.id);
        assert_eq!(a, b);
        assert_ne!(a, b.clone().with_thickness(2));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut definition = AutotileDefinition::path("Pipes", full_table()).with_segment_length(1);
        definition.validate(&tile_database());
        assert!(definition.can_activate());

        let json = serde_json::to_string(&definition).unwrap();
        let restored: AutotileDefinition = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, definition);
        assert_eq!(restored.id, definition.id);
        // readiness is not persisted
        assert!(!restored.can_activate());
    }

    /// Tiles sized for a thickness 3, segment length 2 path
    fn thick_database() -> TileDatabase {
        TileDatabase::new()
            .with_tile(TileInit::new("T", 3, 3))
            .with_tile(TileInit::new("H", 2, 3))
            .with_tile(TileInit::new("V", 3, 2))
    }
}
