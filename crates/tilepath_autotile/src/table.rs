//! Path tile tables
//!
//! A [`PathTileTable`] names the tile used for every connectivity pattern of
//! one path autotile. [`PathTile`] is the pattern itself, independent of any
//! tile names, and owns the mapping between patterns and connectivity masks.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tilepath_core::TileCatalog;

use crate::direction::{Direction, Directions};

/// A connectivity pattern with its own slot in a tile table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathTile {
    LeftDown,
    LeftUp,
    RightDown,
    RightUp,
    Vertical,
    Horizontal,
    TRight,
    TLeft,
    TUp,
    TDown,
    XJunction,
    CapRight,
    CapUp,
    CapLeft,
    CapDown,
}

/// The footprint class a tile must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileRole {
    /// `thickness` x `thickness`
    Turn,
    /// `segment_length` wide, `thickness` high
    Horizontal,
    /// `thickness` wide, `segment_length` high
    Vertical,
}

impl TileRole {
    /// Expected (width, height) for the given path dimensions
    pub fn expected_size(self, thickness: u32, segment_length: u32) -> (u32, u32) {
        match self {
            TileRole::Turn => (thickness, thickness),
            TileRole::Horizontal => (segment_length, thickness),
            TileRole::Vertical => (thickness, segment_length),
        }
    }
}

impl PathTile {
    /// Slots every path table must fill
    pub const REQUIRED: [PathTile; 6] = [
        PathTile::LeftDown,
        PathTile::LeftUp,
        PathTile::RightDown,
        PathTile::RightUp,
        PathTile::Vertical,
        PathTile::Horizontal,
    ];

    /// Slots used when junctions are allowed
    pub const JUNCTIONS: [PathTile; 5] = [
        PathTile::TRight,
        PathTile::TLeft,
        PathTile::TUp,
        PathTile::TDown,
        PathTile::XJunction,
    ];

    /// Slots used when caps are placed
    pub const CAPS: [PathTile; 4] = [
        PathTile::CapRight,
        PathTile::CapUp,
        PathTile::CapLeft,
        PathTile::CapDown,
    ];

    pub const ALL: [PathTile; 15] = [
        PathTile::LeftDown,
        PathTile::LeftUp,
        PathTile::RightDown,
        PathTile::RightUp,
        PathTile::Vertical,
        PathTile::Horizontal,
        PathTile::TRight,
        PathTile::TLeft,
        PathTile::TUp,
        PathTile::TDown,
        PathTile::XJunction,
        PathTile::CapRight,
        PathTile::CapUp,
        PathTile::CapLeft,
        PathTile::CapDown,
    ];

    /// The connectivity this pattern stands for.
    ///
    /// T-junctions are named after the side facing away from their stem, caps
    /// after the side facing away from their single connection.
    pub fn directions(self) -> Directions {
        match self {
            PathTile::LeftDown => Directions::LEFT | Directions::DOWN,
            PathTile::LeftUp => Directions::LEFT | Directions::UP,
            PathTile::RightDown => Directions::RIGHT | Directions::DOWN,
            PathTile::RightUp => Directions::RIGHT | Directions::UP,
            PathTile::Vertical => Directions::VERTICAL,
            PathTile::Horizontal => Directions::HORIZONTAL,
            PathTile::TRight => Directions::VERTICAL | Directions::LEFT,
            PathTile::TLeft => Directions::VERTICAL | Directions::RIGHT,
            PathTile::TUp => Directions::HORIZONTAL | Directions::DOWN,
            PathTile::TDown => Directions::HORIZONTAL | Directions::UP,
            PathTile::XJunction => Directions::all(),
            PathTile::CapRight => Directions::LEFT,
            PathTile::CapUp => Directions::DOWN,
            PathTile::CapLeft => Directions::RIGHT,
            PathTile::CapDown => Directions::UP,
        }
    }

    /// Pick the pattern for a connectivity mask.
    ///
    /// Returns `None` for an empty mask, and for three or four connections
    /// when junctions are not allowed. A single connection resolves to a cap
    /// when caps are placed, otherwise to the straight tile of its axis.
    pub fn from_directions(
        mask: Directions,
        allow_junctions: bool,
        place_caps: bool,
    ) -> Option<PathTile> {
        match mask.count() {
            4 => allow_junctions.then_some(PathTile::XJunction),
            3 if !allow_junctions => None,
            3 => {
                if mask.contains(Directions::HORIZONTAL) {
                    if mask.has(Direction::Up) {
                        Some(PathTile::TDown)
                    } else {
                        Some(PathTile::TUp)
                    }
                } else if mask.has(Direction::Right) {
                    Some(PathTile::TLeft)
                } else {
                    Some(PathTile::TRight)
                }
            }
            2 => {
                if mask == Directions::LEFT | Directions::DOWN {
                    Some(PathTile::LeftDown)
                } else if mask == Directions::LEFT | Directions::UP {
                    Some(PathTile::LeftUp)
                } else if mask == Directions::RIGHT | Directions::DOWN {
                    Some(PathTile::RightDown)
                } else if mask == Directions::RIGHT | Directions::UP {
                    Some(PathTile::RightUp)
                } else if mask == Directions::HORIZONTAL {
                    Some(PathTile::Horizontal)
                } else {
                    Some(PathTile::Vertical)
                }
            }
            1 if place_caps => {
                let connected = mask.directions().next()?;
                Some(match connected.opposite() {
                    Direction::Right => PathTile::CapRight,
                    Direction::Up => PathTile::CapUp,
                    Direction::Left => PathTile::CapLeft,
                    Direction::Down => PathTile::CapDown,
                })
            }
            1 if mask.has_horizontal() => Some(PathTile::Horizontal),
            1 => Some(PathTile::Vertical),
            _ => None,
        }
    }

    /// Footprint class used for size validation
    pub fn role(self) -> TileRole {
        match self {
            PathTile::Horizontal | PathTile::CapLeft | PathTile::CapRight => TileRole::Horizontal,
            PathTile::Vertical | PathTile::CapUp | PathTile::CapDown => TileRole::Vertical,
            _ => TileRole::Turn,
        }
    }

    /// Key of this slot in the autotile catalog file
    pub fn config_key(self) -> &'static str {
        match self {
            PathTile::LeftDown => "ld",
            PathTile::LeftUp => "lu",
            PathTile::RightDown => "rd",
            PathTile::RightUp => "ru",
            PathTile::Vertical => "vertical",
            PathTile::Horizontal => "horizontal",
            PathTile::TRight => "tr",
            PathTile::TLeft => "tl",
            PathTile::TUp => "tu",
            PathTile::TDown => "td",
            PathTile::XJunction => "x",
            PathTile::CapRight => "capRight",
            PathTile::CapUp => "capUp",
            PathTile::CapLeft => "capLeft",
            PathTile::CapDown => "capDown",
        }
    }

    /// Look a slot up by its catalog key
    pub fn from_config_key(key: &str) -> Option<PathTile> {
        PathTile::ALL.into_iter().find(|t| t.config_key() == key)
    }
}

impl fmt::Display for PathTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PathTile::LeftDown => "Left-Down",
            PathTile::LeftUp => "Left-Up",
            PathTile::RightDown => "Right-Down",
            PathTile::RightUp => "Right-Up",
            PathTile::Vertical => "Vertical",
            PathTile::Horizontal => "Horizontal",
            PathTile::TRight => "T-Junction Right",
            PathTile::TLeft => "T-Junction Left",
            PathTile::TUp => "T-Junction Up",
            PathTile::TDown => "T-Junction Down",
            PathTile::XJunction => "Four-way Junction",
            PathTile::CapRight => "Cap Right",
            PathTile::CapUp => "Cap Up",
            PathTile::CapLeft => "Cap Left",
            PathTile::CapDown => "Cap Down",
        };
        f.write_str(label)
    }
}

/// A problem with an autotile's configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{slot} tile '{name}' does not exist")]
    MissingTile { slot: PathTile, name: String },
    #[error(
        "{slot} tile '{name}' is {}x{}, expected {}x{}",
        .actual.0, .actual.1, .expected.0, .expected.1
    )]
    DimensionMismatch {
        slot: PathTile,
        name: String,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("path thickness must be at least 1")]
    InvalidThickness,
    #[error("segment length must be at least 1")]
    InvalidSegmentLength,
}

/// Tile names for every connectivity pattern of a path autotile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathTileTable {
    pub left_down: String,
    pub left_up: String,
    pub right_down: String,
    pub right_up: String,
    pub vertical: String,
    pub horizontal: String,

    #[serde(default)]
    pub t_right: String,
    #[serde(default)]
    pub t_left: String,
    #[serde(default)]
    pub t_up: String,
    #[serde(default)]
    pub t_down: String,
    #[serde(default)]
    pub x_junction: String,

    #[serde(default)]
    pub cap_right: String,
    #[serde(default)]
    pub cap_up: String,
    #[serde(default)]
    pub cap_left: String,
    #[serde(default)]
    pub cap_down: String,

    #[serde(default)]
    pub allow_junctions: bool,
    #[serde(default)]
    pub place_caps: bool,
}

impl PathTileTable {
    /// Create a table with the six mandatory tiles
    pub fn new(
        left_down: impl Into<String>,
        left_up: impl Into<String>,
        right_down: impl Into<String>,
        right_up: impl Into<String>,
        vertical: impl Into<String>,
        horizontal: impl Into<String>,
    ) -> Self {
        Self {
            left_down: left_down.into(),
            left_up: left_up.into(),
            right_down: right_down.into(),
            right_up: right_up.into(),
            vertical: vertical.into(),
            horizontal: horizontal.into(),
            ..Default::default()
        }
    }

    /// Enable junctions with the given T and X tiles
    pub fn with_junctions(
        mut self,
        t_right: impl Into<String>,
        t_left: impl Into<String>,
        t_up: impl Into<String>,
        t_down: impl Into<String>,
        x_junction: impl Into<String>,
    ) -> Self {
        self.t_right = t_right.into();
        self.t_left = t_left.into();
        self.t_up = t_up.into();
        self.t_down = t_down.into();
        self.x_junction = x_junction.into();
        self.allow_junctions = true;
        self
    }

    /// Enable end caps with the given tiles
    pub fn with_caps(
        mut self,
        cap_right: impl Into<String>,
        cap_up: impl Into<String>,
        cap_left: impl Into<String>,
        cap_down: impl Into<String>,
    ) -> Self {
        self.cap_right = cap_right.into();
        self.cap_up = cap_up.into();
        self.cap_left = cap_left.into();
        self.cap_down = cap_down.into();
        self.place_caps = true;
        self
    }

    /// Tile name in a slot (may be empty for unused slots)
    pub fn name(&self, tile: PathTile) -> &str {
        match tile {
            PathTile::LeftDown => &self.left_down,
            PathTile::LeftUp => &self.left_up,
            PathTile::RightDown => &self.right_down,
            PathTile::RightUp => &self.right_up,
            PathTile::Vertical => &self.vertical,
            PathTile::Horizontal => &self.horizontal,
            PathTile::TRight => &self.t_right,
            PathTile::TLeft => &self.t_left,
            PathTile::TUp => &self.t_up,
            PathTile::TDown => &self.t_down,
            PathTile::XJunction => &self.x_junction,
            PathTile::CapRight => &self.cap_right,
            PathTile::CapUp => &self.cap_up,
            PathTile::CapLeft => &self.cap_left,
            PathTile::CapDown => &self.cap_down,
        }
    }

    /// Set the tile name of a slot
    pub fn set(&mut self, tile: PathTile, name: impl Into<String>) {
        let slot = match tile {
            PathTile::LeftDown => &mut self.left_down,
            PathTile::LeftUp => &mut self.left_up,
            PathTile::RightDown => &mut self.right_down,
            PathTile::RightUp => &mut self.right_up,
            PathTile::Vertical => &mut self.vertical,
            PathTile::Horizontal => &mut self.horizontal,
            PathTile::TRight => &mut self.t_right,
            PathTile::TLeft => &mut self.t_left,
            PathTile::TUp => &mut self.t_up,
            PathTile::TDown => &mut self.t_down,
            PathTile::XJunction => &mut self.x_junction,
            PathTile::CapRight => &mut self.cap_right,
            PathTile::CapUp => &mut self.cap_up,
            PathTile::CapLeft => &mut self.cap_left,
            PathTile::CapDown => &mut self.cap_down,
        };
        *slot = name.into();
    }

    /// Whether a slot takes part in resolution with the current options
    pub fn is_enabled(&self, tile: PathTile) -> bool {
        if PathTile::JUNCTIONS.contains(&tile) {
            self.allow_junctions
        } else if PathTile::CAPS.contains(&tile) {
            self.place_caps
        } else {
            true
        }
    }

    /// Slots in use, in [`PathTile::ALL`] order
    pub fn enabled_tiles(&self) -> impl Iterator<Item = PathTile> + '_ {
        PathTile::ALL.into_iter().filter(|t| self.is_enabled(*t))
    }

    /// Resolve a connectivity mask to a slot of this table
    pub fn resolve(&self, mask: Directions) -> Option<PathTile> {
        PathTile::from_directions(mask, self.allow_junctions, self.place_caps)
    }

    /// Resolve a connectivity mask to a tile name
    pub fn tile_from_directions(&self, mask: Directions) -> Option<&str> {
        let name = self.name(self.resolve(mask)?);
        (!name.is_empty()).then_some(name)
    }

    /// The connectivity of an enabled slot holding this tile name
    pub fn directions_from_tile(&self, name: &str) -> Option<Directions> {
        if name.is_empty() {
            return None;
        }
        self.enabled_tiles()
            .find(|t| self.name(*t) == name)
            .map(PathTile::directions)
    }

    /// Whether this tile belongs to the table
    pub fn contains_tile(&self, name: &str) -> bool {
        self.directions_from_tile(name).is_some()
    }

    /// Check every enabled slot against the tile catalog.
    ///
    /// Returns one error per failing slot; an empty list means the table is usable.
    pub fn validate(
        &self,
        catalog: &impl TileCatalog,
        thickness: u32,
        segment_length: u32,
    ) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for slot in self.enabled_tiles() {
            let name = self.name(slot);
            let Some(actual) = catalog.tile_dimensions(name).filter(|_| catalog.tile_exists(name))
            else {
                errors.push(ConfigError::MissingTile {
                    slot,
                    name: name.to_string(),
                });
                continue;
            };

            let expected = slot.role().expected_size(thickness, segment_length);
            if actual != expected {
                errors.push(ConfigError::DimensionMismatch {
                    slot,
                    name: name.to_string(),
                    expected,
                    actual,
                });
            }
        }

        errors
    }
}
