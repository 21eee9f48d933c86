//! Autotile catalog
//!
//! Named autotile definitions grouped by category, and the line-based text
//! format they are stored in:
//!
//! ```text
//! # comment
//! [Pipes:Plumbing]
//! thickness=1
//! length=1
//! ld=Pipe LD
//! ...
//! allowJunctions=true
//! placeCaps=false
//! ```
//!
//! A header without a category puts the autotile in `Misc`. Sections that
//! miss one of the tile keys are skipped with a warning.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tilepath_core::TileCatalog;
use uuid::Uuid;

use crate::definition::AutotileDefinition;
use crate::table::{ConfigError, PathTile, PathTileTable};

/// Category used when none is given
pub const DEFAULT_CATEGORY: &str = "Misc";

const ALLOW_JUNCTIONS_KEY: &str = "allowJunctions";
const PLACE_CAPS_KEY: &str = "placeCaps";

/// Errors from editing, loading or saving a catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("JSON error: {0}")]
    Json(String),
    #[error("Invalid autotile name '{0}'")]
    InvalidName(String),
    #[error("An autotile named '{name}' already exists in '{category}'")]
    Duplicate { name: String, category: String },
    #[error("Autotile {0} is not in the catalog")]
    NotFound(Uuid),
}

fn parse_error(line: usize, message: impl Into<String>) -> CatalogError {
    CatalogError::Parse {
        line,
        message: message.into(),
    }
}

/// A named group of autotiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutotileCategory {
    pub name: String,
    pub autotiles: Vec<AutotileDefinition>,
}

impl AutotileCategory {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            autotiles: Vec::new(),
        }
    }
}

/// All autotiles known to the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutotileCatalog {
    categories: Vec<AutotileCategory>,
}

impl Default for AutotileCatalog {
    fn default() -> Self {
        Self {
            categories: vec![AutotileCategory::new(DEFAULT_CATEGORY)],
        }
    }
}

impl AutotileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names may not be empty or contain line breaks; autotile names may not contain ':'
    fn check_names(name: &str, category: &str) -> Result<(), CatalogError> {
        let bad_line =
            |s: &str| s.trim().is_empty() || s.contains(|c: char| c == '\n' || c == '\r');
        if bad_line(name) || name.contains(':') {
            return Err(CatalogError::InvalidName(name.to_string()));
        }
        if bad_line(category) {
            return Err(CatalogError::InvalidName(category.to_string()));
        }
        Ok(())
    }

    fn category_index(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == category)
    }

    fn check_unique(
        &self,
        name: &str,
        category: &str,
        except: Option<Uuid>,
    ) -> Result<(), CatalogError> {
        let taken = self
            .in_category(category)
            .iter()
            .any(|d| d.name == name && Some(d.id) != except);
        if taken {
            return Err(CatalogError::Duplicate {
                name: name.to_string(),
                category: category.to_string(),
            });
        }
        Ok(())
    }

    fn insert(&mut self, definition: AutotileDefinition, category: &str) {
        let index = match self.category_index(category) {
            Some(index) => index,
            None => {
                self.categories.push(AutotileCategory::new(category));
                self.categories.len() - 1
            }
        };
        self.categories[index].autotiles.push(definition);
    }

    /// Add an autotile to a category, creating the category if needed
    pub fn add(
        &mut self,
        definition: AutotileDefinition,
        category: &str,
    ) -> Result<Uuid, CatalogError> {
        Self::check_names(&definition.name, category)?;
        self.check_unique(&definition.name, category, None)?;

        let id = definition.id;
        self.insert(definition, category);
        Ok(id)
    }

    /// Locate an autotile as (category index, index in category)
    fn locate(&self, id: Uuid) -> Option<(usize, usize)> {
        self.categories.iter().enumerate().find_map(|(ci, category)| {
            category
                .autotiles
                .iter()
                .position(|d| d.id == id)
                .map(|ai| (ci, ai))
        })
    }

    fn take(&mut self, category_index: usize, index: usize) -> AutotileDefinition {
        let definition = self.categories[category_index].autotiles.remove(index);
        let category = &self.categories[category_index];
        if category.autotiles.is_empty() && category.name != DEFAULT_CATEGORY {
            self.categories.remove(category_index);
        }
        definition
    }

    /// Remove an autotile. Emptied categories other than `Misc` are removed too.
    pub fn remove(&mut self, id: Uuid) -> Option<AutotileDefinition> {
        let (ci, ai) = self.locate(id)?;
        Some(self.take(ci, ai))
    }

    /// Rename an autotile and move it to `category`
    pub fn rename(&mut self, id: Uuid, name: &str, category: &str) -> Result<(), CatalogError> {
        Self::check_names(name, category)?;
        self.check_unique(name, category, Some(id))?;
        let (ci, ai) = self.locate(id).ok_or(CatalogError::NotFound(id))?;

        if self.categories[ci].name == category {
            self.categories[ci].autotiles[ai].name = name.to_string();
        } else {
            let mut definition = self.take(ci, ai);
            definition.name = name.to_string();
            self.insert(definition, category);
        }
        Ok(())
    }

    pub fn get(&self, id: Uuid) -> Option<&AutotileDefinition> {
        self.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut AutotileDefinition> {
        self.categories
            .iter_mut()
            .flat_map(|c| c.autotiles.iter_mut())
            .find(|d| d.id == id)
    }

    /// First autotile with this name, in any category
    pub fn find(&self, name: &str) -> Option<&AutotileDefinition> {
        self.iter().find(|d| d.name == name)
    }

    /// Category holding the autotile
    pub fn category_of(&self, id: Uuid) -> Option<&str> {
        let (ci, _) = self.locate(id)?;
        Some(self.categories[ci].name.as_str())
    }

    /// Category names, `Misc` first
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Autotiles of a category, empty if it does not exist
    pub fn in_category(&self, category: &str) -> &[AutotileDefinition] {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.autotiles.as_slice())
            .unwrap_or(&[])
    }

    /// Every autotile, category by category
    pub fn iter(&self) -> impl Iterator<Item = &AutotileDefinition> {
        self.categories.iter().flat_map(|c| c.autotiles.iter())
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.autotiles.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate every autotile against the tile catalog.
    ///
    /// Returns the names and problems of the autotiles that cannot be used.
    pub fn revalidate(&mut self, tiles: &impl TileCatalog) -> Vec<(String, Vec<ConfigError>)> {
        let mut problems = Vec::new();
        for definition in self.categories.iter_mut().flat_map(|c| c.autotiles.iter_mut()) {
            let errors = definition.validate(tiles);
            if !errors.is_empty() {
                problems.push((definition.name.clone(), errors));
            }
        }
        problems
    }

    /// Parse the text format. Parsed autotiles still need [`revalidate`](Self::revalidate).
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        let mut section: Option<Section> = None;

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;

            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') {
                if line.len() < 2 || !line.ends_with(']') {
                    return Err(parse_error(line_no, "Expected ']' at the end of the header"));
                }
                if let Some(finished) = section.take() {
                    finished.submit(&mut catalog)?;
                }

                let header = &line[1..line.len() - 1];
                let (name, category) = header.split_once(':').unwrap_or((header, DEFAULT_CATEGORY));
                section = Some(Section::new(name, category, line_no));
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(parse_error(line_no, "Expected '='"));
            };
            let Some(current) = section.as_mut() else {
                return Err(parse_error(
                    line_no,
                    format!("Key '{key}' is outside of an autotile section"),
                ));
            };
            current.insert(key, value, line_no)?;
        }

        if let Some(finished) = section {
            finished.submit(&mut catalog)?;
        }

        Ok(catalog)
    }

    /// Write the text format. Rect autotiles have no text form and are left out.
    pub fn write(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        for category in &self.categories {
            for definition in &category.autotiles {
                let Some(table) = definition.path_table() else {
                    continue;
                };

                if !lines.is_empty() {
                    lines.push(String::new());
                }
                if category.name == DEFAULT_CATEGORY {
                    lines.push(format!("[{}]", definition.name));
                } else {
                    lines.push(format!("[{}:{}]", definition.name, category.name));
                }

                if definition.path_thickness != 1 {
                    lines.push(format!("thickness={}", definition.path_thickness));
                }
                if definition.segment_length != 1 {
                    lines.push(format!("length={}", definition.segment_length));
                }

                let slot = |tile: PathTile| format!("{}={}", tile.config_key(), table.name(tile));
                lines.extend(PathTile::REQUIRED.into_iter().map(slot));
                lines.push(format!("{ALLOW_JUNCTIONS_KEY}={}", table.allow_junctions));
                lines.extend(
                    [
                        PathTile::TRight,
                        PathTile::TUp,
                        PathTile::TLeft,
                        PathTile::TDown,
                        PathTile::XJunction,
                    ]
                    .into_iter()
                    .map(slot),
                );
                lines.push(format!("{PLACE_CAPS_KEY}={}", table.place_caps));
                lines.extend(PathTile::CAPS.into_iter().map(slot));
            }
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|e| CatalogError::Io(e.to_string()))?;
        let catalog = Self::parse(&text)?;
        tracing::info!("Loaded {} autotiles from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Save the catalog to a file
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        std::fs::write(path, self.write()).map_err(|e| CatalogError::Io(e.to_string()))?;
        tracing::info!("Saved {} autotiles to {}", self.len(), path.display());
        Ok(())
    }

    /// Serialize to JSON for embedding in a project file
    pub fn to_json(&self) -> Result<String, CatalogError> {
        serde_json::to_string_pretty(self).map_err(|e| CatalogError::Json(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(|e| CatalogError::Json(e.to_string()))
    }
}

/// One `[Name]` section being read
struct Section {
    name: String,
    category: String,
    line: usize,
    thickness: u32,
    length: u32,
    /// key -> (value, line)
    values: HashMap<String, (String, usize)>,
}

impl Section {
    fn new(name: &str, category: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            line,
            thickness: 1,
            length: 1,
            values: HashMap::new(),
        }
    }

    fn insert(&mut self, key: &str, value: &str, line: usize) -> Result<(), CatalogError> {
        match key {
            "thickness" => self.thickness = parse_positive(key, value, line)?,
            "length" => self.length = parse_positive(key, value, line)?,
            _ => {
                self.values
                    .insert(key.to_string(), (value.to_string(), line));
            }
        }
        Ok(())
    }

    fn flag(&self, key: &str) -> Result<bool, CatalogError> {
        match self.values.get(key) {
            Some((value, _)) if value == "true" => Ok(true),
            Some((value, _)) if value == "false" => Ok(false),
            Some((value, line)) => Err(parse_error(
                *line,
                format!("Expected true or false for the value of the key '{key}', got '{value}'"),
            )),
            None => Ok(false),
        }
    }

    fn submit(self, catalog: &mut AutotileCatalog) -> Result<(), CatalogError> {
        let missing: Vec<&str> = PathTile::ALL
            .iter()
            .map(|t| t.config_key())
            .chain([ALLOW_JUNCTIONS_KEY, PLACE_CAPS_KEY])
            .filter(|key| !self.values.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            tracing::warn!(
                "Autotile {} does not have a complete definition (missing {})",
                self.name,
                missing.join(", ")
            );
            return Ok(());
        }

        let mut table = PathTileTable::default();
        for slot in PathTile::ALL {
            if let Some((value, _)) = self.values.get(slot.config_key()) {
                table.set(slot, value.as_str());
            }
        }
        table.allow_junctions = self.flag(ALLOW_JUNCTIONS_KEY)?;
        table.place_caps = self.flag(PLACE_CAPS_KEY)?;

        let definition = AutotileDefinition::path(self.name, table)
            .with_thickness(self.thickness)
            .with_segment_length(self.length);
        catalog
            .add(definition, &self.category)
            .map_err(|e| parse_error(self.line, e.to_string()))?;
        Ok(())
    }
}

fn parse_positive(key: &str, value: &str, line: usize) -> Result<u32, CatalogError> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(parse_error(
            line,
            format!("Expected a positive integer for '{key}', got '{value}'"),
        )),
    }
}
