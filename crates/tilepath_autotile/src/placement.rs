//! Tile placement engine
//!
//! Resolves placement instructions to tiles and writes them to the grid.
//! With junctions enabled, new tiles merge with tiles of the same family that
//! are already on the grid.

use tilepath_core::{GridPos, PlacementError, PlacementMode, TileGrid};

use crate::direction::{Direction, Directions};
use crate::segment::PlacementInstruction;
use crate::table::PathTileTable;

/// What happened to one instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// A new tile was placed
    Placed(String),
    /// The tile already in the cell was rewritten to include the new connections
    Joined(String),
    /// No tile matches the connectivity
    Unresolved,
    /// The grid refused the tile
    Failed(PlacementError),
}

/// An instruction paired with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRecord {
    pub instruction: PlacementInstruction,
    /// Connectivity after merging with existing tiles
    pub directions: Directions,
    pub outcome: PlacementOutcome,
}

/// Outcome of running a batch of instructions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementReport {
    pub records: Vec<PlacementRecord>,
    /// Neighbouring cells rewritten to connect back to the new path
    pub joined_neighbours: Vec<GridPos>,
}

impl PlacementReport {
    /// Instructions that ended with a tile on the grid
    pub fn success_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    PlacementOutcome::Placed(_) | PlacementOutcome::Joined(_)
                )
            })
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &PlacementRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, PlacementOutcome::Failed(_)))
    }

    /// True when every instruction produced a tile
    pub fn is_complete(&self) -> bool {
        self.success_count() == self.records.len()
    }

    /// Outcome of the instruction for node `index`
    pub fn outcome_at(&self, index: usize) -> Option<&PlacementOutcome> {
        self.records
            .iter()
            .find(|r| r.instruction.index == index)
            .map(|r| &r.outcome)
    }
}

/// Place every instruction in order. A failed instruction is logged and
/// recorded, and never stops the ones after it.
pub fn place_instructions<G: TileGrid + ?Sized>(
    table: &PathTileTable,
    grid: &mut G,
    layer: usize,
    instructions: &[PlacementInstruction],
    mode: PlacementMode,
) -> PlacementReport {
    let mut report = PlacementReport::default();

    for instruction in instructions {
        let record = if table.allow_junctions {
            place_joined(table, grid, layer, instruction, mode, &mut report.joined_neighbours)
        } else {
            place_single(table, grid, layer, instruction, instruction.directions, mode)
        };
        report.records.push(record);
    }

    report
}

/// Connectivity of the family tile at `pos`, if there is one
fn family_directions<G: TileGrid + ?Sized>(
    table: &PathTileTable,
    grid: &G,
    layer: usize,
    pos: GridPos,
) -> Option<Directions> {
    let name = grid.tile_identity_at(layer, pos)?;
    table.directions_from_tile(&name)
}

fn place_joined<G: TileGrid + ?Sized>(
    table: &PathTileTable,
    grid: &mut G,
    layer: usize,
    instruction: &PlacementInstruction,
    mode: PlacementMode,
    joined_neighbours: &mut Vec<GridPos>,
) -> PlacementRecord {
    let pos = instruction.pos;
    let mut mask = instruction.directions;

    // merge into a family tile already in this cell
    if let Some(existing) = family_directions(table, grid, layer, pos) {
        mask |= existing;
        let outcome = match table.tile_from_directions(mask) {
            Some(tile) => match grid.replace_tile(tile, layer, pos) {
                Ok(()) => {
                    tracing::debug!("Merged autotile at ({}, {}) into {}", pos.x, pos.y, tile);
                    PlacementOutcome::Joined(tile.to_string())
                }
                Err(err) => {
                    tracing::warn!(
                        "Could not merge {} at ({}, {}): {}",
                        tile,
                        pos.x,
                        pos.y,
                        err
                    );
                    PlacementOutcome::Failed(err)
                }
            },
            None => {
                tracing::debug!("No tile for {:?} at ({}, {})", mask, pos.x, pos.y);
                PlacementOutcome::Unresolved
            }
        };
        return PlacementRecord {
            instruction: *instruction,
            directions: mask,
            outcome,
        };
    }

    // plug into neighbouring family tiles on the open sides
    for dir in Direction::ALL {
        if mask.has(dir) {
            continue;
        }
        let neighbour = dir.step(pos);
        if !grid.in_bounds(neighbour) {
            continue;
        }
        let Some(neighbour_mask) = family_directions(table, grid, layer, neighbour) else {
            continue;
        };

        let joined = neighbour_mask | dir.opposite().flag();
        let Some(tile) = table.tile_from_directions(joined) else {
            tracing::debug!(
                "No tile for {:?} at ({}, {}), not joining",
                joined,
                neighbour.x,
                neighbour.y
            );
            continue;
        };

        match grid.replace_tile(tile, layer, neighbour) {
            Ok(()) => {
                tracing::debug!(
                    "Joined neighbour at ({}, {}) as {}",
                    neighbour.x,
                    neighbour.y,
                    tile
                );
                mask |= dir.flag();
                joined_neighbours.push(neighbour);
            }
            Err(err) => {
                tracing::warn!(
                    "Could not join neighbour at ({}, {}): {}",
                    neighbour.x,
                    neighbour.y,
                    err
                );
            }
        }
    }

    place_single(table, grid, layer, instruction, mask, mode)
}

fn place_single<G: TileGrid + ?Sized>(
    table: &PathTileTable,
    grid: &mut G,
    layer: usize,
    instruction: &PlacementInstruction,
    mask: Directions,
    mode: PlacementMode,
) -> PlacementRecord {
    let pos = instruction.pos;
    let outcome = match table.tile_from_directions(mask) {
        Some(tile) => match grid.place_tile(tile, layer, pos, mode) {
            Ok(()) => PlacementOutcome::Placed(tile.to_string()),
            Err(err) => {
                tracing::warn!("Could not place {} at ({}, {}): {}", tile, pos.x, pos.y, err);
                PlacementOutcome::Failed(err)
            }
        },
        None => {
            tracing::debug!("No tile for {:?} at ({}, {})", mask, pos.x, pos.y);
            PlacementOutcome::Unresolved
        }
    };

    PlacementRecord {
        instruction: *instruction,
        directions: mask,
        outcome,
    }
}
