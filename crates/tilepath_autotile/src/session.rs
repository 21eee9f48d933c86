//! Interactive autotile sessions
//!
//! A session lives for one input gesture: it is started from a definition,
//! fed cursor cells while the pointer is held, and finished once. Nothing
//! touches the grid before `finish`, so dropping a session cancels it.

use thiserror::Error;
use tilepath_core::{GridPos, PlacementMode, TileGrid};

use crate::definition::{AutotileDefinition, AutotileShape};
use crate::path::{PathBuilder, PathState, PathUpdate};
use crate::placement::{place_instructions, PlacementReport};
use crate::rect::RectSession;
use crate::segment::{resolve_segments, PlacementInstruction};
use crate::table::PathTileTable;

/// Why a session could not be started
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutotileError {
    #[error("autotile '{0}' has configuration errors and cannot be used")]
    Inactive(String),
    #[error("autotile '{name}' is not a {expected} autotile")]
    WrongShape { name: String, expected: &'static str },
}

/// Start drawing a path with a path autotile
pub fn begin_path_session(
    definition: &AutotileDefinition,
) -> Result<PathSession<'_>, AutotileError> {
    let AutotileShape::Path(table) = &definition.shape else {
        return Err(AutotileError::WrongShape {
            name: definition.name.clone(),
            expected: "path",
        });
    };
    if !definition.can_activate() {
        return Err(AutotileError::Inactive(definition.name.clone()));
    }

    Ok(PathSession {
        definition,
        table,
        builder: PathBuilder::new(definition.path_thickness, definition.segment_length),
    })
}

/// Start dragging a rectangle with a rect autotile
pub fn begin_rect_session(
    definition: &AutotileDefinition,
    start: GridPos,
) -> Result<RectSession<'_>, AutotileError> {
    if definition.is_path() {
        return Err(AutotileError::WrongShape {
            name: definition.name.clone(),
            expected: "rect",
        });
    }
    if !definition.can_activate() {
        return Err(AutotileError::Inactive(definition.name.clone()));
    }

    Ok(RectSession::new(definition, start))
}

/// An in-progress path drawn with one autotile
#[derive(Debug, Clone)]
pub struct PathSession<'a> {
    definition: &'a AutotileDefinition,
    table: &'a PathTileTable,
    builder: PathBuilder,
}

impl<'a> PathSession<'a> {
    pub fn definition(&self) -> &AutotileDefinition {
        self.definition
    }

    pub fn state(&self) -> PathState {
        self.builder.state()
    }

    pub fn nodes(&self) -> &[GridPos] {
        self.builder.nodes()
    }

    /// Feed one cursor cell
    pub fn update(&mut self, pos: GridPos) -> PathUpdate {
        self.builder.update(pos)
    }

    /// Instructions for the current path, without touching the grid
    pub fn preview(&self) -> Vec<PlacementInstruction> {
        resolve_segments(
            self.builder.nodes(),
            self.builder.thickness(),
            self.builder.segment_length(),
        )
    }

    /// Place the path on `layer`
    pub fn finish<G: TileGrid + ?Sized>(
        self,
        grid: &mut G,
        layer: usize,
        mode: PlacementMode,
    ) -> PlacementReport {
        let instructions = self.preview();
        tracing::info!(
            "Run autotile {} ({} nodes, {} tiles)",
            self.definition.name,
            self.builder.len(),
            instructions.len()
        );

        place_instructions(self.table, grid, layer, &instructions, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::PlacementOutcome;
    use crate::testing::{pipe_definition, tile_database, tile_database_for, RecordingGrid};
    use tilepath_core::{GeoType, Level, LevelGrid};

    fn draw(session: &mut PathSession<'_>, cells: &[(i32, i32)]) {
        for &cell in cells {
            session.update(GridPos::from(cell));
        }
    }

    fn placed_tiles(report: &PlacementReport) -> Vec<Option<&str>> {
        report
            .records
            .iter()
            .map(|r| match &r.outcome {
                PlacementOutcome::Placed(tile) | PlacementOutcome::Joined(tile) => {
                    Some(tile.as_str())
                }
                _ => None,
            })
            .collect()
    }

    const L_PATH: [(i32, i32); 5] = [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)];

    #[test]
    fn test_end_to_end_with_caps() {
        let definition = pipe_definition(false, true);
        let mut session = begin_path_session(&definition).unwrap();
        draw(&mut session, &L_PATH);
        assert_eq!(session.nodes().len(), 5);

        let mut grid = RecordingGrid::new(10, 10);
        let report = session.finish(&mut grid, 0, PlacementMode::Normal);

        assert_eq!(
            placed_tiles(&report),
            vec![
                Some("Pipe Cap Left"),
                Some("Pipe Horizontal"),
                Some("Pipe LD"),
                Some("Pipe Vertical"),
                Some("Pipe Cap Down"),
            ]
        );
    }

    #[test]
    fn test_end_to_end_without_caps() {
        let definition = pipe_definition(false, false);
        let mut session = begin_path_session(&definition).unwrap();
        draw(&mut session, &L_PATH);

        let mut grid = RecordingGrid::new(10, 10);
        let report = session.finish(&mut grid, 0, PlacementMode::Normal);

        assert_eq!(
            placed_tiles(&report),
            vec![
                Some("Pipe Horizontal"),
                Some("Pipe Horizontal"),
                Some("Pipe LD"),
                Some("Pipe Vertical"),
                Some("Pipe Vertical"),
            ]
        );
    }

    #[test]
    fn test_end_to_end_on_level() {
        let db = tile_database();
        let definition = pipe_definition(true, true);
        let mut level = Level::new(6, 6);
        level.fill_geometry(0, GeoType::Solid);

        {
            let mut grid = LevelGrid::new(&mut level, &db);
            let mut first = begin_path_session(&definition).unwrap();
            draw(&mut first, &[(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)]);
            assert!(first.finish(&mut grid, 0, PlacementMode::Normal).is_complete());

            // a second path crossing the first one
            let mut second = begin_path_session(&definition).unwrap();
            draw(&mut second, &[(2, 0), (2, 1)]);
            let report = second.finish(&mut grid, 0, PlacementMode::Normal);
            assert!(report.is_complete());
        }

        assert_eq!(level.tile_head_at(0, GridPos::new(2, 2)), Some("Pipe TD"));
        assert_eq!(level.tile_head_at(0, GridPos::new(2, 1)), Some("Pipe Vertical"));
        assert_eq!(level.tile_head_at(0, GridPos::new(2, 0)), Some("Pipe Cap Up"));
        assert_eq!(level.tile_head_at(0, GridPos::new(0, 2)), Some("Pipe Cap Left"));
        assert_eq!(level.tile_count(0), 7);
    }

    #[test]
    fn test_turn_minimum_run_in_both_modes() {
        for allow_junctions in [false, true] {
            let mut definition = pipe_definition(allow_junctions, false).with_thickness(3);
            assert!(definition.validate(&tile_database_for(3, 1)).is_empty());

            let mut session = begin_path_session(&definition).unwrap();
            draw(&mut session, &[(0, 0), (0, 1), (1, 1), (1, 2), (2, 2), (2, 3)]);

            // the turns at (1, 2) and (2, 2) are refused
            let nodes = session.nodes();
            assert_eq!(nodes.len(), 4);
            for i in 0..nodes.len() {
                if crate::path::path_directions(nodes, i).is_turn() {
                    assert!(i >= 1, "turn at {i}");
                }
            }
            assert!(session
                .preview()
                .iter()
                .filter(|inst| inst.directions.is_turn())
                .all(|inst| inst.index >= 1));
        }
    }

    #[test]
    fn test_preview_does_not_touch_grid() {
        let definition = pipe_definition(true, true);
        let mut session = begin_path_session(&definition).unwrap();
        assert_eq!(session.state(), PathState::Empty);
        assert!(session.preview().is_empty());

        draw(&mut session, &L_PATH);
        assert_eq!(session.preview().len(), 5);

        // dropping the session is a cancel
        drop(session);
    }

    #[test]
    fn test_single_node_finish_places_nothing() {
        let definition = pipe_definition(false, true);
        let mut session = begin_path_session(&definition).unwrap();
        session.update(GridPos::new(3, 3));

        let mut grid = RecordingGrid::new(10, 10);
        let report = session.finish(&mut grid, 0, PlacementMode::Normal);
        assert!(report.records.is_empty());
        assert!(grid.calls.is_empty());
    }

    #[test]
    fn test_inactive_definition_is_refused() {
        let definition = AutotileDefinition::path("Unchecked", crate::testing::full_table());
        assert_eq!(
            begin_path_session(&definition).unwrap_err(),
            AutotileError::Inactive("Unchecked".to_string())
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let path = pipe_definition(false, false);
        let rect = AutotileDefinition::rect("Blocks");

        assert!(matches!(
            begin_rect_session(&path, GridPos::ZERO),
            Err(AutotileError::WrongShape { expected: "rect", .. })
        ));
        assert!(matches!(
            begin_path_session(&rect),
            Err(AutotileError::WrongShape { expected: "path", .. })
        ));
        assert!(begin_rect_session(&rect, GridPos::ZERO).is_ok());
    }
}
