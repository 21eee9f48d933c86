//! Rectangle autotiling
//!
//! Rect autotiles do not resolve tiles themselves. The session tracks the
//! dragged rectangle and hands it to the grid's rectangle routine.

use tilepath_core::{GridPos, GridRect, PlacementError, PlacementMode, TileGrid};

use crate::definition::AutotileDefinition;

/// Move `end` so the rectangle from `start` is square, keeping the drag direction
/// on each axis. A zero delta counts as positive.
pub fn square_end(start: GridPos, end: GridPos) -> GridPos {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let size = dx.abs().max(dy.abs());
    let sign = |d: i32| if d < 0 { -1 } else { 1 };
    start.offset(size * sign(dx), size * sign(dy))
}

/// Bounds of the rectangle dragged from `start` to `end`
pub fn rect_bounds(start: GridPos, end: GridPos, constrain_to_square: bool) -> GridRect {
    let end = if constrain_to_square {
        square_end(start, end)
    } else {
        end
    };
    GridRect::from_corners(start, end)
}

/// An in-progress rectangle drag
#[derive(Debug, Clone)]
pub struct RectSession<'a> {
    definition: &'a AutotileDefinition,
    start: GridPos,
    end: GridPos,
}

impl<'a> RectSession<'a> {
    pub(crate) fn new(definition: &'a AutotileDefinition, start: GridPos) -> Self {
        Self {
            definition,
            start,
            end: start,
        }
    }

    pub fn definition(&self) -> &AutotileDefinition {
        self.definition
    }

    pub fn start(&self) -> GridPos {
        self.start
    }

    /// Move the dragged corner
    pub fn update(&mut self, end: GridPos) {
        self.end = end;
    }

    /// The rectangle that `finish` would fill
    pub fn bounds(&self) -> GridRect {
        rect_bounds(self.start, self.end, self.definition.constrain_to_square)
    }

    /// Fill the rectangle. Returns the bounds that were handed to the grid.
    pub fn finish<G: TileGrid + ?Sized>(
        self,
        grid: &mut G,
        layer: usize,
        mode: PlacementMode,
        place_geometry: bool,
    ) -> Result<GridRect, PlacementError> {
        let bounds = self.bounds();
        tracing::info!(
            "Run autotile {} over ({}, {})-({}, {})",
            self.definition.name,
            bounds.min.x,
            bounds.min.y,
            bounds.max.x,
            bounds.max.y
        );

        grid.place_rect(bounds, layer, mode, place_geometry)
            .map_err(|err| {
                tracing::warn!("Autotile {} failed: {}", self.definition.name, err);
                err
            })?;
        Ok(bounds)
    }
}
