//! Segment resolver
//!
//! Splits a finished path into turn nodes and straight runs and produces the
//! placement instructions handed to the placement engine.

use serde::{Deserialize, Serialize};
use tilepath_core::GridPos;

use crate::direction::{Direction, Directions};
use crate::path::path_directions;

/// One tile to place: where, with which connectivity, and in what order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementInstruction {
    /// Head cell of the tile
    pub pos: GridPos,
    pub directions: Directions,
    /// Index of the path node this instruction came from
    pub index: usize,
}

/// Resolve a canonical path into placement instructions sorted by node index.
///
/// Turn nodes are emitted with their own connectivity. Straight runs between
/// turns emit one instruction every `segment_length` nodes, using the run's
/// axis, except at the path ends which keep the end node's connectivity so
/// they can become caps.
pub fn resolve_segments(
    nodes: &[GridPos],
    thickness: u32,
    segment_length: u32,
) -> Vec<PlacementInstruction> {
    let count = nodes.len();
    if count < 2 {
        return Vec::new();
    }

    let thickness = thickness.max(1) as usize;
    let segment_length = segment_length.max(1) as usize;
    let half = thickness / 2;
    let even = thickness % 2 == 0;

    let dirs: Vec<Directions> = (0..count).map(|i| path_directions(nodes, i)).collect();
    let first_index = usize::from(even);
    let mut line_start = first_index;
    let mut instructions = Vec::new();

    let mut i = 0;
    while i <= count {
        let mut line_end = None;

        if i < count {
            if dirs[i].is_turn() {
                instructions.push(PlacementInstruction {
                    pos: turn_position(nodes[i], even),
                    directions: dirs[i],
                    index: i,
                });
                // a turn too close to the start closes no run
                line_end = (i + usize::from(even)).checked_sub(half);
                i += half;
            }
        } else {
            line_end = Some(count);
        }

        if let Some(line_end) = line_end {
            if line_start < count {
                push_run(
                    &mut instructions,
                    nodes,
                    &dirs,
                    line_start..line_end,
                    first_index,
                    segment_length,
                    even,
                );
                line_start = i + 1;
            }
        }

        i += 1;
    }

    instructions.sort_by_key(|inst| inst.index);
    instructions
}

/// Emit the straight-run instructions for nodes `run`
fn push_run(
    instructions: &mut Vec<PlacementInstruction>,
    nodes: &[GridPos],
    dirs: &[Directions],
    run: std::ops::Range<usize>,
    first_index: usize,
    segment_length: usize,
    even: bool,
) {
    let count = nodes.len();
    let start = run.start;
    let axis = if start == count - 1 {
        Direction::between(nodes[start - 1], nodes[start])
    } else {
        Direction::between(nodes[start], nodes[start + 1])
    };
    let Some(axis) = axis else {
        tracing::debug!("path is not contiguous at node {}, skipping run", start);
        return;
    };
    let axis_flags = if axis.is_horizontal() {
        Directions::HORIZONTAL
    } else {
        Directions::VERTICAL
    };

    for j in run.step_by(segment_length) {
        let directions = if j == first_index {
            dirs[0]
        } else if j + segment_length >= count {
            dirs[count - 1]
        } else {
            axis_flags
        };

        instructions.push(PlacementInstruction {
            pos: run_position(nodes[j], axis, even),
            directions,
            index: j,
        });
    }
}

/// Even thickness paths sit on grid lines; their tiles are anchored one cell
/// up and to the left of the node unless the run heads that way.
fn run_position(node: GridPos, axis: Direction, even: bool) -> GridPos {
    if !even {
        return node;
    }
    let (dx, dy) = axis.offset();
    GridPos::new(
        if dx < 0 { node.x } else { node.x - 1 },
        if dy < 0 { node.y } else { node.y - 1 },
    )
}

fn turn_position(node: GridPos, even: bool) -> GridPos {
    if even {
        node.offset(-1, -1)
    } else {
        node
    }
}
