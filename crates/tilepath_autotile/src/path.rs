//! Path normalizer
//!
//! Turns a stream of cursor cells into a canonical path: every node is one
//! step from the previous one, no cell repeats, and turns respect the path
//! thickness and segment length of the autotile being drawn.

use tilepath_core::GridPos;

use crate::direction::{Direction, Directions};

/// Whether a path has been started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    Empty,
    Building,
}

/// What an [`PathBuilder::update`] call did to the path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathUpdate {
    /// The first node was placed
    Started,
    /// This many nodes were appended
    Extended(usize),
    /// The last node was removed because the cursor moved back onto the one before it
    Retracted,
    /// Nothing changed
    Unchanged,
}

/// Connectivity of node `i`: a side is connected when the previous or next
/// node sits exactly one cell away on that side.
///
/// The open ends of the path compare against the node itself, so the first
/// and last nodes only connect inwards.
pub fn path_directions(nodes: &[GridPos], i: usize) -> Directions {
    let Some(&current) = nodes.get(i) else {
        return Directions::empty();
    };
    let prev = if i > 0 { nodes[i - 1] } else { current };
    let next = nodes.get(i + 1).copied().unwrap_or(current);

    let mut dirs = Directions::empty();
    for neighbour in [prev, next] {
        if let Some(dir) = Direction::between(current, neighbour) {
            dirs |= dir.flag();
        }
    }
    dirs
}

/// Builds a path one cursor sample at a time
#[derive(Debug, Clone)]
pub struct PathBuilder {
    nodes: Vec<GridPos>,
    thickness: u32,
    segment_length: u32,
}

impl PathBuilder {
    /// Create an empty path. Zero thickness or segment length is treated as 1.
    pub fn new(thickness: u32, segment_length: u32) -> Self {
        Self {
            nodes: Vec::new(),
            thickness: thickness.max(1),
            segment_length: segment_length.max(1),
        }
    }

    pub fn state(&self) -> PathState {
        if self.nodes.is_empty() {
            PathState::Empty
        } else {
            PathState::Building
        }
    }

    pub fn nodes(&self) -> &[GridPos] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn thickness(&self) -> u32 {
        self.thickness
    }

    pub fn segment_length(&self) -> u32 {
        self.segment_length
    }

    /// Connectivity of node `i` of the current path
    pub fn directions(&self, i: usize) -> Directions {
        path_directions(&self.nodes, i)
    }

    /// Feed one cursor sample into the path
    pub fn update(&mut self, pos: GridPos) -> PathUpdate {
        let Some(&last) = self.nodes.last() else {
            self.nodes.push(pos);
            return PathUpdate::Started;
        };

        if pos == last {
            return PathUpdate::Unchanged;
        }

        if self.nodes.len() >= 2 && self.nodes[self.nodes.len() - 2] == pos {
            self.nodes.pop();
            return PathUpdate::Retracted;
        }

        if last.is_adjacent(pos) {
            return if self.extend(pos) {
                PathUpdate::Extended(1)
            } else {
                PathUpdate::Unchanged
            };
        }

        let mut added = 0;
        for step in self.route(pos) {
            if !self.extend(step) {
                break;
            }
            added += 1;
        }

        if added == 0 {
            PathUpdate::Unchanged
        } else {
            PathUpdate::Extended(added)
        }
    }

    /// Append `pos` if it is new to the path and a legal single step
    fn extend(&mut self, pos: GridPos) -> bool {
        if self.nodes.contains(&pos) || !self.can_append(pos) {
            return false;
        }
        self.nodes.push(pos);
        true
    }

    /// Whether a single step to `pos` respects the turn rules.
    ///
    /// Turning is refused while the path is shorter than half its
    /// thickness, in the middle of a segment, and within `thickness` nodes of
    /// an earlier turn.
    pub fn can_append(&self, pos: GridPos) -> bool {
        let Some(&last) = self.nodes.last() else {
            return true;
        };
        let Some(step) = Direction::between(last, pos) else {
            return false;
        };

        let count = self.nodes.len();
        let thickness = self.thickness as usize;
        let segment_length = self.segment_length as usize;

        let mut no_turn = count <= thickness / 2;

        if segment_length > 1 && count % segment_length != 1 {
            no_turn = true;
        }

        if count >= thickness {
            no_turn |= (count - thickness..count - 1).any(|i| self.directions(i).is_turn());
        }

        if no_turn && count >= 2 {
            let last_step = Direction::between(self.nodes[count - 2], last);
            return last_step == Some(step);
        }

        true
    }

    /// Cells of the shortest Manhattan route from the last node to `target`,
    /// excluding the last node itself. Cells are produced lazily so a far
    /// sample costs nothing past the first illegal step.
    ///
    /// The route keeps going along the axis of the most recent step when the
    /// target lies ahead on that axis, so long drags do not zig-zag. When the
    /// target lies behind it, the other axis goes first.
    fn route(&self, target: GridPos) -> impl Iterator<Item = GridPos> {
        let last = self.nodes.last().copied().unwrap_or(target);
        let dx = target.x - last.x;
        let dy = target.y - last.y;

        let horizontal_first = match self.last_step() {
            Some(Direction::Right) => dx > 0 || dy == 0,
            Some(Direction::Left) => dx < 0 || dy == 0,
            Some(Direction::Up) => !(dy < 0 || dx == 0),
            Some(Direction::Down) => !(dy > 0 || dx == 0),
            None => dx.abs() >= dy.abs(),
        };

        let (first, first_len, second, second_len) = if horizontal_first {
            ((dx.signum(), 0), dx.abs(), (0, dy.signum()), dy.abs())
        } else {
            ((0, dy.signum()), dy.abs(), (dx.signum(), 0), dx.abs())
        };
        let corner = last.offset(first.0 * first_len, first.1 * first_len);

        (1..=first_len)
            .map(move |n| last.offset(first.0 * n, first.1 * n))
            .chain((1..=second_len).map(move |n| corner.offset(second.0 * n, second.1 * n)))
    }

    fn last_step(&self) -> Option<Direction> {
        match self.nodes.as_slice() {
            [.., a, b] => Direction::between(*a, *b),
            _ => None,
        }
    }

    /// Consume the builder, returning its nodes
    pub fn into_nodes(self) -> Vec<GridPos> {
        self.nodes
    }
}
