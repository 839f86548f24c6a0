//! Hexagonal grid with columns offset by half a cell.
//!
//! Hexagons only meet along sides, so every adjacency mode that includes
//! sides yields the same six neighbors.

use super::Offset;
use crate::schema::Adjacency;

pub(super) fn offsets(col: usize, adjacency: Adjacency) -> Vec<Offset> {
    if !adjacency.includes_sides() {
        return Vec::new();
    }
    // Even columns sit half a row higher than odd ones.
    let shift = if col % 2 == 0 { -1 } else { 1 };
    vec![(0, -1), (0, 1), (-1, 0), (1, 0), (shift, -1), (shift, 1)]
}
