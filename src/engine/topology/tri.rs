//! Triangular grid of alternating up and down triangles.

use super::Offset;
use crate::schema::Adjacency;

/// Whether the triangle at (row, col) points up.
#[inline]
pub fn points_up(row: usize, col: usize) -> bool {
    (row + col) % 2 == 0
}

/// Edge neighbors of an up triangle: left, right and the base below.
const UP_SIDES: [Offset; 3] = [(0, -1), (0, 1), (1, 0)];

/// Vertex-only neighbors of an up triangle.
const UP_VERTICES: [Offset; 9] = [
    (0, -2),
    (0, 2),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (1, -2),
    (1, -1),
    (1, 1),
    (1, 2),
];

pub(super) fn offsets(row: usize, col: usize, adjacency: Adjacency) -> Vec<Offset> {
    // A down triangle is an up triangle mirrored across its row.
    let flip: isize = if points_up(row, col) { 1 } else { -1 };
    let mut offsets = Vec::with_capacity(12);
    if adjacency.includes_sides() {
        offsets.extend(UP_SIDES.iter().map(|&(dr, dc)| (dr * flip, dc)));
    }
    if adjacency.includes_diagonals() {
        offsets.extend(UP_VERTICES.iter().map(|&(dr, dc)| (dr * flip, dc)));
    }
    offsets
}
