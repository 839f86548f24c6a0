use super::Offset;
use crate::schema::Adjacency;

const SIDES: [Offset; 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const CORNERS: [Offset; 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub(super) fn offsets(adjacency: Adjacency) -> Vec<Offset> {
    let mut offsets = Vec::with_capacity(8);
    if adjacency.includes_sides() {
        offsets.extend(SIDES);
    }
    if adjacency.includes_diagonals() {
        offsets.extend(CORNERS);
    }
    offsets
}
