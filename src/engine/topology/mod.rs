//! Grid topology - Neighbor sets for square, hexagonal and triangular tilings.
//!
//! Each shape yields row/column offsets for a cell. Offsets that leave the
//! grid are dropped or wrapped to the opposite edge depending on the edge mode.

mod hex;
mod square;
mod tri;

pub use tri::points_up;

use crate::schema::{Adjacency, ConfigError, EdgeMode, Shape, SimulationConfig};

/// Row and column displacement from a cell to a neighbor.
pub type Offset = (isize, isize);

/// Neighbor lookup for a flat row-major grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    width: usize,
    height: usize,
    shape: Shape,
    adjacency: Adjacency,
    edges: EdgeMode,
}

impl Topology {
    pub fn new(
        width: usize,
        height: usize,
        shape: Shape,
        adjacency: Adjacency,
        edges: EdgeMode,
    ) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 || width.checked_mul(height).is_none() {
            return Err(ConfigError::InvalidDimensions);
        }
        if shape == Shape::Hex && adjacency == Adjacency::Diagonal {
            return Err(ConfigError::UnsupportedAdjacency { shape, adjacency });
        }
        Ok(Self {
            width,
            height,
            shape,
            adjacency,
            edges,
        })
    }

    /// Topology of a configuration, using its effective edge mode.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.width,
            config.height,
            config.shape,
            config.adjacency,
            config.effective_edges(),
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn adjacency(&self) -> Adjacency {
        self.adjacency
    }

    pub fn edges(&self) -> EdgeMode {
        self.edges
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert (row, col) to a flat index.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Convert a flat index to (row, col).
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.width, index % self.width)
    }

    /// Raw offsets for the cell at `index`, before edge handling.
    pub fn offsets(&self, index: usize) -> Vec<Offset> {
        let (row, col) = self.coords(index);
        match self.shape {
            Shape::Square => square::offsets(self.adjacency),
            Shape::Hex => hex::offsets(col, self.adjacency),
            Shape::Tri => tri::offsets(row, col, self.adjacency),
        }
    }

    fn resolve(&self, index: usize, (drow, dcol): Offset) -> Option<usize> {
        let (row, col) = self.coords(index);
        let (height, width) = (self.height as isize, self.width as isize);
        let row = row as isize + drow;
        let col = col as isize + dcol;
        if (0..height).contains(&row) && (0..width).contains(&col) {
            return Some(self.index(row as usize, col as usize));
        }
        match self.edges {
            EdgeMode::Wrap => Some(self.index(
                row.rem_euclid(height) as usize,
                col.rem_euclid(width) as usize,
            )),
            EdgeMode::Clip => None,
        }
    }

    /// Neighbor indices of `index` in offset order, without self or duplicates.
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        if index >= self.len() {
            return Vec::new();
        }
        let mut neighbors = Vec::with_capacity(12);
        for offset in self.offsets(index) {
            if let Some(n) = self.resolve(index, offset)
                && n != index
                && !neighbors.contains(&n)
            {
                neighbors.push(n);
            }
        }
        neighbors
    }

    /// Neighbor lists for every cell.
    pub fn neighbor_table(&self) -> Vec<Vec<usize>> {
        (0..self.len()).map(|index| self.neighbors(index)).collect()
    }

    /// Reverse of a neighbor table: for each cell, the cells listing it.
    ///
    /// Equal to the table itself whenever the relation is symmetric.
    pub fn listener_table(neighbors: &[Vec<usize>]) -> Vec<Vec<usize>> {
        let mut listeners = vec![Vec::new(); neighbors.len()];
        for (index, list) in neighbors.iter().enumerate() {
            for &n in list {
                listeners[n].push(index);
            }
        }
        listeners
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn topology(
        width: usize,
        height: usize,
        shape: Shape,
        adjacency: Adjacency,
        edges: EdgeMode,
    ) -> Topology {
        Topology::new(width, height, shape, adjacency, edges).unwrap()
    }

    #[test]
    fn test_square_corner_clip_and_wrap() {
        let clip = topology(5, 5, Shape::Square, Adjacency::Orthogonal, EdgeMode::Clip);
        assert_eq!(clip.neighbors(0), vec![1, 5]);

        let wrap = topology(5, 5, Shape::Square, Adjacency::Orthogonal, EdgeMode::Wrap);
        assert_eq!(wrap.neighbors(0), vec![4, 1, 20, 5]);
    }

    #[test]
    fn test_square_adjacency_sets() {
        let all = topology(5, 5, Shape::Square, Adjacency::All, EdgeMode::Clip);
        assert_eq!(all.neighbors(12).len(), 8);
        assert_eq!(all.neighbors(0).len(), 3);

        let diagonal = topology(5, 5, Shape::Square, Adjacency::Diagonal, EdgeMode::Clip);
        assert_eq!(diagonal.neighbors(12), vec![6, 8, 16, 18]);
    }

    #[test]
    fn test_hex_rows_shift_with_column_parity() {
        let hex = topology(5, 5, Shape::Hex, Adjacency::Orthogonal, EdgeMode::Clip);
        // Even column: extra neighbors are one row up.
        assert_eq!(hex.neighbors(hex.index(2, 2)), vec![11, 13, 7, 17, 6, 8]);
        // Odd column: extra neighbors are one row down.
        assert_eq!(hex.neighbors(hex.index(2, 1)), vec![10, 12, 6, 16, 15, 17]);
        // Adjacency::All is the same six sides.
        let all = topology(5, 5, Shape::Hex, Adjacency::All, EdgeMode::Clip);
        assert_eq!(all.neighbors(12), hex.neighbors(12));
    }

    #[test]
    fn test_hex_rejects_diagonal() {
        assert!(matches!(
            Topology::new(4, 4, Shape::Hex, Adjacency::Diagonal, EdgeMode::Clip),
            Err(ConfigError::UnsupportedAdjacency { .. })
        ));
    }

    #[test]
    fn test_tri_orientation() {
        let tri = topology(6, 6, Shape::Tri, Adjacency::Orthogonal, EdgeMode::Clip);
        assert!(points_up(2, 2));
        assert_eq!(tri.neighbors(tri.index(2, 2)), vec![13, 15, 20]);
        assert!(!points_up(2, 3));
        assert_eq!(tri.neighbors(tri.index(2, 3)), vec![14, 16, 9]);

        let all = topology(6, 6, Shape::Tri, Adjacency::All, EdgeMode::Clip);
        assert_eq!(all.neighbors(all.index(2, 2)).len(), 12);
        let diagonal = topology(6, 6, Shape::Tri, Adjacency::Diagonal, EdgeMode::Clip);
        assert_eq!(diagonal.neighbors(diagonal.index(2, 3)).len(), 9);
    }

    #[test]
    fn test_narrow_wrap_drops_self_and_duplicates() {
        let column = topology(1, 3, Shape::Square, Adjacency::All, EdgeMode::Wrap);
        assert_eq!(column.neighbors(1), vec![0, 2]);

        let single = topology(1, 1, Shape::Tri, Adjacency::All, EdgeMode::Wrap);
        assert!(single.neighbors(0).is_empty());
    }

    #[test]
    fn test_listener_table_reverses_neighbors() {
        let neighbors = vec![vec![1, 2], vec![2], vec![]];
        let listeners = Topology::listener_table(&neighbors);
        assert_eq!(listeners, vec![vec![], vec![0], vec![0, 1]]);
    }

    #[test]
    fn test_out_of_range_index_has_no_neighbors() {
        let grid = topology(3, 3, Shape::Square, Adjacency::All, EdgeMode::Wrap);
        assert!(grid.neighbors(9).is_empty());
    }

    fn shapes() -> impl Strategy<Value = (Shape, Adjacency)> {
        prop_oneof![
            Just((Shape::Square, Adjacency::Orthogonal)),
            Just((Shape::Square, Adjacency::Diagonal)),
            Just((Shape::Square, Adjacency::All)),
            Just((Shape::Hex, Adjacency::Orthogonal)),
            Just((Shape::Tri, Adjacency::Orthogonal)),
            Just((Shape::Tri, Adjacency::Diagonal)),
            Just((Shape::Tri, Adjacency::All)),
        ]
    }

    proptest! {
        #[test]
        fn clipped_neighbors_are_symmetric(
            width in 1usize..9,
            height in 1usize..9,
            (shape, adjacency) in shapes(),
        ) {
            let grid = topology(width, height, shape, adjacency, EdgeMode::Clip);
            let table = grid.neighbor_table();
            for (index, list) in table.iter().enumerate() {
                for &n in list {
                    prop_assert!(table[n].contains(&index), "{index} -> {n} is one-way");
                }
            }
            prop_assert_eq!(Topology::listener_table(&table).len(), table.len());
        }

        #[test]
        fn neighbors_are_unique_and_in_range(
            width in 1usize..9,
            height in 1usize..9,
            (shape, adjacency) in shapes(),
            wrap in any::<bool>(),
        ) {
            let edges = if wrap { EdgeMode::Wrap } else { EdgeMode::Clip };
            let grid = topology(width, height, shape, adjacency, edges);
            for index in 0..grid.len() {
                let list = grid.neighbors(index);
                prop_assert!(!list.contains(&index));
                prop_assert!(list.iter().all(|&n| n < grid.len()));
                let mut sorted = list.clone();
                sorted.sort_unstable();
                sorted.dedup();
                prop_assert_eq!(sorted.len(), list.len());
            }
        }
    }
}
