//! Hex grid topology.
//!
//! The board is a stack of rows of varying width, centred on each other, so
//! that a row of width `w` sits half a space in from a row of width `w + 1`.
//! Adjacency of `(r, c)`:
//!
//! - same row: `(r, c - 1)` and `(r, c + 1)`
//! - rows `r ± 1`: the `floor` and `ceil` of `c - (width[r] - width[r±1]) / 2`
//!
//! Out-of-range columns are dropped.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::tile::Coord;

/// Neighbor list; a hex has at most six.
pub type Neighbors = SmallVec<[Coord; 6]>;

/// Row widths and the derived row-major indexing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexLayout {
    row_widths: Vec<usize>,
    row_offsets: Vec<usize>,
}

impl HexLayout {
    /// Build a layout from row widths.
    #[must_use]
    pub fn new(row_widths: &[usize]) -> Self {
        let mut row_offsets = Vec::with_capacity(row_widths.len());
        let mut offset = 0;
        for &width in row_widths {
            row_offsets.push(offset);
            offset += width;
        }
        Self {
            row_widths: row_widths.to_vec(),
            row_offsets,
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.row_widths.len()
    }

    /// Width of a row, 0 when the row does not exist.
    #[must_use]
    pub fn width(&self, row: usize) -> usize {
        self.row_widths.get(row).copied().unwrap_or(0)
    }

    /// Total number of spaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.row_widths.iter().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.col < self.width(coord.row)
    }

    /// Row-major index of a coordinate.
    #[must_use]
    pub fn index_of(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(self.row_offsets[coord.row] + coord.col)
        } else {
            None
        }
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.row_widths
            .iter()
            .enumerate()
            .flat_map(|(row, &width)| (0..width).map(move |col| Coord::new(row, col)))
    }

    /// Adjacent coordinates of `coord`.
    ///
    /// ```
    /// use terraform_engine::board::{Coord, HexLayout};
    ///
    /// let layout = HexLayout::new(&[5, 6, 7, 8, 9, 8, 7, 6, 5]);
    /// // Interior spaces have six neighbors.
    /// assert_eq!(layout.neighbors(Coord::new(4, 4)).len(), 6);
    /// // A corner of the top row has three.
    /// assert_eq!(layout.neighbors(Coord::new(0, 0)).len(), 3);
    /// ```
    #[must_use]
    pub fn neighbors(&self, coord: Coord) -> Neighbors {
        let mut out = Neighbors::new();
        if !self.contains(coord) {
            return out;
        }

        let Coord { row, col } = coord;
        if col > 0 {
            out.push(Coord::new(row, col - 1));
        }
        if col + 1 < self.width(row) {
            out.push(Coord::new(row, col + 1));
        }

        let here = self.width(row) as i64;
        let candidate_rows = [row.checked_sub(1), Some(row + 1)];
        for other in candidate_rows.into_iter().flatten() {
            let there = self.width(other) as i64;
            if there == 0 {
                continue;
            }
            // Twice the fractional column: 2c - (w[r] - w[r±1]).
            let doubled = 2 * col as i64 - (here - there);
            let floor = doubled.div_euclid(2);
            let ceil = floor + doubled.rem_euclid(2);
            for c in [floor, ceil] {
                if c >= 0 && c < there {
                    let neighbor = Coord::new(other, c as usize);
                    if !out.contains(&neighbor) {
                        out.push(neighbor);
                    }
                }
            }
        }
        out
    }

    /// Check whether two coordinates touch.
    #[must_use]
    pub fn are_adjacent(&self, a: Coord, b: Coord) -> bool {
        self.neighbors(a).contains(&b)
    }
}
