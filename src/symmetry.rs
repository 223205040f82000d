//! Symmetry group operations for square boards
//!
//! A square grid has 8 symmetries (4 rotations times an optional
//! reflection). The canonicalizer enumerates them in a fixed order: the
//! vertical flip first, then counter-clockwise quarter turns.

use serde::{Deserialize, Serialize};

use crate::board::Cell;

/// A symmetry of the n x n grid: an optional vertical flip (rows reversed)
/// followed by `rotations` counter-clockwise quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSymmetry {
    size: usize,
    /// Number of 90-degree counter-clockwise rotations (0-3)
    pub rotations: usize,
    /// Whether the vertical flip is applied before rotating
    pub flipped: bool,
}

impl GridSymmetry {
    /// Create a symmetry for a board side length
    pub fn new(size: usize, rotations: usize, flipped: bool) -> Self {
        GridSymmetry {
            size,
            rotations: rotations % 4,
            flipped,
        }
    }

    /// The identity symmetry
    pub fn identity(size: usize) -> Self {
        Self::new(size, 0, false)
    }

    /// All 8 symmetries in canonical enumeration order: unflipped then
    /// flipped, rotations ascending within each.
    pub fn all(size: usize) -> impl Iterator<Item = GridSymmetry> {
        [false, true]
            .into_iter()
            .flat_map(move |flipped| (0..4).map(move |rotations| Self::new(size, rotations, flipped)))
    }

    /// Map a flattened position through the symmetry
    pub fn transform_index(&self, position: usize) -> usize {
        let n = self.size;
        let (mut row, mut col) = (position / n, position % n);

        if self.flipped {
            row = n - 1 - row;
        }

        for _ in 0..self.rotations {
            let (new_row, new_col) = (n - 1 - col, row);
            row = new_row;
            col = new_col;
        }

        row * n + col
    }

    /// Map a flattened position through the inverse symmetry: undo the
    /// rotations (clockwise), then undo the flip.
    pub fn inverse_index(&self, position: usize) -> usize {
        let n = self.size;
        let (mut row, mut col) = (position / n, position % n);

        for _ in 0..self.rotations {
            let (new_row, new_col) = (col, n - 1 - row);
            row = new_row;
            col = new_col;
        }

        if self.flipped {
            row = n - 1 - row;
        }

        row * n + col
    }

    /// Apply the symmetry to a flattened cell grid
    pub fn apply_to_cells(&self, cells: &[Cell]) -> Vec<Cell> {
        let mut transformed = vec![Cell::Empty; cells.len()];
        for (index, &cell) in cells.iter().enumerate() {
            transformed[self.transform_index(index)] = cell;
        }
        transformed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_noop() {
        let id = GridSymmetry::identity(3);
        for pos in 0..9 {
            assert_eq!(id.transform_index(pos), pos);
            assert_eq!(id.inverse_index(pos), pos);
        }
    }

    #[test]
    fn test_all_enumerates_eight_symmetries() {
        let all: Vec<_> = GridSymmetry::all(3).collect();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0], GridSymmetry::identity(3));
        // Unflipped symmetries come first
        assert!(all[..4].iter().all(|s| !s.flipped));
        assert!(all[4..].iter().all(|s| s.flipped));
    }

    #[test]
    fn test_quarter_turn_moves_corner() {
        // Counter-clockwise quarter turn takes the top-right corner of a
        // 3x3 grid to the top-left.
        let rot = GridSymmetry::new(3, 1, false);
        assert_eq!(rot.transform_index(2), 0);
        // Center is fixed
        assert_eq!(rot.transform_index(4), 4);
    }

    #[test]
    fn test_flip_reverses_rows() {
        let flip = GridSymmetry::new(3, 0, true);
        assert_eq!(flip.transform_index(0), 6);
        assert_eq!(flip.transform_index(1), 7);
        assert_eq!(flip.transform_index(8), 2);
    }

    #[test]
    fn test_inverse_round_trip_all_symmetries() {
        for size in [3, 5, 7] {
            for symmetry in GridSymmetry::all(size) {
                for pos in 0..size * size {
                    let there = symmetry.transform_index(pos);
                    assert_eq!(
                        symmetry.inverse_index(there),
                        pos,
                        "inverse failed for {symmetry:?} at {pos}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_apply_to_cells_matches_index_transform() {
        let symmetry = GridSymmetry::new(3, 2, true);
        let mut cells = vec![Cell::Empty; 9];
        cells[1] = Cell::Cross;
        cells[5] = Cell::Nought;

        let transformed = symmetry.apply_to_cells(&cells);
        assert_eq!(transformed[symmetry.transform_index(1)], Cell::Cross);
        assert_eq!(transformed[symmetry.transform_index(5)], Cell::Nought);
        assert_eq!(transformed.iter().filter(|&&c| c != Cell::Empty).count(), 2);
    }
}
