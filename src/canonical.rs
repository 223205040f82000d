//! Board canonicalization under the 8-fold square symmetry group
//!
//! Symmetry-equivalent positions share a canonical identifier, which
//! collapses the state space seen by the transposition table and the
//! Q-value table. The identifier is the pair `(sum_cross, sum_nought)`
//! where each sum adds `0.5^(index + 1)` over the occupied cells of the
//! respective symbol, minimized lexicographically over all 8 orientations.
//!
//! Every term is a distinct power of two, so for the supported board sizes
//! the sums are exact in an `f64` and symmetry-equivalent boards produce
//! bit-identical identifiers.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::{
    board::{Board, Cell},
    symmetry::GridSymmetry,
};

/// Symmetry-invariant identifier of a board position.
///
/// Equality and hashing compare the raw IEEE-754 bit patterns; the sums are
/// exact dyadic rationals and never NaN.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CanonicalId {
    pub sum_cross: f64,
    pub sum_nought: f64,
}

impl CanonicalId {
    /// Lossless textual key for persisted tables: the two IEEE-754 bit
    /// patterns as fixed-width hex, colon-separated.
    pub fn encode_key(&self) -> String {
        format!(
            "{:016x}:{:016x}",
            self.sum_cross.to_bits(),
            self.sum_nought.to_bits()
        )
    }

    /// Parse a key produced by [`encode_key`](Self::encode_key).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidCacheKey`] if the key is not two
    /// colon-separated hex values.
    pub fn parse_key(key: &str) -> Result<Self, crate::Error> {
        let invalid = |reason: &str| crate::Error::InvalidCacheKey {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        let (cross_part, nought_part) = key
            .split_once(':')
            .ok_or_else(|| invalid("expected two values separated by ':'"))?;

        let cross_bits =
            u64::from_str_radix(cross_part, 16).map_err(|_| invalid("invalid hex value"))?;
        let nought_bits =
            u64::from_str_radix(nought_part, 16).map_err(|_| invalid("invalid hex value"))?;

        Ok(CanonicalId {
            sum_cross: f64::from_bits(cross_bits),
            sum_nought: f64::from_bits(nought_bits),
        })
    }
}

impl PartialEq for CanonicalId {
    fn eq(&self, other: &Self) -> bool {
        self.sum_cross.to_bits() == other.sum_cross.to_bits()
            && self.sum_nought.to_bits() == other.sum_nought.to_bits()
    }
}

impl Eq for CanonicalId {}

impl Hash for CanonicalId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sum_cross.to_bits().hash(state);
        self.sum_nought.to_bits().hash(state);
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.sum_cross, self.sum_nought)
    }
}

/// Cached result of canonicalizing one board position.
///
/// Holds the identifier, a snapshot of the board in its canonical
/// orientation, and the winning symmetry, so move translation does not
/// repeat the orientation search.
#[derive(Debug, Clone)]
pub struct CanonicalForm {
    /// The symmetry-minimized identifier
    pub id: CanonicalId,
    /// The board cells in canonical orientation
    pub cells: Vec<Cell>,
    /// The symmetry mapping the raw board to the canonical orientation
    pub symmetry: GridSymmetry,
}

impl CanonicalForm {
    /// Number of counter-clockwise quarter turns applied
    pub fn rotations(&self) -> usize {
        self.symmetry.rotations
    }

    /// Whether the vertical flip was applied
    pub fn was_flipped(&self) -> bool {
        self.symmetry.flipped
    }

    /// Translate a raw-board move index into canonical coordinates
    pub fn map_move_to_canonical(&self, board_move: usize) -> usize {
        self.symmetry.transform_index(board_move)
    }

    /// Translate a canonical move index back into raw-board coordinates
    pub fn map_move_to_board(&self, canonical_move: usize) -> usize {
        self.symmetry.inverse_index(canonical_move)
    }
}

/// Sum `0.5^(index + 1)` over occupied cells of each symbol
fn orientation_sums(cells: &[Cell]) -> (f64, f64) {
    let mut sum_cross = 0.0;
    let mut sum_nought = 0.0;
    for (index, &cell) in cells.iter().enumerate() {
        match cell {
            Cell::Cross => sum_cross += 0.5f64.powi(index as i32 + 1),
            Cell::Nought => sum_nought += 0.5f64.powi(index as i32 + 1),
            Cell::Empty => {}
        }
    }
    (sum_cross, sum_nought)
}

/// Compute the canonical form of a board position.
///
/// Enumerates all 8 symmetries in the fixed flip-then-rotation order,
/// keeping the orientation with the lexicographically smallest
/// `(sum_cross, sum_nought)`. Ties beyond that keep the first orientation
/// encountered, so the result is deterministic.
pub fn canonicalize(board: &Board) -> CanonicalForm {
    let identity_cells = board.cells().to_vec();
    let (sum_cross, sum_nought) = orientation_sums(&identity_cells);
    let mut best = CanonicalForm {
        id: CanonicalId {
            sum_cross,
            sum_nought,
        },
        cells: identity_cells,
        symmetry: GridSymmetry::identity(board.size()),
    };

    for symmetry in GridSymmetry::all(board.size()).skip(1) {
        let cells = symmetry.apply_to_cells(board.cells());
        let (sum_cross, sum_nought) = orientation_sums(&cells);

        if sum_cross < best.id.sum_cross
            || (sum_cross == best.id.sum_cross && sum_nought < best.id.sum_nought)
        {
            best = CanonicalForm {
                id: CanonicalId {
                    sum_cross,
                    sum_nought,
                },
                cells,
                symmetry,
            };
        }
    }

    best
}

/// Translate a raw-board move into canonical coordinates.
///
/// Convenience wrapper that canonicalizes `board` first; when several moves
/// need translating, call [`canonicalize`] once and use the returned
/// [`CanonicalForm`].
pub fn board_move_to_canonical(board: &Board, board_move: usize) -> usize {
    canonicalize(board).map_move_to_canonical(board_move)
}

/// Translate a canonical move into raw-board coordinates (exact inverse of
/// [`board_move_to_canonical`]).
pub fn canonical_move_to_board(board: &Board, canonical_move: usize) -> usize {
    canonicalize(board).map_move_to_board(canonical_move)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{board::Player, config::BoardConfig};

    fn board(size: usize) -> Board {
        Board::new(BoardConfig::for_size(size).unwrap())
    }

    #[test]
    fn test_empty_board_identifier_is_zero() {
        let form = canonicalize(&board(3));
        assert_eq!(form.id.sum_cross, 0.0);
        assert_eq!(form.id.sum_nought, 0.0);
        assert_eq!(form.symmetry, GridSymmetry::identity(3));
    }

    #[test]
    fn test_corner_openings_share_identifier() {
        // All four corner openings are symmetry-equivalent.
        let mut first = board(3);
        first.play(Player::Cross, 0).unwrap();
        let reference = canonicalize(&first).id;

        for corner in [2, 6, 8] {
            let mut other = board(3);
            other.play(Player::Cross, corner).unwrap();
            assert_eq!(canonicalize(&other).id, reference, "corner {corner}");
        }
    }

    #[test]
    fn test_center_opening_differs_from_corner() {
        let mut corner = board(3);
        corner.play(Player::Cross, 0).unwrap();
        let mut center = board(3);
        center.play(Player::Cross, 4).unwrap();
        assert_ne!(canonicalize(&corner).id, canonicalize(&center).id);
    }

    #[test]
    fn test_identifier_prefers_low_cross_sum() {
        let mut b = board(3);
        b.play(Player::Cross, 4).unwrap();
        let form = canonicalize(&b);
        // Center stays at index 4 in all orientations.
        assert_eq!(form.id.sum_cross, 0.5f64.powi(5));
    }

    #[test]
    fn test_move_translation_round_trip() {
        let mut b = board(3);
        b.play(Player::Cross, 1).unwrap();
        b.play(Player::Nought, 5).unwrap();

        let form = canonicalize(&b);
        for mv in b.legal_moves() {
            let canonical = form.map_move_to_canonical(mv);
            assert_eq!(form.map_move_to_board(canonical), mv);
        }
    }

    #[test]
    fn test_canonical_cells_match_identifier() {
        let mut b = board(3);
        b.play(Player::Cross, 2).unwrap();
        b.play(Player::Nought, 3).unwrap();

        let form = canonicalize(&b);
        let (sum_cross, sum_nought) = orientation_sums(&form.cells);
        assert_eq!(sum_cross, form.id.sum_cross);
        assert_eq!(sum_nought, form.id.sum_nought);
    }

    #[test]
    fn test_key_round_trip() {
        let mut b = board(5);
        b.play(Player::Cross, 12).unwrap();
        b.play(Player::Nought, 7).unwrap();

        let id = canonicalize(&b).id;
        let parsed = CanonicalId::parse_key(&id.encode_key()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_key_rejects_malformed_input() {
        assert!(CanonicalId::parse_key("deadbeef").is_err());
        assert!(CanonicalId::parse_key("xyz:123").is_err());
        assert!(CanonicalId::parse_key("").is_err());
    }
}
