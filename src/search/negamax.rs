//! Exhaustive negamax search with alpha-beta pruning and a transposition
//! table keyed by canonical identifiers
//!
//! The table memoizes scores across symmetry-equivalent positions, which is
//! what makes exhaustive search viable on the 5x5 and 7x7 boards. Stored
//! best moves live in canonical coordinates and are translated back to raw
//! board coordinates on every hit.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    board::{Board, Player},
    canonical::{canonicalize, CanonicalId},
};

/// Sentinel for an unbounded search window
const INFINITY: i32 = i32::MAX;

/// How a stored score relates to the true value of the position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    Exact,
    LowerBound,
    UpperBound,
}

/// A memoized search result for one canonical position.
///
/// An entry is only trustworthy when its `depth_remaining` covers the
/// querying node's remaining depth; shallower entries may carry looser
/// bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub bound: Bound,
    pub score: i32,
    pub depth_remaining: usize,
    /// Best move in canonical coordinates
    pub canonical_move: usize,
}

/// Transposition table mapping canonical identifiers to search results
pub type TranspositionTable = HashMap<CanonicalId, TableEntry>;

/// Result of a completed root search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move in raw board coordinates
    pub board_move: usize,
    /// The same move in canonical coordinates, for persistence
    pub canonical_move: usize,
    /// Negamax score of the root position for the searching player
    pub score: i32,
}

/// Negamax search over a mutable board.
///
/// The board is mutated in place while exploring: every `play` is matched
/// by an `undo` before the frame returns, on success and error paths alike.
/// Errors out of the recursion indicate caller bugs (e.g. a corrupted
/// board) and are propagated, never swallowed mid-search.
///
/// Move tie-break is deterministic: the earliest move in ascending index
/// order achieving a strict score improvement is kept.
pub struct NegamaxSearch<'a> {
    table: &'a mut TranspositionTable,
    prune: bool,
    chosen_move: Option<usize>,
}

impl<'a> NegamaxSearch<'a> {
    /// Create a search backed by the given transposition table
    pub fn new(table: &'a mut TranspositionTable) -> Self {
        NegamaxSearch {
            table,
            prune: true,
            chosen_move: None,
        }
    }

    /// Disable alpha-beta cutoffs. The selected move and score must not
    /// change, only the number of nodes visited; used to verify pruning.
    pub fn without_pruning(table: &'a mut TranspositionTable) -> Self {
        NegamaxSearch {
            table,
            prune: false,
            chosen_move: None,
        }
    }

    /// Search the position exhaustively and return the best move for
    /// `player`, who must be the one to move.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoValidMoves`] on a full board. Any other
    /// error indicates an inconsistent board and is fatal to the search.
    pub fn best_move(&mut self, board: &mut Board, player: Player) -> Result<SearchResult, crate::Error> {
        if board.legal_moves().is_empty() {
            return Err(crate::Error::NoValidMoves);
        }

        let depth = board.occupied_moves().len();
        self.chosen_move = None;

        let score = self.negamax(board, depth, player, None, -INFINITY, INFINITY)?;
        let board_move = self.chosen_move.ok_or(crate::Error::NoValidMoves)?;
        let canonical_move = canonicalize(board).map_move_to_canonical(board_move);

        Ok(SearchResult {
            board_move,
            canonical_move,
            score,
        })
    }

    fn negamax(
        &mut self,
        board: &mut Board,
        depth: usize,
        mover: Player,
        last_move: Option<usize>,
        mut alpha: i32,
        mut beta: i32,
    ) -> Result<i32, crate::Error> {
        let alpha_original = alpha;
        let squares = board.squares();
        let remaining = squares - depth;

        let form = canonicalize(board);

        if let Some(entry) = self.table.get(&form.id).copied() {
            if entry.depth_remaining >= remaining {
                match entry.bound {
                    Bound::Exact => {
                        self.chosen_move = Some(form.map_move_to_board(entry.canonical_move));
                        return Ok(entry.score);
                    }
                    Bound::LowerBound => alpha = alpha.max(entry.score),
                    Bound::UpperBound => beta = beta.min(entry.score),
                }

                if alpha > beta {
                    self.chosen_move = Some(form.map_move_to_board(entry.canonical_move));
                    return Ok(entry.score);
                }
            }
        }

        let (mover_won, opponent_won) = match last_move {
            Some(position) => {
                let (row, col) = board.coordinates(position);
                (
                    board.check_win(row, col, mover),
                    board.check_win(row, col, mover.opponent()),
                )
            }
            None => (false, false),
        };

        if depth == squares || mover_won || opponent_won {
            return Ok(if mover_won {
                squares as i32 + 1 - depth as i32
            } else if opponent_won {
                -(squares as i32 + 1 - depth as i32)
            } else {
                0
            });
        }

        let mut max_score = -INFINITY;
        let mut best_move = None;

        for position in board.legal_moves() {
            board.play(mover, position)?;
            let child = self.negamax(
                board,
                depth + 1,
                mover.opponent(),
                Some(position),
                -beta,
                -alpha,
            );
            board.undo(position);
            let score = -child?;

            if score > max_score {
                max_score = score;
                best_move = Some(position);
            }

            alpha = alpha.max(score);
            if self.prune && alpha > beta {
                break;
            }
        }

        // Non-terminal positions always have at least one legal move
        let best_move = best_move.ok_or(crate::Error::NoValidMoves)?;
        self.chosen_move = Some(best_move);

        let bound = if max_score <= alpha_original {
            Bound::UpperBound
        } else if max_score >= beta {
            Bound::LowerBound
        } else {
            Bound::Exact
        };

        self.table.insert(
            form.id,
            TableEntry {
                bound,
                score: max_score,
                depth_remaining: remaining,
                canonical_move: form.map_move_to_canonical(best_move),
            },
        );

        Ok(max_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;

    fn board3() -> Board {
        Board::new(BoardConfig::for_size(3).unwrap())
    }

    #[test]
    fn test_takes_immediate_win() {
        // X X .
        // O O .
        // . . .
        let mut b = board3();
        b.play(Player::Cross, 0).unwrap();
        b.play(Player::Nought, 3).unwrap();
        b.play(Player::Cross, 1).unwrap();
        b.play(Player::Nought, 4).unwrap();

        let mut table = TranspositionTable::new();
        let result = NegamaxSearch::new(&mut table)
            .best_move(&mut b, Player::Cross)
            .unwrap();

        assert_eq!(result.board_move, 2);
        assert!(result.score > 0);
    }

    #[test]
    fn test_blocks_immediate_loss() {
        // X X .
        // . O .
        // . . .
        // O to move must block at 2.
        let mut b = board3();
        b.play(Player::Cross, 0).unwrap();
        b.play(Player::Nought, 4).unwrap();
        b.play(Player::Cross, 1).unwrap();

        let mut table = TranspositionTable::new();
        let result = NegamaxSearch::new(&mut table)
            .best_move(&mut b, Player::Nought)
            .unwrap();

        assert_eq!(result.board_move, 2);
    }

    #[test]
    fn test_search_leaves_board_unmodified() {
        let mut b = board3();
        b.play(Player::Cross, 4).unwrap();
        let before = b.clone();

        let mut table = TranspositionTable::new();
        NegamaxSearch::new(&mut table)
            .best_move(&mut b, Player::Nought)
            .unwrap();

        assert_eq!(b, before);
    }

    #[test]
    fn test_full_board_has_no_move() {
        let mut b = board3();
        let crosses = [0, 3, 7, 8, 2];
        let noughts = [1, 4, 5, 6];
        for i in 0..4 {
            b.play(Player::Cross, crosses[i]).unwrap();
            b.play(Player::Nought, noughts[i]).unwrap();
        }
        b.play(Player::Cross, crosses[4]).unwrap();

        let mut table = TranspositionTable::new();
        let result = NegamaxSearch::new(&mut table).best_move(&mut b, Player::Nought);
        assert!(matches!(result, Err(crate::Error::NoValidMoves)));
    }

    #[test]
    fn test_table_is_populated_and_reused() {
        let mut b = board3();
        let mut table = TranspositionTable::new();

        let first = NegamaxSearch::new(&mut table)
            .best_move(&mut b, Player::Cross)
            .unwrap();
        assert!(!table.is_empty());

        // A second search over the warm table returns the same move.
        let second = NegamaxSearch::new(&mut table)
            .best_move(&mut b, Player::Cross)
            .unwrap();
        assert_eq!(first.board_move, second.board_move);
        assert_eq!(first.score, second.score);
    }
}
