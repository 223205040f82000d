//! Board state and basic game rules

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::BoardConfig;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Cross,
    Nought,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Cross => 'X',
            Cell::Nought => 'O',
        }
    }

    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::Cross => Some(Player::Cross),
            Cell::Nought => Some(Player::Nought),
            Cell::Empty => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Cross,
    Nought,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::Cross => Player::Nought,
            Player::Nought => Player::Cross,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Cross => Cell::Cross,
            Player::Nought => Cell::Nought,
        }
    }

    /// Lowercase symbol used in cache file names
    pub fn symbol(self) -> char {
        match self {
            Player::Cross => 'x',
            Player::Nought => 'o',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Cross => write!(f, "Cross"),
            Player::Nought => write!(f, "Nought"),
        }
    }
}

/// Final outcome of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win(Player),
    Draw,
}

/// A square N-in-a-row board, mutated in place by `play`/`undo`.
///
/// The board itself does not enforce turn alternation; callers (the game
/// loop and the search engines) guarantee it. During search every cell set
/// by `play` must be cleared by `undo` before the enclosing frame returns,
/// otherwise sibling branches see a corrupted position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    config: BoardConfig,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board for the given configuration
    pub fn new(config: BoardConfig) -> Self {
        Board {
            config,
            cells: vec![Cell::Empty; config.squares()],
        }
    }

    /// Create a board from an existing flattened cell grid.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidBoardLength`] if the cell count does
    /// not match the configuration.
    pub fn from_cells(config: BoardConfig, cells: Vec<Cell>) -> Result<Self, crate::Error> {
        if cells.len() != config.squares() {
            return Err(crate::Error::InvalidBoardLength {
                expected: config.squares(),
                got: cells.len(),
            });
        }
        Ok(Board { config, cells })
    }

    /// Clear the board back to all-empty
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn size(&self) -> usize {
        self.config.size()
    }

    pub fn squares(&self) -> usize {
        self.config.squares()
    }

    /// Flattened cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Split a flattened move index into (row, col)
    pub fn coordinates(&self, position: usize) -> (usize, usize) {
        (position / self.size(), position % self.size())
    }

    /// Get cell at a flattened position
    pub fn get(&self, position: usize) -> Cell {
        self.cells[position]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, position: usize) -> bool {
        self.cells[position] == Cell::Empty
    }

    /// Play a move for `player` at the flattened `position`.
    ///
    /// Returns `Some(outcome)` when the move ends the game (a win for
    /// `player` or a draw on a full board), `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] for positions beyond the grid
    /// and [`crate::Error::InvalidMove`] for occupied cells. The board is
    /// left unmodified in both cases.
    pub fn play(&mut self, player: Player, position: usize) -> Result<Option<Outcome>, crate::Error> {
        if position >= self.squares() {
            return Err(crate::Error::OutOfBounds {
                position,
                squares: self.squares(),
            });
        }

        if self.cells[position] != Cell::Empty {
            return Err(crate::Error::InvalidMove { position });
        }

        self.cells[position] = player.to_cell();

        let (row, col) = self.coordinates(position);
        if self.check_win(row, col, player) {
            Ok(Some(Outcome::Win(player)))
        } else if self.is_full() {
            Ok(Some(Outcome::Draw))
        } else {
            Ok(None)
        }
    }

    /// Reset a cell to empty.
    ///
    /// No legality check is performed: the caller guarantees the cell was
    /// set by a prior `play`. Used exclusively for search backtracking.
    pub fn undo(&mut self, position: usize) {
        self.cells[position] = Cell::Empty;
    }

    /// Check whether `player` has `win_length` consecutive symbols on any
    /// line passing through `(row, col)`.
    ///
    /// Scans the full row, the full column, and both diagonals through the
    /// cell (including off-center diagonals), counting maximal runs.
    pub fn check_win(&self, row: usize, col: usize, player: Player) -> bool {
        let n = self.size();
        let target = player.to_cell();

        let row_line = (0..n).map(|c| self.cells[row * n + c]);
        if self.has_run(row_line, target) {
            return true;
        }

        let col_line = (0..n).map(|r| self.cells[r * n + col]);
        if self.has_run(col_line, target) {
            return true;
        }

        // Principal diagonal through (row, col): step (+1, +1)
        let back = row.min(col);
        let (r0, c0) = (row - back, col - back);
        let diag = (0..n)
            .take_while(|&i| r0 + i < n && c0 + i < n)
            .map(|i| self.cells[(r0 + i) * n + (c0 + i)]);
        if self.has_run(diag, target) {
            return true;
        }

        // Anti-diagonal through (row, col): step (+1, -1)
        let back = row.min(n - 1 - col);
        let (r0, c0) = (row - back, col + back);
        let anti = (0..n)
            .take_while(|&i| r0 + i < n && c0 >= i)
            .map(|i| self.cells[(r0 + i) * n + (c0 - i)]);
        if self.has_run(anti, target) {
            return true;
        }

        false
    }

    /// Check a line of cells for a run of `win_length` matching `target`
    fn has_run(&self, line: impl Iterator<Item = Cell>, target: Cell) -> bool {
        let needed = self.config.win_length();
        let mut run = 0;
        for cell in line {
            if cell == target {
                run += 1;
                if run >= needed {
                    return true;
                }
            } else {
                run = 0;
            }
        }
        false
    }

    /// Whether every cell is occupied
    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Empty positions in ascending index order
    pub fn legal_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Occupied positions in ascending index order
    pub fn occupied_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell != Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// The player to move next, derived from symbol counts.
    ///
    /// Cross moves first, so Cross is to move whenever the counts are equal.
    pub fn current_mover(&self) -> Player {
        let crosses = self.cells.iter().filter(|&&c| c == Cell::Cross).count();
        let noughts = self.cells.iter().filter(|&&c| c == Cell::Nought).count();
        if crosses == noughts {
            Player::Cross
        } else {
            Player::Nought
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.size();
        for row in 0..n {
            for col in 0..n {
                write!(f, "{}", self.cells[row * n + col].to_char())?;
            }
            if row + 1 < n {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: usize) -> Board {
        Board::new(BoardConfig::for_size(size).unwrap())
    }

    #[test]
    fn test_new_board_is_empty() {
        let b = board(3);
        assert_eq!(b.legal_moves().len(), 9);
        assert!(b.occupied_moves().is_empty());
        assert_eq!(b.current_mover(), Player::Cross);
    }

    #[test]
    fn test_play_and_undo() {
        let mut b = board(3);
        assert_eq!(b.play(Player::Cross, 4).unwrap(), None);
        assert_eq!(b.get(4), Cell::Cross);
        assert_eq!(b.current_mover(), Player::Nought);

        b.undo(4);
        assert_eq!(b.get(4), Cell::Empty);
        assert_eq!(b.current_mover(), Player::Cross);
    }

    #[test]
    fn test_play_occupied_cell_fails_and_leaves_board_unmodified() {
        let mut b = board(3);
        b.play(Player::Cross, 4).unwrap();

        let before = b.clone();
        let err = b.play(Player::Nought, 4).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidMove { position: 4 }));
        assert_eq!(b, before);
    }

    #[test]
    fn test_play_out_of_bounds_fails() {
        let mut b = board(3);
        assert!(matches!(
            b.play(Player::Cross, 9),
            Err(crate::Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_row_win() {
        let mut b = board(3);
        b.play(Player::Cross, 0).unwrap();
        b.play(Player::Nought, 3).unwrap();
        b.play(Player::Cross, 1).unwrap();
        b.play(Player::Nought, 4).unwrap();
        let outcome = b.play(Player::Cross, 2).unwrap();
        assert_eq!(outcome, Some(Outcome::Win(Player::Cross)));
    }

    #[test]
    fn test_column_win() {
        let mut b = board(3);
        b.play(Player::Cross, 0).unwrap();
        b.play(Player::Nought, 1).unwrap();
        b.play(Player::Cross, 2).unwrap();
        b.play(Player::Nought, 4).unwrap();
        b.play(Player::Cross, 5).unwrap();
        let outcome = b.play(Player::Nought, 7).unwrap();
        assert_eq!(outcome, Some(Outcome::Win(Player::Nought)));
    }

    #[test]
    fn test_main_diagonal_win() {
        let mut b = board(3);
        b.play(Player::Cross, 0).unwrap();
        b.play(Player::Nought, 1).unwrap();
        b.play(Player::Cross, 4).unwrap();
        b.play(Player::Nought, 2).unwrap();
        let outcome = b.play(Player::Cross, 8).unwrap();
        assert_eq!(outcome, Some(Outcome::Win(Player::Cross)));
    }

    #[test]
    fn test_anti_diagonal_win() {
        let mut b = board(3);
        b.play(Player::Cross, 2).unwrap();
        b.play(Player::Nought, 0).unwrap();
        b.play(Player::Cross, 4).unwrap();
        b.play(Player::Nought, 1).unwrap();
        let outcome = b.play(Player::Cross, 6).unwrap();
        assert_eq!(outcome, Some(Outcome::Win(Player::Cross)));
    }

    #[test]
    fn test_off_center_diagonal_win_on_5x5() {
        // Four in a row on the diagonal starting at (0, 1): positions
        // 1, 7, 13, 19 on a 5x5 board.
        let mut b = board(5);
        b.play(Player::Cross, 1).unwrap();
        b.play(Player::Nought, 0).unwrap();
        b.play(Player::Cross, 7).unwrap();
        b.play(Player::Nought, 2).unwrap();
        b.play(Player::Cross, 13).unwrap();
        b.play(Player::Nought, 3).unwrap();
        let outcome = b.play(Player::Cross, 19).unwrap();
        assert_eq!(outcome, Some(Outcome::Win(Player::Cross)));
    }

    #[test]
    fn test_off_center_anti_diagonal_win_on_5x5() {
        // Positions 3, 7, 11, 15 step (+1, -1) from (0, 3).
        let mut b = board(5);
        b.play(Player::Cross, 3).unwrap();
        b.play(Player::Nought, 0).unwrap();
        b.play(Player::Cross, 7).unwrap();
        b.play(Player::Nought, 1).unwrap();
        b.play(Player::Cross, 11).unwrap();
        b.play(Player::Nought, 2).unwrap();
        let outcome = b.play(Player::Cross, 15).unwrap();
        assert_eq!(outcome, Some(Outcome::Win(Player::Cross)));
    }

    #[test]
    fn test_three_in_a_row_does_not_win_when_four_needed() {
        let mut b = board(5);
        b.play(Player::Cross, 0).unwrap();
        b.play(Player::Nought, 10).unwrap();
        b.play(Player::Cross, 1).unwrap();
        b.play(Player::Nought, 11).unwrap();
        let outcome = b.play(Player::Cross, 2).unwrap();
        assert_eq!(outcome, None);
    }

    #[test]
    fn test_draw_on_full_board() {
        // XOX / XOO / OXX has no three in a row.
        let mut b = board(3);
        let crosses = [0, 3, 7, 8];
        let noughts = [1, 4, 5, 6];
        for (&x, &o) in crosses.iter().zip(noughts.iter()) {
            assert_eq!(b.play(Player::Cross, x).unwrap(), None);
            assert_eq!(b.play(Player::Nought, o).unwrap(), None);
        }
        let outcome = b.play(Player::Cross, 2).unwrap();
        assert_eq!(outcome, Some(Outcome::Draw));
    }

    #[test]
    fn test_legal_moves_are_ascending() {
        let mut b = board(3);
        b.play(Player::Cross, 4).unwrap();
        b.play(Player::Nought, 0).unwrap();
        assert_eq!(b.legal_moves(), vec![1, 2, 3, 5, 6, 7, 8]);
        assert_eq!(b.occupied_moves(), vec![0, 4]);
    }

    #[test]
    fn test_display() {
        let mut b = board(3);
        b.play(Player::Cross, 0).unwrap();
        b.play(Player::Nought, 4).unwrap();
        assert_eq!(format!("{b}"), "X..\n.O.\n...");
    }
}
