//! Monte Carlo Tree Search brain

use crate::{
    board::Board,
    brains::{Brain, ChosenMove},
    search::{MctsConfig, MctsSearch},
};

/// Statistical search agent. Carries no persistent state: the search tree
/// is rebuilt on every request and discarded afterwards.
pub struct MctsBrain {
    search: MctsSearch,
}

impl MctsBrain {
    pub fn new(config: MctsConfig) -> Self {
        MctsBrain {
            search: MctsSearch::new(config),
        }
    }

    /// Use a fixed seed for reproducible simulations
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.search = self.search.with_seed(seed);
        self
    }
}

impl Default for MctsBrain {
    fn default() -> Self {
        Self::new(MctsConfig::default())
    }
}

impl Brain for MctsBrain {
    fn request_move(&mut self, board: &mut Board) -> Result<ChosenMove, crate::Error> {
        let board_move = self.search.best_move(board)?;
        Ok(ChosenMove {
            board_move,
            canonical_move: None,
        })
    }

    fn name(&self) -> &str {
        "MCTS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{board::Player, config::BoardConfig};

    #[test]
    fn test_returns_legal_move() {
        let config = BoardConfig::for_size(3).unwrap();
        let mut board = Board::new(config);
        board.play(Player::Cross, 4).unwrap();

        let mut brain = MctsBrain::new(MctsConfig {
            simulations: 100,
            deadline: None,
        })
        .with_seed(11);

        let chosen = brain.request_move(&mut board).unwrap();
        assert!(board.legal_moves().contains(&chosen.board_move));
        assert_eq!(chosen.canonical_move, None);
    }
}
