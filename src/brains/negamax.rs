//! Negamax brain with a persisted transposition table

use std::path::{Path, PathBuf};

use crate::{
    board::{Board, Player},
    brains::{Brain, ChosenMove},
    config::BoardConfig,
    search::{NegamaxSearch, TranspositionTable},
    store,
};

/// File stem for persisted transposition tables
const DATA_FILE_STEM: &str = "abp_moves";

/// Exhaustive search agent. The transposition table survives across games
/// and can be persisted per (board size, symbol) pair.
pub struct NegamaxBrain {
    player: Player,
    table: TranspositionTable,
    data_file: PathBuf,
}

impl NegamaxBrain {
    pub fn new(config: BoardConfig, player: Player, data_root: &Path) -> Self {
        NegamaxBrain {
            player,
            table: TranspositionTable::new(),
            data_file: store::table_path(data_root, config, DATA_FILE_STEM, player),
        }
    }

    /// Number of canonical positions currently cached
    pub fn cached_positions(&self) -> usize {
        self.table.len()
    }
}

impl Brain for NegamaxBrain {
    fn request_move(&mut self, board: &mut Board) -> Result<ChosenMove, crate::Error> {
        let result = NegamaxSearch::new(&mut self.table).best_move(board, self.player)?;
        Ok(ChosenMove {
            board_move: result.board_move,
            canonical_move: Some(result.canonical_move),
        })
    }

    fn load_cache(&mut self) -> Result<(), crate::Error> {
        match store::load_table(&self.data_file) {
            Ok(table) => self.table = table,
            Err(error) => {
                eprintln!("warning: starting with an empty transposition table: {error}");
                self.table = TranspositionTable::new();
            }
        }
        Ok(())
    }

    fn save_cache(&self) -> Result<(), crate::Error> {
        store::save_table(&self.data_file, &self.table)
    }

    fn name(&self) -> &str {
        "Negamax with ABP"
    }
}
