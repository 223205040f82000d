//! Move-selection agents ("brains") behind a common port
//!
//! The UI/CLI layer only sees this trait: it asks a brain for a move, tells
//! learning brains about outcomes, and drives cache load/save around a
//! session. Cache-less brains use the no-op defaults.

pub mod mcts;
pub mod negamax;
pub mod qlearning;

pub use mcts::MctsBrain;
pub use negamax::NegamaxBrain;
pub use qlearning::QLearningBrain;

use crate::board::Board;

/// A move chosen by a brain.
///
/// `canonical_move` is populated by cache-backed brains so callers can
/// relate the move to persisted state; it is `None` for brains without a
/// canonical-space cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChosenMove {
    pub board_move: usize,
    pub canonical_move: Option<usize>,
}

/// Port implemented by every move-selection agent
pub trait Brain {
    /// Choose a move for the current position.
    ///
    /// Engines may mutate the board while exploring but must restore it
    /// before returning.
    fn request_move(&mut self, board: &mut Board) -> Result<ChosenMove, crate::Error>;

    /// Report a reward for the last chosen move. Only meaningful for
    /// learning brains; the default is a no-op.
    fn notify_outcome(&mut self, _board: &Board, _reward: f64) -> Result<(), crate::Error> {
        Ok(())
    }

    /// Forget per-game state before a new game starts
    fn reset(&mut self) {}

    /// Load persisted state. Missing or corrupt caches are recovered by
    /// starting empty; the default is a no-op.
    fn load_cache(&mut self) -> Result<(), crate::Error> {
        Ok(())
    }

    /// Persist state to disk. The default is a no-op.
    fn save_cache(&self) -> Result<(), crate::Error> {
        Ok(())
    }

    /// Human-readable name for reporting
    fn name(&self) -> &str;
}
