//! Move-selection search engines

pub mod mcts;
pub mod negamax;

pub use mcts::{MctsConfig, MctsSearch, DEFAULT_SIMULATIONS, EXPLORATION};
pub use negamax::{Bound, NegamaxSearch, SearchResult, TableEntry, TranspositionTable};
