//! Q-learning brain over canonical states
//!
//! The Q-value table is keyed by canonical identifier, so experience from
//! one orientation of a position transfers to all eight. Actions are stored
//! in canonical coordinates and translated through the canonicalizer on
//! every selection and update.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use rand::{prelude::IndexedRandom, rngs::StdRng, Rng, SeedableRng};

use crate::{
    board::{Board, Cell, Player},
    brains::{Brain, ChosenMove},
    canonical::{canonicalize, CanonicalForm, CanonicalId},
    config::BoardConfig,
    store,
};

/// File stem for persisted Q-tables
const DATA_FILE_STEM: &str = "q_table";

/// Default learning rate α
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
/// Default exploration rate ε
pub const DEFAULT_EPSILON: f64 = 0.135;
/// Default discount factor γ
pub const DEFAULT_DISCOUNT: f64 = 0.6;
/// Reward magnitude handed out by the training loop
pub const REWARD: f64 = 1.0;
/// Default number of self-play training games
pub const DEFAULT_TRAIN_GAMES: usize = 3500;

/// Q-value table: canonical identifier to per-canonical-move values
pub type QTable = HashMap<CanonicalId, Vec<f64>>;

/// Tabular Q-learning agent with ε-greedy selection
pub struct QLearningBrain {
    config: BoardConfig,
    learning_rate: f64,
    epsilon: f64,
    discount: f64,
    q_table: QTable,
    /// Canonical (state, action) of the most recent move, pending update
    last_state_action: Option<(CanonicalId, usize)>,
    rng: StdRng,
    data_file: PathBuf,
}

impl QLearningBrain {
    pub fn new(config: BoardConfig, player: Player, data_root: &Path) -> Self {
        QLearningBrain {
            config,
            learning_rate: DEFAULT_LEARNING_RATE,
            epsilon: DEFAULT_EPSILON,
            discount: DEFAULT_DISCOUNT,
            q_table: QTable::new(),
            last_state_action: None,
            rng: StdRng::from_rng(&mut rand::rng()),
            data_file: store::table_path(data_root, config, DATA_FILE_STEM, player),
        }
    }

    /// Use a fixed seed for reproducible exploration
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Override the exploration rate (zero plays greedily)
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Number of canonical states with learned values
    pub fn known_states(&self) -> usize {
        self.q_table.len()
    }

    fn values_for(&mut self, id: CanonicalId) -> &mut Vec<f64> {
        let squares = self.config.squares();
        self.q_table.entry(id).or_insert_with(|| vec![0.0; squares])
    }

    /// Occupied cells of the canonical board; those actions are unavailable
    fn occupied_mask(form: &CanonicalForm) -> Vec<bool> {
        form.cells.iter().map(|&cell| cell != Cell::Empty).collect()
    }

    /// Maximum Q-value over free canonical actions, zero when none remain
    fn max_free_value(values: &[f64], occupied: &[bool]) -> f64 {
        values
            .iter()
            .zip(occupied)
            .filter(|&(_, &taken)| !taken)
            .map(|(&value, _)| value)
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Pick uniformly among the free actions achieving the maximum value
    fn greedy_canonical_action(&mut self, id: CanonicalId, occupied: &[bool]) -> Option<usize> {
        let values = self.values_for(id).clone();
        let best = values
            .iter()
            .zip(occupied)
            .filter(|&(_, &taken)| !taken)
            .map(|(&value, _)| value)
            .fold(f64::NEG_INFINITY, f64::max);

        let candidates: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|&(index, &value)| !occupied[index] && value == best)
            .map(|(index, _)| index)
            .collect();

        candidates.choose(&mut self.rng).copied()
    }
}

impl Brain for QLearningBrain {
    fn request_move(&mut self, board: &mut Board) -> Result<ChosenMove, crate::Error> {
        let form = canonicalize(board);
        self.values_for(form.id);

        let occupied = Self::occupied_mask(&form);

        let (board_move, canonical_move) = if self.rng.random::<f64>() < self.epsilon {
            // Explore: uniform random legal move
            let legal = board.legal_moves();
            let &board_move = legal
                .choose(&mut self.rng)
                .ok_or(crate::Error::NoValidMoves)?;
            (board_move, form.map_move_to_canonical(board_move))
        } else {
            // Exploit: best known canonical action
            let canonical_move = self
                .greedy_canonical_action(form.id, &occupied)
                .ok_or(crate::Error::NoValidMoves)?;
            (form.map_move_to_board(canonical_move), canonical_move)
        };

        self.last_state_action = Some((form.id, canonical_move));

        Ok(ChosenMove {
            board_move,
            canonical_move: Some(canonical_move),
        })
    }

    fn notify_outcome(&mut self, board: &Board, reward: f64) -> Result<(), crate::Error> {
        let Some((last_state, last_action)) = self.last_state_action else {
            return Ok(());
        };

        let form = canonicalize(board);
        let occupied = Self::occupied_mask(&form);
        let next_values = self.values_for(form.id).clone();
        let next_max = Self::max_free_value(&next_values, &occupied);

        let learning_rate = self.learning_rate;
        let discount = self.discount;
        let values = self.values_for(last_state);
        let old_value = values[last_action];
        values[last_action] =
            old_value + learning_rate * ((reward + discount * next_max) - old_value);

        Ok(())
    }

    fn reset(&mut self) {
        self.last_state_action = None;
    }

    fn load_cache(&mut self) -> Result<(), crate::Error> {
        match store::load_table(&self.data_file) {
            Ok(table) => self.q_table = table,
            Err(error) => {
                eprintln!("warning: starting with an empty Q-table: {error}");
                self.q_table = QTable::new();
            }
        }
        Ok(())
    }

    fn save_cache(&self) -> Result<(), crate::Error> {
        store::save_table(&self.data_file, &self.q_table)
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }
}
