//! Monte Carlo Tree Search with UCB1 selection
//!
//! The tree is an arena of nodes indexed by position in a `Vec`; parent
//! links are indices, never owning pointers, and backpropagation walks them
//! iteratively. Each node owns a cloned board snapshot which must be left
//! unchanged by rollouts so it stays reusable across visits.

use std::time::{Duration, Instant};

use rand::{prelude::IndexedRandom, rngs::StdRng, SeedableRng};

use crate::{
    board::{Board, Outcome},
    results::WinTally,
};

/// UCB1 exploration constant used during selection
pub const EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Default number of simulations per move request
pub const DEFAULT_SIMULATIONS: usize = 1250;

/// Search budget for one move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MctsConfig {
    /// Number of simulations to run from a fresh root
    pub simulations: usize,
    /// Optional wall-clock limit, checked between simulations. When unset
    /// the search is deterministic for a fixed seed.
    pub deadline: Option<Duration>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            simulations: DEFAULT_SIMULATIONS,
            deadline: None,
        }
    }
}

struct Node {
    board: Board,
    parent: Option<usize>,
    children: Vec<usize>,
    /// The move that produced this node from its parent
    move_played: Option<usize>,
    /// Legal moves not yet expanded, popped from the end
    untried: Vec<usize>,
    /// Resolved outcome for nodes reached via a game-ending move
    outcome: Option<Outcome>,
    visits: u64,
    tally: WinTally,
}

impl Node {
    fn root(board: Board) -> Self {
        let untried = board.legal_moves();
        Node {
            board,
            parent: None,
            children: Vec::new(),
            move_played: None,
            untried,
            outcome: None,
            visits: 0,
            tally: WinTally::new(),
        }
    }

    fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }
}

struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn new(board: Board) -> Self {
        Tree {
            nodes: vec![Node::root(board)],
        }
    }

    /// Child of `parent` maximizing the UCB1 score for the parent's mover.
    ///
    /// Every child has been visited at least once (it was simulated when
    /// expanded), so the win-rate and exploration terms are well defined.
    fn best_child(&self, parent: usize, exploration: f64) -> Option<usize> {
        let node = &self.nodes[parent];
        let mover = node.board.current_mover();
        let parent_visits = node.visits.max(1) as f64;

        let mut best: Option<(usize, f64)> = None;
        for &child_index in &node.children {
            let child = &self.nodes[child_index];
            let visits = child.visits as f64;
            let wins = child.tally.wins_for(mover) as f64;
            let losses = child.tally.wins_for(mover.opponent()) as f64;

            let mut value = (wins - losses) / visits;
            if exploration > 0.0 {
                value += exploration * (parent_visits.ln() / visits).sqrt();
            }

            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((child_index, value));
            }
        }

        best.map(|(index, _)| index)
    }

    fn backpropagate(&mut self, leaf: usize, outcome: Outcome) {
        let mut index = leaf;
        loop {
            let node = &mut self.nodes[index];
            node.visits += 1;
            node.tally.record(outcome);
            match node.parent {
                Some(parent) => index = parent,
                None => break,
            }
        }
    }
}

/// Monte Carlo Tree Search engine.
///
/// The tree is rebuilt from scratch on every move request and discarded
/// after the move is chosen.
pub struct MctsSearch {
    config: MctsConfig,
    rng: StdRng,
}

impl MctsSearch {
    pub fn new(config: MctsConfig) -> Self {
        MctsSearch {
            config,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Use a fixed seed for reproducible simulations
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Run the configured simulation budget and return the root move with
    /// the best raw win-rate (exploration constant zero).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoValidMoves`] if the position has no legal
    /// moves.
    pub fn best_move(&mut self, board: &Board) -> Result<usize, crate::Error> {
        if board.legal_moves().is_empty() {
            return Err(crate::Error::NoValidMoves);
        }

        let mut tree = Tree::new(board.clone());
        let started = Instant::now();

        for _ in 0..self.config.simulations {
            if let Some(limit) = self.config.deadline {
                if started.elapsed() >= limit {
                    break;
                }
            }

            let leaf = self.select(&mut tree)?;
            let outcome = self.simulate(&mut tree, leaf)?;
            tree.backpropagate(leaf, outcome);
        }

        tree.best_child(0, 0.0)
            .and_then(|child| tree.nodes[child].move_played)
            .ok_or(crate::Error::NoValidMoves)
    }

    /// Descend from the root until reaching a terminal node or a node with
    /// untried moves; expand one untried move when found.
    fn select(&mut self, tree: &mut Tree) -> Result<usize, crate::Error> {
        let mut index = 0;

        while !tree.nodes[index].is_terminal() {
            if let Some(position) = tree.nodes[index].untried.pop() {
                return self.expand(tree, index, position);
            }

            index = tree
                .best_child(index, EXPLORATION)
                .ok_or(crate::Error::NoValidMoves)?;
        }

        Ok(index)
    }

    fn expand(&mut self, tree: &mut Tree, parent: usize, position: usize) -> Result<usize, crate::Error> {
        let mut board = tree.nodes[parent].board.clone();
        let mover = board.current_mover();
        let outcome = board.play(mover, position)?;

        let untried = if outcome.is_some() {
            Vec::new()
        } else {
            board.legal_moves()
        };

        let child = Node {
            board,
            parent: Some(parent),
            children: Vec::new(),
            move_played: Some(position),
            untried,
            outcome,
            visits: 0,
            tally: WinTally::new(),
        };

        let index = tree.nodes.len();
        tree.nodes.push(child);
        tree.nodes[parent].children.push(index);
        Ok(index)
    }

    /// Random playout from the node's board. Every move played is recorded
    /// and undone afterwards so the snapshot stays reusable.
    fn simulate(&mut self, tree: &mut Tree, index: usize) -> Result<Outcome, crate::Error> {
        if let Some(outcome) = tree.nodes[index].outcome {
            return Ok(outcome);
        }

        let board = &mut tree.nodes[index].board;
        let mut played = Vec::new();

        let result = loop {
            let moves = board.legal_moves();
            let position = match moves.choose(&mut self.rng) {
                Some(&position) => position,
                None => break Err(crate::Error::NoValidMoves),
            };

            let mover = board.current_mover();
            match board.play(mover, position) {
                Ok(None) => played.push(position),
                Ok(Some(outcome)) => {
                    played.push(position);
                    break Ok(outcome);
                }
                Err(error) => break Err(error),
            }
        };

        for &position in played.iter().rev() {
            board.undo(position);
        }

        result
    }
}

impl Default for MctsSearch {
    fn default() -> Self {
        Self::new(MctsConfig::default())
    }
}
