//! N-in-a-row game engine with symmetry-aware search agents
//!
//! This crate provides:
//! - Square N-in-a-row boards (3x3, 5x5, 7x7) with in-place play/undo
//! - Board canonicalization under the 8-fold square symmetry group
//! - Exhaustive negamax search with alpha-beta pruning and a transposition
//!   table keyed by canonical identifiers
//! - Monte Carlo Tree Search with UCB1 selection
//! - A tabular Q-learning agent over canonical states
//! - JSON persistence for the cached tables

pub mod board;
pub mod brains;
pub mod canonical;
pub mod cli;
pub mod config;
pub mod error;
pub mod results;
pub mod search;
pub mod store;
pub mod symmetry;

pub use board::{Board, Cell, Outcome, Player};
pub use brains::{Brain, ChosenMove};
pub use canonical::{canonicalize, CanonicalForm, CanonicalId};
pub use config::BoardConfig;
pub use error::{Error, Result};
pub use symmetry::GridSymmetry;
