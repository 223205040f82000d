//! Win/draw tallies shared by MCTS backpropagation and match reporting

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Outcome, Player};

/// Running count of game outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinTally {
    pub cross: u64,
    pub nought: u64,
    pub draws: u64,
}

impl WinTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished game
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win(Player::Cross) => self.cross += 1,
            Outcome::Win(Player::Nought) => self.nought += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    /// Wins recorded for one player
    pub fn wins_for(&self, player: Player) -> u64 {
        match player {
            Player::Cross => self.cross,
            Player::Nought => self.nought,
        }
    }

    /// Total games recorded
    pub fn total(&self) -> u64 {
        self.cross + self.nought + self.draws
    }
}

impl fmt::Display for WinTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+--------------------------------+")?;
        writeln!(f, "|{:^10}|{:^10}|{:^10}|", "Cross", "Nought", "Draw")?;
        writeln!(f, "+--------------------------------+")?;
        writeln!(f, "|{:^10}|{:^10}|{:^10}|", self.cross, self.nought, self.draws)?;
        write!(f, "+--------------------------------+")
    }
}
