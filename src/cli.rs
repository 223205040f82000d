//! Command-line interface: agent-vs-agent matches and Q-learning training

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    board::{Board, Outcome, Player},
    brains::{Brain, MctsBrain, NegamaxBrain, QLearningBrain},
    config::BoardConfig,
    results::WinTally,
    search::{MctsConfig, DEFAULT_SIMULATIONS},
};

#[derive(Parser)]
#[command(name = "ninarow", about = "N-in-a-row engine with canonicalizing search agents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Selectable move-selection agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrainKind {
    Negamax,
    Mcts,
    Qlearning,
}

#[derive(Subcommand)]
pub enum Command {
    /// Play agent-vs-agent games and report the win tally
    Play {
        /// Board side length (3, 5 or 7)
        #[arg(long, default_value_t = 3)]
        size: usize,

        /// Brain playing Cross
        #[arg(long, value_enum, default_value_t = BrainKind::Negamax)]
        cross: BrainKind,

        /// Brain playing Nought
        #[arg(long, value_enum, default_value_t = BrainKind::Mcts)]
        nought: BrainKind,

        /// Number of games to play
        #[arg(long, default_value_t = 100)]
        games: usize,

        /// Seed for reproducible MCTS/Q-learning randomness
        #[arg(long)]
        seed: Option<u64>,

        /// MCTS simulations per move
        #[arg(long, default_value_t = DEFAULT_SIMULATIONS)]
        simulations: usize,

        /// Directory holding persisted brain data
        #[arg(long, default_value = "brain_data")]
        data_dir: PathBuf,
    },

    /// Train the Q-learning brain by self-play and persist its tables
    Train {
        /// Board side length (3, 5 or 7)
        #[arg(long, default_value_t = 3)]
        size: usize,

        /// Number of self-play games
        #[arg(long, default_value_t = crate::brains::qlearning::DEFAULT_TRAIN_GAMES)]
        games: usize,

        /// Seed for reproducible exploration
        #[arg(long)]
        seed: Option<u64>,

        /// Directory holding persisted brain data
        #[arg(long, default_value = "brain_data")]
        data_dir: PathBuf,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Play {
            size,
            cross,
            nought,
            games,
            seed,
            simulations,
            data_dir,
        } => play(size, cross, nought, games, seed, simulations, &data_dir),
        Command::Train {
            size,
            games,
            seed,
            data_dir,
        } => train(size, games, seed, &data_dir),
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games")
            .expect("Invalid progress bar template")
            .progress_chars("=>-"),
    );
    bar
}

fn build_brain(
    kind: BrainKind,
    config: BoardConfig,
    player: Player,
    data_dir: &Path,
    seed: Option<u64>,
    simulations: usize,
) -> Box<dyn Brain> {
    match kind {
        BrainKind::Negamax => Box::new(NegamaxBrain::new(config, player, data_dir)),
        BrainKind::Mcts => {
            let brain = MctsBrain::new(MctsConfig {
                simulations,
                deadline: None,
            });
            Box::new(match seed {
                Some(seed) => brain.with_seed(seed),
                None => brain,
            })
        }
        BrainKind::Qlearning => {
            let brain = QLearningBrain::new(config, player, data_dir);
            Box::new(match seed {
                Some(seed) => brain.with_seed(seed),
                None => brain,
            })
        }
    }
}

/// Play one game to completion, alternating between the two brains
fn play_one_game<'a>(
    board: &mut Board,
    cross: &'a mut dyn Brain,
    nought: &'a mut dyn Brain,
) -> Result<Outcome> {
    board.reset();
    cross.reset();
    nought.reset();

    loop {
        let mover = board.current_mover();
        let brain = match mover {
            Player::Cross => &mut *cross,
            Player::Nought => &mut *nought,
        };

        let chosen = brain
            .request_move(board)
            .with_context(|| format!("{mover} failed to choose a move"))?;
        let outcome = board
            .play(mover, chosen.board_move)
            .with_context(|| format!("{mover} played an illegal move"))?;

        if let Some(outcome) = outcome {
            return Ok(outcome);
        }
    }
}

fn play(
    size: usize,
    cross_kind: BrainKind,
    nought_kind: BrainKind,
    games: usize,
    seed: Option<u64>,
    simulations: usize,
    data_dir: &Path,
) -> Result<()> {
    let config = BoardConfig::for_size(size)?;
    let mut board = Board::new(config);

    let mut cross = build_brain(cross_kind, config, Player::Cross, data_dir, seed, simulations);
    let mut nought = build_brain(
        nought_kind,
        config,
        Player::Nought,
        data_dir,
        seed.map(|s| s.wrapping_add(1)),
        simulations,
    );
    cross.load_cache()?;
    nought.load_cache()?;

    println!(
        "Playing {games} games of {size}x{size}: {} (Cross) vs {} (Nought)",
        cross.name(),
        nought.name()
    );

    let mut tally = WinTally::new();
    let bar = progress_bar(games as u64);
    for _ in 0..games {
        let outcome = play_one_game(&mut board, cross.as_mut(), nought.as_mut())?;
        tally.record(outcome);
        bar.inc(1);
    }
    bar.finish();

    cross.save_cache()?;
    nought.save_cache()?;

    println!("{tally}");
    Ok(())
}

fn train(size: usize, games: usize, seed: Option<u64>, data_dir: &Path) -> Result<()> {
    use crate::brains::qlearning::REWARD;

    let config = BoardConfig::for_size(size)?;
    let mut board = Board::new(config);

    let mut cross = QLearningBrain::new(config, Player::Cross, data_dir);
    let mut nought = QLearningBrain::new(config, Player::Nought, data_dir);
    if let Some(seed) = seed {
        cross = cross.with_seed(seed);
        nought = nought.with_seed(seed.wrapping_add(1));
    }
    cross.load_cache()?;
    nought.load_cache()?;

    println!("Training Q-learning by self-play: {games} games of {size}x{size}");

    let bar = progress_bar(games as u64);
    for _ in 0..games {
        board.reset();
        cross.reset();
        nought.reset();

        loop {
            let mover = board.current_mover();
            let chosen = match mover {
                Player::Cross => cross.request_move(&mut board)?,
                Player::Nought => nought.request_move(&mut board)?,
            };
            let outcome = board.play(mover, chosen.board_move)?;

            match outcome {
                Some(Outcome::Draw) => {
                    // Neither side blundered; split the reward.
                    cross.notify_outcome(&board, REWARD / 2.0)?;
                    nought.notify_outcome(&board, REWARD / 2.0)?;
                    break;
                }
                Some(Outcome::Win(winner)) => {
                    let (won, lost) = match winner {
                        Player::Cross => (&mut cross, &mut nought),
                        Player::Nought => (&mut nought, &mut cross),
                    };
                    won.notify_outcome(&board, REWARD)?;
                    lost.notify_outcome(&board, -REWARD)?;
                    break;
                }
                None => {
                    // The player who moved previously sees the new state.
                    match mover {
                        Player::Cross => nought.notify_outcome(&board, 0.0)?,
                        Player::Nought => cross.notify_outcome(&board, 0.0)?,
                    }
                }
            }
        }
        bar.inc(1);
    }
    bar.finish();

    cross.save_cache()?;
    nought.save_cache()?;
    println!(
        "Learned values for {} (Cross) / {} (Nought) canonical states",
        cross.known_states(),
        nought.known_states()
    );
    Ok(())
}
