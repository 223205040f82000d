use anyhow::Result;
use clap::Parser;

use ninarow::cli::{self, Cli};

fn main() -> Result<()> {
    cli::run(Cli::parse())
}
