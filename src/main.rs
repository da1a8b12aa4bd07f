//! Command-line entry point: tournament server loop, puzzle solver and bench.

use std::io::{self, Write};
use std::time::Duration;

use clap::{Parser, Subcommand};
use domineering::search::Config;
use domineering::Engine;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    /// Time budget for a single move, in milliseconds.
    #[arg(long, default_value_t = 270)]
    move_time: u64,
    /// Time kept in reserve for I/O, in milliseconds.
    #[arg(long, default_value_t = 0)]
    reserve: u64,
    /// Exploration constant of the UCB1 formula.
    #[arg(long, default_value_t = 1.41)]
    exploration: f32,
    /// Seed for the random number generator. Entropy is used if not set.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Answer tournament server requests read from the standard input.
    Serve,
    /// Answer a single position in the puzzle format.
    Puzzle,
    /// Measure the search speed on a fixed set of positions.
    Bench,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            exploration: self.exploration,
            move_time: Duration::from_millis(self.move_time),
            reserve: Duration::from_millis(self.reserve),
            seed: self.seed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve);
    if command == Command::Bench {
        return domineering::bench(&mut io::stdout().lock());
    }

    // Standard output is reserved for the answers.
    let mut log = io::stderr().lock();
    domineering::print_engine_info(&mut log)?;
    domineering::print_binary_info(&mut log)?;
    log.flush()?;

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    let mut engine = Engine::new(&mut input, &mut output, &mut log, cli.config())?;
    match command {
        Command::Puzzle => engine.solve_puzzle(),
        Command::Serve | Command::Bench => engine.serve(),
    }
}
