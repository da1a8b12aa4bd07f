//! Fixed workload for measuring the search speed across builds and machines.
//! Every search is seeded and capped by the number of iterations, so the
//! node count only changes when the search itself does.

use std::io::Write;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::game::{Board, Player};
use crate::search::{self, Config, Limits, RolloutPolicy};

const ITERATIONS: u64 = 1_000;
const SEED: u64 = 0xd0e1;

/// Midgame position on a tournament board.
const MIDGAME: [&str; 12] = [
    "##-----#----",
    "-------#----",
    "---##-------",
    "#-----##--#-",
    "#---------#-",
    "---#--------",
    "---#---###--",
    "------------",
    "-##-----#---",
    "----#---#---",
    "----#-------",
    "---------##-",
];

/// Puzzle-sized position close to the endgame.
const ENDGAME: [&str; 8] = [
    "##-##---",
    "--#--#-#",
    "##-##-#-",
    "-#--#-#-",
    "-#-##---",
    "##--#-##",
    "--#----#",
    "-##-##-#",
];

/// Runs a handful of searches and prints the total number of iterations and
/// iterations per second in the `<nodes> nodes <nps> nps` format.
///
/// # Errors
///
/// Fails if writing to `output` fails.
pub fn bench(output: &mut impl Write) -> anyhow::Result<()> {
    let positions = [
        (Board::empty(8)?, Player::Vertical),
        (Board::empty(12)?, Player::Horizontal),
        (Board::from_rows(&MIDGAME)?, Player::Vertical),
        (Board::from_rows(&ENDGAME)?, Player::Horizontal),
    ];
    let config = Config {
        seed: Some(SEED),
        ..Config::default()
    };
    let mut nodes = 0;
    let timer = Instant::now();
    for (board, player) in &positions {
        let policy = RolloutPolicy::new(board.width())?;
        let mut rng = StdRng::seed_from_u64(SEED);
        let result = search::go(
            board,
            *player,
            &Limits::iterations(ITERATIONS),
            &config,
            &policy,
            &mut rng,
            &mut std::io::sink(),
        )?;
        nodes += result.iterations;
    }
    let elapsed = timer.elapsed();
    let nps = (nodes as f64 / elapsed.as_secs_f64()) as u64;
    writeln!(output, "{nodes} nodes {nps} nps")?;
    Ok(())
}
