//! Engine for [Domineering], a two-player game of placing dominoes on a square
//! board: the vertical player covers two vertically adjacent cells, the
//! horizontal player two horizontally adjacent ones and whoever can not move
//! loses. Moves are chosen by Monte Carlo Tree Search with greedy heuristic
//! rollouts.
//!
//! [Domineering]: https://en.wikipedia.org/wiki/Domineering

use std::io::Write;

pub mod evaluation;
pub mod game;
pub mod search;

mod engine;
pub use engine::{bench, Engine};
use shadow_rs::shadow;

shadow!(build);

/// Target features the engine relies on. Produced by `build.rs`.
const FEATURES: &str = include_str!(concat!(env!("OUT_DIR"), "/features"));

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints the engine name and version on startup.
///
/// # Errors
///
/// Fails if writing to `output` fails.
pub fn print_engine_info(output: &mut impl Write) -> std::io::Result<()> {
    writeln!(output, "Domineering engine {}", engine_version())
}

/// Prints information about the build type, features and whether the build
/// is clean on startup.
///
/// # Errors
///
/// Fails if writing to `output` fails.
pub fn print_binary_info(output: &mut impl Write) -> std::io::Result<()> {
    writeln!(output, "Release build: {}", !shadow_rs::is_debug())?;
    writeln!(output, "Features: {FEATURES}")?;
    if !shadow_rs::git_clean() {
        writeln!(output, "Warning: built with uncommitted changes")?;
    }
    Ok(())
}
