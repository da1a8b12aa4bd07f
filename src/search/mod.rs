//! Implements [Monte Carlo Tree Search] (MCTS) with greedy heuristic rollouts.
//!
//! 1. Selection: start from the root and descend through fully expanded nodes
//!    picking the child with the best UCB1 score.
//! 2. Expansion: add a child for one untried move of the reached node.
//! 3. Simulation: play the game out from the new node with the
//!    [`RolloutPolicy`].
//! 4. Backpropagation: update the nodes on the path from the new node to the
//!    root with the result.
//!
//! The search is single-threaded and does not keep the tree between moves.
//!
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search

use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::bail;
use rand::Rng;

use crate::game::movegen::generate_moves;
use crate::game::{Bitboard, Board, Move, Player};

mod rollout;
mod tree;

pub use rollout::RolloutPolicy;
use tree::{Tree, ROOT};

/// Parameters of the search.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Exploration constant of the UCB1 formula.
    pub exploration: f32,
    /// Time budget for a single move when the caller does not set one.
    pub move_time: Duration,
    /// Subtracted from every time budget: an iteration is never interrupted,
    /// so the search may overshoot its deadline by one rollout.
    pub reserve: Duration,
    /// Seed for the random number generator. Entropy is used if not set.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exploration: 1.41,
            move_time: Duration::from_millis(270),
            reserve: Duration::ZERO,
            seed: None,
        }
    }
}

/// Stopping conditions of a single search. The search stops as soon as any of
/// the set limits is reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    /// Wall-clock budget.
    pub time: Option<Duration>,
    /// Maximum number of iterations.
    pub iterations: Option<u64>,
}

impl Limits {
    /// Limits the search by wall-clock time only.
    #[must_use]
    pub const fn time(time: Duration) -> Self {
        Self {
            time: Some(time),
            iterations: None,
        }
    }

    /// Limits the search by the number of iterations only. Useful for
    /// reproducible searches.
    #[must_use]
    pub const fn iterations(iterations: u64) -> Self {
        Self {
            time: None,
            iterations: Some(iterations),
        }
    }
}

struct Limiter {
    timer: Instant,
    deadline: Option<Duration>,
    iterations: Option<u64>,
}

impl Limiter {
    fn new(limits: &Limits, config: &Config) -> Self {
        let deadline = match (limits.time, limits.iterations) {
            (None, None) => Some(config.move_time),
            (time, _) => time,
        };
        Self {
            timer: Instant::now(),
            deadline: deadline.map(|deadline| deadline.saturating_sub(config.reserve)),
            iterations: limits.iterations,
        }
    }

    fn exhausted(&self, iterations: u64) -> bool {
        self.iterations.is_some_and(|limit| iterations >= limit)
            || self
                .deadline
                .is_some_and(|deadline| self.timer.elapsed() >= deadline)
    }
}

/// Outcome of [`go`].
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// Move to play, `None` if the player to move has no legal moves.
    pub best_move: Option<Move>,
    /// Number of completed selection-simulation-backpropagation cycles.
    pub iterations: u64,
    /// Number of nodes in the tree.
    pub nodes: usize,
    /// Observed win rate of the best move.
    pub win_rate: Option<f32>,
}

/// Runs the search for `player` to move on `board` until one of the `limits`
/// is reached and returns the best move found. Writes a summary line to
/// `output`.
///
/// A single legal move is returned right away and a position without moves
/// yields [`SearchResult::best_move`] set to `None`.
///
/// # Errors
///
/// Fails if the `policy` was built for boards of a different width or writing
/// to `output` fails.
pub fn go(
    board: &Board,
    player: Player,
    limits: &Limits,
    config: &Config,
    policy: &RolloutPolicy,
    rng: &mut impl Rng,
    output: &mut impl Write,
) -> anyhow::Result<SearchResult> {
    if policy.width() != board.width() {
        bail!(
            "rollout policy is built for {0}x{0} boards, got {1}x{1} board",
            policy.width(),
            board.width()
        );
    }
    let limiter = Limiter::new(limits, config);

    let moves = generate_moves(board, player);
    if moves.len() < 2 {
        let best_move = moves.first().copied();
        match best_move {
            Some(best_move) => writeln!(output, "info string only move {best_move}")?,
            None => writeln!(output, "info string no legal moves for {player}")?,
        }
        return Ok(SearchResult {
            best_move,
            iterations: 0,
            nodes: 1,
            win_rate: None,
        });
    }

    let mut tree = Tree::new(player, moves, config.exploration);
    let mut working_board = board.clone();
    let mut iterations = 0;
    while !limiter.exhausted(iterations) {
        working_board.copy_from(board);
        let leaf = tree.select(&mut working_board, rng);
        let mut rollout_board = Bitboard::from(&working_board);
        let winner = policy.rollout(&mut rollout_board, tree.player(leaf), rng);
        tree.backpropagate(leaf, winner);
        iterations += 1;
    }

    let result = SearchResult {
        best_move: tree.best_move(),
        iterations,
        nodes: tree.len(),
        win_rate: tree.best_win_rate(),
    };
    writeln!(
        output,
        "info iterations {} nodes {} visits {} time {} winrate {:.3} move {}",
        result.iterations,
        result.nodes,
        tree.visits(ROOT),
        limiter.timer.elapsed().as_millis(),
        result.win_rate.unwrap_or(0.0),
        result
            .best_move
            .map_or_else(|| "none".to_string(), |best_move| best_move.to_string()),
    )?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn search(board: &Board, player: Player, limits: &Limits) -> SearchResult {
        let policy = RolloutPolicy::new(board.width()).unwrap();
        let mut rng = StdRng::seed_from_u64(17);
        let mut output = vec![];
        go(
            board,
            player,
            limits,
            &Config::default(),
            &policy,
            &mut rng,
            &mut output,
        )
        .unwrap()
    }

    #[test]
    fn iteration_limit() {
        let board = Board::empty(6).unwrap();
        let result = search(&board, Player::Vertical, &Limits::iterations(50));
        assert_eq!(result.iterations, 50);
        assert!(result.nodes > 1);
        let best_move = result.best_move.unwrap();
        assert!(board.is_legal(best_move, Player::Vertical));
        assert!(result.win_rate.is_some());
    }

    #[test]
    fn time_limit() {
        let board = Board::empty(8).unwrap();
        let timer = Instant::now();
        let result = search(
            &board,
            Player::Horizontal,
            &Limits::time(Duration::from_millis(50)),
        );
        assert!(timer.elapsed() >= Duration::from_millis(50));
        assert!(result.iterations > 0);
        assert!(board.is_legal(result.best_move.unwrap(), Player::Horizontal));
    }

    #[test]
    fn zero_budget_still_moves() {
        let board = Board::empty(5).unwrap();
        let result = search(&board, Player::Vertical, &Limits::time(Duration::ZERO));
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best_move, Some(Move::new(0, 0)));
    }

    #[test]
    fn no_moves() {
        let board = Board::from_rows(&["-#", "#-"]).unwrap();
        let result = search(&board, Player::Vertical, &Limits::iterations(10));
        assert_eq!(result.best_move, None);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn width_mismatch() {
        let board = Board::empty(4).unwrap();
        let policy = RolloutPolicy::new(5).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(go(
            &board,
            Player::Vertical,
            &Limits::iterations(1),
            &Config::default(),
            &policy,
            &mut rng,
            &mut std::io::sink(),
        )
        .is_err());
    }

    #[test]
    fn summary_line() {
        let board = Board::empty(4).unwrap();
        let policy = RolloutPolicy::new(4).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut output = vec![];
        let _ = go(
            &board,
            Player::Vertical,
            &Limits::iterations(10),
            &Config::default(),
            &policy,
            &mut rng,
            &mut output,
        )
        .unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("info iterations 10 nodes"));
    }

    #[test]
    fn default_limits_use_move_time() {
        let limiter = Limiter::new(&Limits::default(), &Config::default());
        assert_eq!(limiter.deadline, Some(Duration::from_millis(270)));
        assert_eq!(limiter.iterations, None);
        let limiter = Limiter::new(
            &Limits::iterations(3),
            &Config {
                reserve: Duration::from_millis(20),
                ..Config::default()
            },
        );
        assert_eq!(limiter.deadline, None);
        assert!(limiter.exhausted(3));
        assert!(!limiter.exhausted(2));
    }
}
