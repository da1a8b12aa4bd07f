//! The engine puts all pieces together: it reads positions from the input
//! stream, runs the search and writes the answers back.
//!
//! [`Engine::serve`] is the "main loop" for playing on the tournament server,
//! [`Engine::solve_puzzle`] answers a single position given in the puzzle
//! format. Answers go to the output stream, everything else (search summaries,
//! errors in requests) is written to the log stream as `info` lines.

use std::io::{BufRead, Read, Write};

use anyhow::{anyhow, bail};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::protocol::{Request, PING, PONG, REQUEST_SEPARATOR};
use crate::game::core::TOURNAMENT_BOARD_WIDTH;
use crate::game::{Board, Move, Player};
use crate::search::{self, Config, Limits, RolloutPolicy};

mod bench;
mod protocol;

pub use bench::bench;

/// The Engine connects everything together and handles the requests sent by
/// the server, including I/O.
pub struct Engine<'a, R: BufRead, W: Write, L: Write> {
    input: &'a mut R,
    output: &'a mut W,
    log: &'a mut L,
    config: Config,
    rng: StdRng,
    /// Cached between requests: building the packing table is not free on
    /// large boards.
    policy: RolloutPolicy,
}

impl<'a, R: BufRead, W: Write, L: Write> Engine<'a, R, W, L> {
    /// Creates a new instance of the engine with provided I/O. The random
    /// number generator is seeded from [`Config::seed`] if it is set.
    ///
    /// # Errors
    ///
    /// Propagates errors of building the rollout policy.
    pub fn new(
        input: &'a mut R,
        output: &'a mut W,
        log: &'a mut L,
        config: Config,
    ) -> anyhow::Result<Self> {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Ok(Self {
            input,
            output,
            log,
            config,
            rng,
            policy: RolloutPolicy::new(TOURNAMENT_BOARD_WIDTH)?,
        })
    }

    /// Continuously reads the input stream and answers the requests until the
    /// input is closed.
    ///
    /// A request that can not be parsed is reported to the log and skipped,
    /// the other requests of the same line are still answered.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors.
    pub fn serve(&mut self) -> anyhow::Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == PING {
                writeln!(self.output, "{PONG}")?;
                self.output.flush()?;
                continue;
            }
            let mut answers = Vec::new();
            for request in line.split(REQUEST_SEPARATOR) {
                match self.handle_request(request)? {
                    Ok(answer) => answers.push(answer),
                    Err(e) => writeln!(self.log, "info string {e:#}")?,
                }
            }
            if !answers.is_empty() {
                writeln!(self.output, "{}", answers.join(&REQUEST_SEPARATOR.to_string()))?;
                self.output.flush()?;
            }
        }
        Ok(())
    }

    /// The outer result carries I/O errors, the inner one problems with the
    /// request itself.
    fn handle_request(&mut self, request: &str) -> anyhow::Result<anyhow::Result<String>> {
        let request = match Request::parse(request, TOURNAMENT_BOARD_WIDTH) {
            Ok(request) => request,
            Err(e) => return Ok(Err(e)),
        };
        writeln!(
            self.log,
            "info string round {} game {} against {} as {}",
            request.round, request.game, request.opponent, request.player
        )?;
        let board = request.grid.occupancy();
        Ok(self
            .find_move(&board, request.player)?
            .map(|chosen| request.answer(chosen))
            .ok_or_else(|| anyhow!("no legal moves for {}", request.player)))
    }

    /// Reads the whole input as a single puzzle and writes the answer.
    ///
    /// # Errors
    ///
    /// Fails if the puzzle is malformed, the player to move has no legal moves
    /// or on I/O errors.
    pub fn solve_puzzle(&mut self) -> anyhow::Result<()> {
        let mut input = String::new();
        let _ = self.input.read_to_string(&mut input)?;
        let (player, board) = protocol::parse_puzzle(&input)?;
        let Some(chosen) = self.find_move(&board, player)? else {
            bail!("no legal moves for {player}");
        };
        writeln!(self.output, "{}", protocol::puzzle_answer(chosen))?;
        self.output.flush()?;
        Ok(())
    }

    fn find_move(&mut self, board: &Board, player: Player) -> anyhow::Result<Option<Move>> {
        if self.policy.width() != board.width() {
            self.policy = RolloutPolicy::new(board.width())?;
        }
        let result = search::go(
            board,
            player,
            &Limits::default(),
            &self.config,
            &self.policy,
            &mut self.rng,
            &mut *self.log,
        )?;
        Ok(result.best_move)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;

    fn config() -> Config {
        Config {
            move_time: Duration::from_millis(20),
            seed: Some(1),
            ..Config::default()
        }
    }

    fn serve(input: &str) -> (String, String) {
        let mut input = input.as_bytes();
        let mut output = vec![];
        let mut log = vec![];
        let mut engine = Engine::new(&mut input, &mut output, &mut log, config()).unwrap();
        engine.serve().unwrap();
        (
            String::from_utf8(output).unwrap(),
            String::from_utf8(log).unwrap(),
        )
    }

    #[test]
    fn ping() {
        let (output, log) = serve("Ping\n\nPing\n");
        assert_eq!(output, "Pong\nPong\n");
        assert_eq!(log, "");
    }

    #[test]
    fn single_request() {
        let board = "0".repeat(72);
        let (output, log) = serve(&format!("V;1;2;opponent;{board}\n"));
        let answer = output.trim().strip_prefix("1;2;").unwrap();
        let (x, y) = answer
            .strip_prefix('(')
            .and_then(|answer| answer.strip_suffix(')'))
            .and_then(|answer| answer.split_once(", "))
            .unwrap();
        let chosen = Move::new(x.parse().unwrap(), y.parse().unwrap());
        assert!(Board::empty(12).unwrap().is_legal(chosen, Player::Vertical));
        assert!(log.contains("info iterations"));
    }

    #[test]
    fn malformed_requests_are_skipped() {
        let board = "0".repeat(72);
        let (output, log) = serve(&format!("H;1;2;x;{board}/H;1;3;x;07\nPing\n"));
        assert!(output.starts_with("1;2;("));
        assert!(!output.contains("1;3;"));
        assert!(output.ends_with("Pong\n"));
        assert!(log.contains("info string"));
    }

    #[test]
    fn puzzle() {
        let mut input = "v\n##-\n##-\n###\n".as_bytes();
        let mut output = vec![];
        let mut log = vec![];
        let mut engine = Engine::new(&mut input, &mut output, &mut log, config()).unwrap();
        engine.solve_puzzle().unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "0 2\n");
    }

    #[test]
    fn puzzle_without_moves() {
        let mut input = "h\n#-\n-#\n".as_bytes();
        let mut output = vec![];
        let mut log = vec![];
        let mut engine = Engine::new(&mut input, &mut output, &mut log, config()).unwrap();
        assert!(engine.solve_puzzle().is_err());
    }
}
