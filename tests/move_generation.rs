use domineering::game::movegen::{filter_moves, generate_moves};
use domineering::game::{Bitboard, Board, Move, Player};
use itertools::Itertools;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn setup(rows: &[&str]) -> Board {
    Board::from_rows(rows).expect("boards in tests are valid")
}

/// Reference implementation: tries every cell as the anchor of the domino.
fn brute_force(board: &Board, player: Player) -> Vec<Move> {
    (0..board.width())
        .cartesian_product(0..board.width())
        .map(|(x, y)| Move::new(x, y))
        .filter(|&candidate| board.is_legal(candidate, player))
        .collect()
}

fn packed_moves(board: &Board, player: Player) -> Vec<Move> {
    Bitboard::from(board)
        .generate_moves(player)
        .into_iter()
        .sorted()
        .collect()
}

/// Fills the board with random dominoes of both orientations.
fn random_board(width: u8, placements: usize, rng: &mut StdRng) -> Board {
    let mut board = Board::empty(width).unwrap();
    for turn in 0..placements {
        let player = if turn % 2 == 0 {
            Player::Vertical
        } else {
            Player::Horizontal
        };
        let moves = generate_moves(&board, player);
        if moves.is_empty() {
            break;
        }
        board.make_move(moves[rng.gen_range(0..moves.len())], player);
    }
    board
}

#[test]
fn empty_2x2() {
    let board = Board::empty(2).unwrap();
    assert_eq!(
        generate_moves(&board, Player::Vertical),
        vec![Move::new(0, 0), Move::new(1, 0)]
    );
    assert_eq!(
        generate_moves(&board, Player::Horizontal),
        vec![Move::new(0, 0), Move::new(0, 1)]
    );
}

#[test]
fn after_one_move() {
    let mut board = Board::empty(2).unwrap();
    board.make_move(Move::new(0, 0), Player::Vertical);
    assert_eq!(generate_moves(&board, Player::Horizontal), vec![]);
    assert_eq!(
        generate_moves(&board, Player::Vertical),
        vec![Move::new(1, 0)]
    );
}

#[test]
fn full_board() {
    let board = setup(&["###", "###", "###"]);
    assert_eq!(generate_moves(&board, Player::Vertical), vec![]);
    assert_eq!(generate_moves(&board, Player::Horizontal), vec![]);
    assert!(!Bitboard::from(&board).has_moves(Player::Vertical));
    assert!(!Bitboard::from(&board).has_moves(Player::Horizontal));
}

#[test]
fn single_cell_board() {
    let board = Board::empty(1).unwrap();
    assert_eq!(generate_moves(&board, Player::Vertical), vec![]);
    assert_eq!(generate_moves(&board, Player::Horizontal), vec![]);
}

#[test]
fn scan_order() {
    let board = setup(&["--#", "-#-", "---"]);
    assert_eq!(
        generate_moves(&board, Player::Vertical),
        vec![
            Move::new(0, 0),
            Move::new(0, 1),
            Move::new(2, 1)
        ]
    );
    assert_eq!(
        generate_moves(&board, Player::Horizontal),
        vec![Move::new(0, 0), Move::new(0, 2), Move::new(1, 2)]
    );
}

#[test]
fn random_boards_match_references() {
    let mut rng = StdRng::seed_from_u64(2024);
    for width in 1..=16 {
        for placements in [0, 3, 10, 40, 200] {
            let board = random_board(width, placements, &mut rng);
            for player in [Player::Vertical, Player::Horizontal] {
                let moves = generate_moves(&board, player);
                assert_eq!(moves, brute_force(&board, player), "{board}");
                assert_eq!(packed_moves(&board, player), moves, "{board}");
                assert_eq!(
                    Bitboard::from(&board).has_moves(player),
                    !moves.is_empty()
                );
            }
        }
    }
}

#[test]
fn filtering_preserves_order() {
    let mut rng = StdRng::seed_from_u64(7);
    for width in [4, 8, 12] {
        let mut board = Board::empty(width).unwrap();
        let candidates = generate_moves(&board, Player::Vertical);
        // Both players move, then vertical is to move again.
        for player in [Player::Vertical, Player::Horizontal] {
            let moves = generate_moves(&board, player);
            board.make_move(moves[rng.gen_range(0..moves.len())], player);
        }
        assert_eq!(
            filter_moves(&candidates, &board, Player::Vertical),
            generate_moves(&board, Player::Vertical)
        );
    }
}

#[test]
fn round_trip_through_packed_board() {
    let mut rng = StdRng::seed_from_u64(99);
    for width in [2, 5, 12, 16] {
        let board = random_board(width, 30, &mut rng);
        assert_eq!(Board::from(&Bitboard::from(&board)), board);
    }
}
