//! Criterion benchmarks measure time of the clearly separated pieces of code.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use domineering::evaluation::Evaluator;
use domineering::game::movegen::generate_moves;
use domineering::game::{Bitboard, Board, Player};
use domineering::search::{self, Config, Limits, RolloutPolicy};
use rand::rngs::StdRng;
use rand::SeedableRng;

const WIDTHS: [u8; 3] = [8, 12, 16];

/// Plays a few greedy moves so that the boards are not trivially empty.
fn midgame(width: u8) -> Board {
    let policy = RolloutPolicy::new(width).unwrap();
    let mut rng = StdRng::seed_from_u64(u64::from(width));
    let mut bitboard = Bitboard::from(&Board::empty(width).unwrap());
    let mut player = Player::Vertical;
    for _ in 0..width {
        let Some(chosen) = policy.choose_move(&mut bitboard, player, &mut rng) else {
            break;
        };
        bitboard.make_move(chosen, player);
        player = !player;
    }
    Board::from(&bitboard)
}

fn movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("Move generation");
    for width in WIDTHS {
        let board = midgame(width);
        let bitboard = Bitboard::from(&board);
        group.bench_with_input(BenchmarkId::new("board", width), &board, |b, board| {
            b.iter(|| generate_moves(black_box(board), Player::Horizontal));
        });
        group.bench_with_input(
            BenchmarkId::new("bitboard", width),
            &bitboard,
            |b, bitboard| {
                b.iter(|| black_box(bitboard).generate_moves(Player::Horizontal));
            },
        );
    }
    group.finish();
}

fn evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Evaluation");
    for width in WIDTHS {
        let evaluator = Evaluator::new(width).unwrap();
        let bitboard = Bitboard::from(&midgame(width));
        group.bench_with_input(BenchmarkId::from_parameter(width), &bitboard, |b, bitboard| {
            b.iter(|| evaluator.evaluate(black_box(bitboard), Player::Vertical));
        });
    }
    group.finish();
}

fn rollout(c: &mut Criterion) {
    let mut group = c.benchmark_group("Rollout");
    for width in WIDTHS {
        let policy = RolloutPolicy::new(width).unwrap();
        let start = Bitboard::from(&Board::empty(width).unwrap());
        let mut rng = StdRng::seed_from_u64(0);
        group.bench_with_input(BenchmarkId::from_parameter(width), &start, |b, start| {
            b.iter(|| {
                let mut board = *start;
                policy.rollout(&mut board, Player::Vertical, &mut rng)
            });
        });
    }
    group.finish();
}

criterion_group! {
    name = components;
    config = Criterion::default().sample_size(50);
    targets = movegen, evaluation, rollout
}

fn search_iterations(c: &mut Criterion) {
    let board = Board::empty(12).unwrap();
    let policy = RolloutPolicy::new(12).unwrap();
    let config = Config::default();
    c.bench_function("search 500 iterations on 12x12", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| {
            search::go(
                &board,
                Player::Vertical,
                &Limits::iterations(500),
                &config,
                &policy,
                &mut rng,
                &mut std::io::sink(),
            )
            .unwrap()
        });
    });
}

criterion_group! {
    name = full_search;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(20));
    targets = search_iterations
}

criterion_main!(components, full_search);
