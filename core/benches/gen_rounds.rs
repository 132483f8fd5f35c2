use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sapper_core::*;

const SIZE: Coord2 = (18, 18);

fn bench_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_round");
    let total = mult(SIZE.0, SIZE.1);

    for round in [1, 4, 6, 12] {
        group.bench_with_input(BenchmarkId::from_parameter(round), &round, |b, &round| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                black_box(RoundConfig::derive(round, total, seed))
            });
        });
    }

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_board");
    let total = mult(SIZE.0, SIZE.1);

    for round in [1, 4, 6, 12] {
        let config = RoundConfig::derive(round, total, 7);
        group.bench_with_input(BenchmarkId::from_parameter(round), &config, |b, config| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                black_box(RandomBoardGenerator::new(seed, (9, 9)).generate(SIZE, config))
            });
        });
    }

    group.finish();
}

fn bench_opening_reveal(c: &mut Criterion) {
    let total = mult(SIZE.0, SIZE.1);
    let config = RoundConfig::derive(1, total, 7);

    c.bench_function("opening_reveal", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            let mut board = RandomBoardGenerator::new(seed, (9, 9)).generate(SIZE, &config);
            let mut player = Player::default();
            black_box(board.reveal((9, 9), &mut player))
        });
    });
}

criterion_group!(benches, bench_derive, bench_generate, bench_opening_reveal);
criterion_main!(benches);
