//! Criterion benchmarks measure time of move generation and perft calculation.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use raychess::chess::perft::{perft, perft_parallel};
use raychess::chess::position::Position;
use shakmaty::{CastlingMode, Chess, Position as ShakmatyPosition};

const POSITIONS: [&str; 6] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
];

/// All positions one move away from the reference ones.
fn positions() -> Vec<Position> {
    POSITIONS
        .iter()
        .map(|fen| Position::from_fen(fen).unwrap())
        .flat_map(|position| {
            position
                .generate_moves()
                .iter()
                .map(|next_move| position.make_move(next_move))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn movegen_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Move generation");
    let positions = positions();
    group.throughput(criterion::Throughput::Elements(positions.len() as u64));
    group.bench_with_input(
        BenchmarkId::new(
            "movegen_raychess",
            format!("{} arbitrary positions", positions.len()),
        ),
        &positions,
        |b, positions| {
            b.iter(|| {
                for position in positions {
                    std::hint::black_box(position.generate_moves());
                }
            });
        },
    );
    // shakmaty is a reasonable reference with stable performance. raychess does
    // more during the move generation (check tagging of every move) so it's not
    // important to be faster, but it's an important reference point.
    let shakmaty_positions = positions
        .iter()
        .map(|position| {
            let setup: shakmaty::fen::Fen = position.to_string().parse().unwrap();
            setup.into_position(CastlingMode::Standard).unwrap()
        })
        .collect::<Vec<Chess>>();
    group.bench_with_input(
        BenchmarkId::new(
            "movegen_reference_shakmaty",
            format!("{} arbitrary positions", shakmaty_positions.len()),
        ),
        &shakmaty_positions,
        |b, positions| {
            b.iter(|| {
                for position in positions {
                    std::hint::black_box(position.legal_moves());
                }
            });
        },
    );
    group.finish();
}

criterion_group! {
    name = movegen;
    config = Criterion::default().sample_size(100);
    targets = movegen_bench
}

// This acts both as performance and correctness test.
fn perft_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    let pool = rayon::ThreadPoolBuilder::new().build().unwrap();
    for (fen, depth, nodes) in [
        (POSITIONS[0], 5, 4_865_609),
        (POSITIONS[1], 4, 4_085_603),
        (POSITIONS[2], 5, 674_624),
        (POSITIONS[3], 4, 422_333),
        (POSITIONS[5], 4, 3_894_594),
    ] {
        let position = Position::from_fen(fen).unwrap();
        group.throughput(criterion::Throughput::Elements(nodes));
        group.bench_with_input(
            BenchmarkId::new("perft", format!("position {fen}, depth {depth}")),
            &depth,
            |b, &depth| {
                b.iter(|| assert_eq!(perft(&position, depth), nodes));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("perft_parallel", format!("position {fen}, depth {depth}")),
            &depth,
            |b, &depth| {
                b.iter(|| assert_eq!(perft_parallel(&position, depth, &pool), nodes));
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = perft_group;
    config = Criterion::default().sample_size(10);
    targets = perft_bench
}

criterion_main!(movegen, perft_group);
