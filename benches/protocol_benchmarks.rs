//! Benchmarks for the UCI line protocol.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use uci_session::uci::{effective_options, ContemptRange, EngineLine, GuiCommand, OptionSet};

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    let info = "info depth 22 seldepth 31 multipv 1 score cp 31 nodes 2741802 nps 1368938 \
                hashfull 884 tbhits 0 time 2003 pv e2e4 e7e5 g1f3 b8c6 f1b5 a7a6 b5a4 g8f6";
    group.bench_function("info", |b| b.iter(|| EngineLine::decode(black_box(info))));
    group.bench_function("bestmove", |b| {
        b.iter(|| EngineLine::decode(black_box("bestmove e2e4 ponder e7e5")))
    });
    group.bench_function("option", |b| {
        b.iter(|| {
            EngineLine::decode(black_box(
                "option name Minimum Thinking Time type spin default 20 min 0 max 5000",
            ))
        })
    });

    group.finish();
}

fn bench_commands(c: &mut Criterion) {
    let mut group = c.benchmark_group("commands");

    let moves: Vec<String> = ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6"]
        .iter()
        .cycle()
        .take(80)
        .map(|m| (*m).to_string())
        .collect();
    let position = GuiCommand::PositionStart(moves);
    group.bench_function("position_80_plies", |b| {
        b.iter(|| black_box(&position).to_string())
    });

    let mut rng = StdRng::seed_from_u64(1);
    let overrides = OptionSet::new().with("Threads", 1).with("Hash", 16);
    group.bench_function("effective_options", |b| {
        b.iter(|| {
            effective_options(
                black_box(&overrides),
                Some(&ContemptRange::default()),
                &mut rng,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_decode, bench_commands);
criterion_main!(benches);
