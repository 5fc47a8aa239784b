//! Criterion benchmarks for move enumeration and lookahead choice.
//!
//! Run with:
//!     cargo bench --bench move_gen

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use ninja_taisen_engine::engine::bot_strategy::{lookup_strategy, BotStrategy};
use ninja_taisen_engine::engine::lookahead::opponent_win_probability;
use ninja_taisen_engine::engine::simulator::play_turn;
use ninja_taisen_engine::games::ninja_taisen::board::Board;
use ninja_taisen_engine::games::ninja_taisen::dice::DiceRolls;
use ninja_taisen_engine::games::ninja_taisen::moves::gather_all_moves;
use ninja_taisen_engine::games::ninja_taisen::types::Team;

struct Fixture {
    label: String,
    board: Board,
    team: Team,
    dice: DiceRolls,
}

/// Positions reached by playing a few seeded turns from a fresh deal.
fn build_fixtures() -> Vec<Fixture> {
    let strategy = lookup_strategy("metric_position").unwrap();
    let mut fixtures = Vec::new();

    for seed in [1u64, 2, 3] {
        for turns in [0usize, 4, 8] {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = Board::new_game(&mut rng);
            let mut team = Team::Monkey;
            for _ in 0..turns {
                if board.is_terminal() {
                    break;
                }
                let dice = DiceRolls::roll(&mut rng);
                play_turn(&mut board, team, &dice, strategy.as_ref(), &mut rng).unwrap();
                team = team.other();
            }
            if board.is_terminal() {
                continue;
            }
            fixtures.push(Fixture {
                label: format!("s{}_t{}", seed, turns),
                board,
                team,
                dice: DiceRolls::roll(&mut rng),
            });
        }
    }

    assert!(!fixtures.is_empty(), "no non-terminal fixtures generated");
    fixtures
}

fn bench_gather_all_moves(c: &mut Criterion) {
    let fixtures = build_fixtures();
    let mut group = c.benchmark_group("gather_all_moves");

    for fixture in &fixtures {
        group.bench_with_input(BenchmarkId::new("enumerate", &fixture.label), fixture, |b, f| {
            b.iter(|| gather_all_moves(black_box(&f.board), f.team, &f.dice).unwrap().len());
        });
    }

    group.finish();
}

fn bench_opponent_win_probability(c: &mut Criterion) {
    let fixtures = build_fixtures();
    let mut group = c.benchmark_group("opponent_win_probability");
    group.sample_size(20);

    for fixture in &fixtures {
        group.bench_with_input(BenchmarkId::new("27_rolls", &fixture.label), fixture, |b, f| {
            b.iter(|| opponent_win_probability(black_box(&f.board), f.team.other()).unwrap());
        });
    }

    group.finish();
}

fn bench_choose(c: &mut Criterion) {
    let fixtures = build_fixtures();
    let strategies: Vec<Box<dyn BotStrategy>> = ["metric_strength", "lookahead_strength"]
        .iter()
        .map(|name| lookup_strategy(name).unwrap())
        .collect();

    let mut group = c.benchmark_group("choose_moves");
    group.sample_size(10);

    for fixture in fixtures.iter().take(3) {
        let candidates = gather_all_moves(&fixture.board, fixture.team, &fixture.dice).unwrap();
        for strategy in &strategies {
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), &fixture.label),
                &candidates,
                |b, candidates| {
                    let mut rng = StdRng::seed_from_u64(0);
                    b.iter(|| strategy.choose_moves(candidates, &mut rng).unwrap().is_some());
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_gather_all_moves,
    bench_opponent_win_probability,
    bench_choose
);
criterion_main!(benches);
