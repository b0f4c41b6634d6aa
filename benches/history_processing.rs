use criterion::{criterion_group, criterion_main, Criterion};
use elo_history::{
    model::{constants::NFL_538, EloModel, HistoryEngine, MarginOfVictoryModel},
    utils::test_utils::generate_league
};

fn process_league(n_teams: usize, n_seasons: i32, n_periods: i32) {
    let matches = generate_league(n_teams, n_seasons, n_periods, 42);
    let engine = HistoryEngine::new(MarginOfVictoryModel::from_preset(&NFL_538), 0.75, 1500.0).unwrap();

    engine.compute_history(&matches, None);
}

fn group_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("history-processing");
    group.sample_size(25);
    group.bench_function("nfl: t=32,s=10,p=17", |b| b.iter(|| process_league(32, 10, 17)));
    group.bench_function("nfl: t=32,s=50,p=17", |b| b.iter(|| process_league(32, 50, 17)));
    group.finish();

    let matches = generate_league(30, 20, 82, 7);
    let engine = HistoryEngine::new(EloModel::from_preset(&NFL_538), 0.75, 1500.0).unwrap();
    c.bench_function("elo: t=30,s=20,p=82", |b| b.iter(|| engine.compute_history(&matches, None)));
}

criterion_group!(benches, group_call);
criterion_main!(benches);
