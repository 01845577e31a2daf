//! Benchmarks for season-level Monte Carlo replication.

use criterion::{Criterion, criterion_group, criterion_main};
use gridsim::{Car, Driver, RaceConfig, Team, Track, simulate_season_monte_carlo};
use std::hint::black_box;

fn sample_calendar(rounds: usize) -> Vec<Track> {
    (0..rounds)
        .map(|i| {
            Track::new(
                format!("Round_{i}"),
                0.5 + (i % 4) as f64 * 0.1,
                0.3 + (i % 3) as f64 * 0.2,
                0.7,
                0.04 + (i % 2) as f64 * 0.02,
                0.50,
            )
            .unwrap()
        })
        .collect()
}

fn sample_teams(n: usize) -> Vec<Team> {
    (0..n)
        .map(|i| {
            let name = format!("Team_{i}");
            let car = Car::new(&name, 80.0 + i as f64 * 0.3, 0.80, 0.85, 1.0, 0.98).unwrap();
            let drivers = vec![
                Driver::new(format!("{name}_D1"), &name, 0.0, 1.0).unwrap(),
                Driver::new(format!("{name}_D2"), &name, 0.05, 1.1).unwrap(),
            ];
            Team::new(&name, car, drivers).unwrap()
        })
        .collect()
}

fn bench_season_monte_carlo(c: &mut Criterion) {
    let calendar = sample_calendar(6);
    let teams = sample_teams(5);
    let config = RaceConfig::default();

    let mut group = c.benchmark_group("season_monte_carlo");
    group.sample_size(10);
    group.bench_function("fifty_seasons_six_rounds", |b| {
        b.iter(|| {
            let stats = simulate_season_monte_carlo(
                black_box(&calendar),
                black_box(&teams),
                black_box(25),
                black_box(50),
                black_box(100),
                black_box(&config),
            )
            .unwrap();
            black_box(stats)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_season_monte_carlo);
criterion_main!(benches);
