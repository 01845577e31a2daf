//! End-to-end championship scenarios across the whole engine stack.

use std::collections::BTreeMap;

use gridsim::{
    Car, Driver, RaceConfig, Team, Track, championship_entropy, simulate_race_monte_carlo,
    simulate_season_monte_carlo,
};
use tracing_subscriber::EnvFilter;

/// Route engine tracing through the test harness; `RUST_LOG=debug` shows
/// per-replication progress.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn make_team(name: &str, base_speed: f64) -> Team {
    let car = Car::new(name, base_speed, 0.80, 0.85, 1.0, 0.98).unwrap();
    let drivers = vec![
        Driver::new(format!("{name}_D1"), name, 0.0, 1.0).unwrap(),
        Driver::new(format!("{name}_D2"), name, 0.0, 1.0).unwrap(),
    ];
    Team::new(name, car, drivers).unwrap()
}

fn two_track_calendar() -> Vec<Track> {
    vec![
        Track::new("Velocita", 0.70, 0.60, 0.75, 0.04, 0.40).unwrap(),
        Track::new("Monte Carlo", 0.35, 0.20, 0.55, 0.07, 0.80).unwrap(),
    ]
}

/// Sum of a team's drivers' winner probabilities.
fn team_win_probability(
    stats: &BTreeMap<String, gridsim::EntrantRaceStats>,
    team: &Team,
) -> f64 {
    team.drivers.iter().map(|d| stats[&d.name].winner_probability).sum()
}

#[test]
fn slower_team_wins_strictly_less_often_on_every_track() {
    init_tracing();
    // Two teams, two tracks, 50 laps, zero noise, 1000 replications:
    // the base-speed-disadvantaged team must come out strictly behind
    let fast = make_team("Quicksilver", 80.0);
    let slow = make_team("Laggard", 80.3);
    let teams = vec![fast.clone(), slow.clone()];
    let config = RaceConfig { noise_std: 0.0, ..RaceConfig::default() };

    for track in two_track_calendar() {
        let stats =
            simulate_race_monte_carlo(&track, &teams, 50, 1000, 42, &config).unwrap();

        let fast_wins = team_win_probability(&stats.entrants, &fast);
        let slow_wins = team_win_probability(&stats.entrants, &slow);

        assert!(
            slow_wins < fast_wins,
            "on {}: slow team won {slow_wins} vs fast team {fast_wins}",
            track.name
        );
        assert!(
            (fast_wins + slow_wins - 1.0).abs() < 1e-9,
            "win probabilities must sum to 1.0, got {}",
            fast_wins + slow_wins
        );
    }
}

#[test]
fn full_season_produces_consistent_championship_tables() {
    init_tracing();
    let calendar = two_track_calendar();
    let teams = vec![
        make_team("Quicksilver", 80.0),
        make_team("Laggard", 80.3),
        make_team("Backmarker", 80.6),
    ];
    let stats = simulate_season_monte_carlo(
        &calendar,
        &teams,
        20,
        50,
        100,
        &RaceConfig::default(),
    )
    .unwrap();

    // Both championships are complete probability distributions
    let wdc_sum: f64 = stats.drivers.values().map(|e| e.title_probability).sum();
    let wcc_sum: f64 = stats.teams.values().map(|e| e.title_probability).sum();
    assert!((wdc_sum - 1.0).abs() < 1e-9);
    assert!((wcc_sum - 1.0).abs() < 1e-9);

    for entry in stats.drivers.values().chain(stats.teams.values()) {
        let dist_sum: f64 = entry.standings_distribution.values().sum();
        assert!((dist_sum - 1.0).abs() < 1e-9);
        assert!(entry.expected_points >= 0.0);
        assert!(entry.expected_position >= 1.0);
    }

    // Championship volatility lives in [0, ln(n)]
    let wdc_entropy =
        championship_entropy(stats.drivers.values().map(|e| e.title_probability));
    assert!(wdc_entropy >= 0.0);
    assert!(wdc_entropy <= (stats.drivers.len() as f64).ln() + 1e-12);
}

#[test]
fn whole_stack_is_reproducible_from_the_base_seed() {
    let calendar = two_track_calendar();
    let teams = vec![make_team("Quicksilver", 80.0), make_team("Laggard", 80.3)];
    let config = RaceConfig::default();

    let race_a =
        simulate_race_monte_carlo(&calendar[0], &teams, 15, 100, 42, &config).unwrap();
    let race_b =
        simulate_race_monte_carlo(&calendar[0], &teams, 15, 100, 42, &config).unwrap();
    assert_eq!(race_a, race_b);

    let season_a =
        simulate_season_monte_carlo(&calendar, &teams, 15, 20, 100, &config).unwrap();
    let season_b =
        simulate_season_monte_carlo(&calendar, &teams, 15, 20, 100, &config).unwrap();
    assert_eq!(season_a, season_b);

    // A different base seed must actually change something measurable
    let season_c =
        simulate_season_monte_carlo(&calendar, &teams, 15, 20, 101, &config).unwrap();
    assert_ne!(season_a, season_c);
}

#[test]
fn results_surface_as_plain_json_data() {
    let calendar = two_track_calendar();
    let teams = vec![make_team("Quicksilver", 80.0), make_team("Laggard", 80.3)];
    let config = RaceConfig::default();

    let race = simulate_race_monte_carlo(&calendar[0], &teams, 10, 25, 7, &config).unwrap();
    let season = simulate_season_monte_carlo(&calendar, &teams, 10, 5, 7, &config).unwrap();

    // Everything the engine exposes must be a JSON object of scalars,
    // mappings and sequences; callers persist these externally
    let race_value = serde_json::to_value(&race).unwrap();
    assert!(race_value.is_object());
    assert!(race_value["entrants"].is_object());

    let season_value = serde_json::to_value(&season).unwrap();
    assert!(season_value.is_object());
    assert!(season_value["drivers"].is_object());
    assert!(season_value["teams"].is_object());
}
