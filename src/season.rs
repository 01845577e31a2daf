//! Full-season championship Monte Carlo engine.
//!
//! Each season replication runs every calendar round through the race
//! engine and accumulates championship points per driver (WDC) and per
//! constructor as the sum of its two drivers (WCC). Seeding is two-level:
//!
//! ```text
//! season_seed = base_seed + season_index
//! race_seed   = season_seed + race_index * 1000
//! ```
//!
//! which keeps every race of every season on an independent, reproducible
//! random source. Standings ties are broken by a documented convention,
//! not a strategic ranking: the stable descending sort leaves equal point
//! totals in original entry order, so the lowest original index ranks
//! first.

use std::collections::BTreeMap;
use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SimulationError};
use crate::race::{RaceConfig, simulate_race};
use crate::types::{Team, Track, points_for_position};

/// Seed stride between consecutive rounds of one season.
const RACE_SEED_STRIDE: u64 = 1000;

/// Aggregated championship statistics for one entrant (a driver in the
/// WDC tables, a constructor in the WCC tables).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrantSeasonStats {
    /// Fraction of seasons this entrant took the championship.
    pub title_probability: f64,
    /// Mean season points across all replications.
    pub expected_points: f64,
    /// Mean final championship position (1-based).
    pub expected_position: f64,
    /// Probability of each final standings position; sums to 1.0.
    pub standings_distribution: BTreeMap<u32, f64>,
}

/// Result of a season-level Monte Carlo run for both parallel
/// championships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonStatistics {
    /// Number of season replications aggregated.
    pub seasons: usize,
    /// Drivers' championship tables, keyed by driver name.
    pub drivers: BTreeMap<String, EntrantSeasonStats>,
    /// Constructors' championship tables, keyed by team name.
    pub teams: BTreeMap<String, EntrantSeasonStats>,
}

/// Point totals from a single season replication, indexed like the input
/// field.
struct SeasonOutcome {
    driver_points: Vec<f64>,
    team_points: Vec<f64>,
}

/// Run a Monte Carlo ensemble of full-season championship simulations.
///
/// # Errors
///
/// Returns [`SimulationError::Parameter`] when `seasons` is zero, the
/// calendar is empty, or the underlying race arguments are invalid; all
/// checks run before any replication starts.
pub fn simulate_season_monte_carlo(
    calendar: &[Track],
    teams: &[Team],
    laps_per_race: u32,
    seasons: usize,
    base_seed: u64,
    config: &RaceConfig,
) -> Result<SeasonStatistics> {
    if seasons == 0 {
        return Err(SimulationError::parameter("seasons", "must be >= 1"));
    }
    if calendar.is_empty() {
        return Err(SimulationError::parameter("calendar", "must not be empty"));
    }
    if teams.is_empty() {
        return Err(SimulationError::parameter("teams", "must not be empty"));
    }
    if laps_per_race == 0 {
        return Err(SimulationError::parameter("laps_per_race", "must be >= 1"));
    }
    config.validate()?;

    let driver_names: Vec<String> = teams
        .iter()
        .flat_map(|team| team.drivers.iter().map(|d| d.name.clone()))
        .collect();
    let team_names: Vec<String> = teams.iter().map(|team| team.name.clone()).collect();

    // Driver name -> (driver index, team index), fixed for the whole run
    let field_index: HashMap<&str, (usize, usize)> = teams
        .iter()
        .enumerate()
        .flat_map(|(team_index, team)| {
            team.drivers
                .iter()
                .map(move |driver| (driver.name.as_str(), team_index))
        })
        .enumerate()
        .map(|(driver_index, (name, team_index))| (name, (driver_index, team_index)))
        .collect();

    debug!(
        rounds = calendar.len(),
        seasons,
        base_seed,
        "running season Monte Carlo"
    );

    let outcomes: Vec<SeasonOutcome> = (0..seasons)
        .into_par_iter()
        .map(|season_index| {
            run_season(
                calendar,
                teams,
                laps_per_race,
                base_seed + season_index as u64,
                config,
                &field_index,
                driver_names.len(),
            )
        })
        .collect::<Result<_>>()?;

    Ok(aggregate(seasons, &driver_names, &team_names, &outcomes))
}

fn run_season(
    calendar: &[Track],
    teams: &[Team],
    laps_per_race: u32,
    season_seed: u64,
    config: &RaceConfig,
    field_index: &HashMap<&str, (usize, usize)>,
    driver_count: usize,
) -> Result<SeasonOutcome> {
    let mut driver_points = vec![0.0; driver_count];
    let mut team_points = vec![0.0; teams.len()];

    for (race_index, track) in calendar.iter().enumerate() {
        let race_seed = season_seed + race_index as u64 * RACE_SEED_STRIDE;
        let result = simulate_race(track, teams, laps_per_race, race_seed, config)?;

        for (position_index, name) in result.classification.iter().enumerate() {
            let points = f64::from(points_for_position(position_index + 1));
            if points > 0.0 {
                if let Some(&(driver_index, team_index)) = field_index.get(name.as_str()) {
                    driver_points[driver_index] += points;
                    team_points[team_index] += points;
                }
            }
        }
    }

    Ok(SeasonOutcome { driver_points, team_points })
}

/// Standings order for one championship: indices sorted by descending
/// points; the stable sort breaks ties by original entry index.
fn standings_order(points: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| points[b].total_cmp(&points[a]));
    order
}

#[derive(Default)]
struct Accumulator {
    titles: u64,
    points_sum: f64,
    position_sum: u64,
    position_counts: BTreeMap<u32, u64>,
}

fn accumulate_championship(accumulators: &mut [Accumulator], points: &[f64]) {
    let order = standings_order(points);
    accumulators[order[0]].titles += 1;
    for (rank_index, &entrant_index) in order.iter().enumerate() {
        let position = rank_index as u32 + 1;
        let acc = &mut accumulators[entrant_index];
        acc.points_sum += points[entrant_index];
        acc.position_sum += u64::from(position);
        *acc.position_counts.entry(position).or_insert(0) += 1;
    }
}

fn finalize(
    names: &[String],
    accumulators: Vec<Accumulator>,
    inv: f64,
) -> BTreeMap<String, EntrantSeasonStats> {
    names
        .iter()
        .cloned()
        .zip(accumulators)
        .map(|(name, acc)| {
            let stats = EntrantSeasonStats {
                title_probability: acc.titles as f64 * inv,
                expected_points: acc.points_sum * inv,
                expected_position: acc.position_sum as f64 * inv,
                standings_distribution: acc
                    .position_counts
                    .into_iter()
                    .map(|(position, count)| (position, count as f64 * inv))
                    .collect(),
            };
            (name, stats)
        })
        .collect()
}

fn aggregate(
    seasons: usize,
    driver_names: &[String],
    team_names: &[String],
    outcomes: &[SeasonOutcome],
) -> SeasonStatistics {
    let mut driver_acc: Vec<Accumulator> =
        (0..driver_names.len()).map(|_| Accumulator::default()).collect();
    let mut team_acc: Vec<Accumulator> =
        (0..team_names.len()).map(|_| Accumulator::default()).collect();

    for outcome in outcomes {
        accumulate_championship(&mut driver_acc, &outcome.driver_points);
        accumulate_championship(&mut team_acc, &outcome.team_points);
    }

    let inv = 1.0 / seasons as f64;
    SeasonStatistics {
        seasons,
        drivers: finalize(driver_names, driver_acc, inv),
        teams: finalize(team_names, team_acc, inv),
    }
}
