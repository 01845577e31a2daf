//! Race-level Monte Carlo aggregation.
//!
//! Replication *i* of a run uses `seed = base_seed + i`, so every
//! replication owns an independent, reproducible random source and no
//! state is shared between them. The fan-out runs on rayon; results come
//! back in replication order and are aggregated sequentially, which makes
//! the statistics bit-identical across runs and across thread counts.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SimulationError};
use crate::race::{RaceConfig, RaceResult, simulate_race};
use crate::types::{Team, Track, points_for_position};

/// Aggregated statistics for one driver across a race ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrantRaceStats {
    /// Fraction of replications won.
    pub winner_probability: f64,
    /// Fraction of replications finishing in the top three.
    pub podium_probability: f64,
    /// Mean finishing position (1-based, DNF slots included).
    pub expected_position: f64,
    /// Mean championship points per the standard table.
    pub expected_points: f64,
    /// Probability of finishing in each position; sums to 1.0.
    pub finish_distribution: BTreeMap<u32, f64>,
}

/// Result of a race-level Monte Carlo run, keyed by driver name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceStatistics {
    /// Number of replications aggregated.
    pub simulations: usize,
    /// Per-driver statistics.
    pub entrants: BTreeMap<String, EntrantRaceStats>,
}

/// Run a Monte Carlo ensemble of race replications and aggregate the
/// outcomes.
///
/// # Errors
///
/// Returns [`SimulationError::Parameter`] when `simulations` is zero or the
/// underlying race arguments are invalid; all checks run before any
/// replication starts.
pub fn simulate_race_monte_carlo(
    track: &Track,
    teams: &[Team],
    laps: u32,
    simulations: usize,
    base_seed: u64,
    config: &RaceConfig,
) -> Result<RaceStatistics> {
    if simulations == 0 {
        return Err(SimulationError::parameter("simulations", "must be >= 1"));
    }
    if laps == 0 {
        return Err(SimulationError::parameter("laps", "must be >= 1"));
    }
    if teams.is_empty() {
        return Err(SimulationError::parameter("teams", "must not be empty"));
    }
    config.validate()?;

    debug!(track = %track.name, simulations, base_seed, "running race Monte Carlo");

    let results: Vec<RaceResult> = (0..simulations)
        .into_par_iter()
        .map(|i| simulate_race(track, teams, laps, base_seed + i as u64, config))
        .collect::<Result<_>>()?;

    Ok(aggregate(teams, simulations, &results))
}

#[derive(Default)]
struct Accumulator {
    wins: u64,
    podiums: u64,
    position_sum: u64,
    points_sum: f64,
    position_counts: BTreeMap<u32, u64>,
}

fn aggregate(teams: &[Team], simulations: usize, results: &[RaceResult]) -> RaceStatistics {
    let mut accumulators: BTreeMap<String, Accumulator> = teams
        .iter()
        .flat_map(|team| team.drivers.iter())
        .map(|driver| (driver.name.clone(), Accumulator::default()))
        .collect();

    for result in results {
        for (position_index, name) in result.classification.iter().enumerate() {
            let position = position_index as u32 + 1;
            let acc = accumulators.entry(name.clone()).or_default();
            if position == 1 {
                acc.wins += 1;
            }
            if position <= 3 {
                acc.podiums += 1;
            }
            acc.position_sum += u64::from(position);
            acc.points_sum += f64::from(points_for_position(position as usize));
            *acc.position_counts.entry(position).or_insert(0) += 1;
        }
    }

    let inv = 1.0 / simulations as f64;
    let entrants = accumulators
        .into_iter()
        .map(|(name, acc)| {
            let stats = EntrantRaceStats {
                winner_probability: acc.wins as f64 * inv,
                podium_probability: acc.podiums as f64 * inv,
                expected_position: acc.position_sum as f64 * inv,
                expected_points: acc.points_sum * inv,
                finish_distribution: acc
                    .position_counts
                    .into_iter()
                    .map(|(position, count)| (position, count as f64 * inv))
                    .collect(),
            };
            (name, stats)
        })
        .collect();

    RaceStatistics { simulations, entrants }
}
