//! Single-race stochastic state machine.
//!
//! One race replication is a pure function of its inputs and seed: a fresh
//! [`ChaCha8Rng`] is built from the seed, every driver gets its own battery
//! and tyre state, and the lap loop mutates nothing shared. Per lap, each
//! running entry harvests, deploys, accumulates a (noisy) lap time, rolls
//! the reliability hazard, ages its tyres and serves any scheduled pit
//! stop; then the field is re-ranked and adjacent pairs resolve persistent
//! overtakes (see [`overtake`]).
//!
//! Retired entries are skipped on subsequent laps. The final classification
//! lists finishers by ascending cumulative time with DNFs appended in the
//! order they retired.

mod entry;
mod overtake;

use std::collections::{BTreeMap, HashMap};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, SimulationError};
use crate::physics::noisy_lap_time;
use crate::state::DEFAULT_MAX_CHARGE;
use crate::stint::find_best_constant_deploy;
use crate::types::{Strategy, Team, Track};
use entry::RunningEntry;
use overtake::overtake_sweep;

/// Default seconds added to cumulative time on every pit stop.
pub const PIT_LOSS: f64 = 20.0;

/// Default seconds transferred between a pair on a successful overtake.
pub const PASS_TIME_DELTA: f64 = 0.2;

/// Race-level tunables shared by every replication of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Baseline standard deviation of Gaussian lap-time noise; each
    /// driver's effective sigma is `noise_std * consistency`. Zero makes
    /// lap times fully deterministic.
    pub noise_std: f64,
    /// Seconds transferred on a successful overtake.
    pub pass_time_delta: f64,
    /// Seconds added to cumulative time per pit stop.
    pub pit_loss: f64,
    /// Battery capacity in MJ.
    pub max_charge: f64,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            noise_std: 0.05,
            pass_time_delta: PASS_TIME_DELTA,
            pit_loss: PIT_LOSS,
            max_charge: DEFAULT_MAX_CHARGE,
        }
    }
}

impl RaceConfig {
    /// Check the config before any replication starts.
    pub fn validate(&self) -> Result<()> {
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(SimulationError::parameter(
                "noise_std",
                format!("must be finite and >= 0.0, got {}", self.noise_std),
            ));
        }
        if self.pass_time_delta < 0.0 {
            return Err(SimulationError::parameter(
                "pass_time_delta",
                format!("must be >= 0.0, got {}", self.pass_time_delta),
            ));
        }
        if self.pit_loss < 0.0 {
            return Err(SimulationError::parameter(
                "pit_loss",
                format!("must be >= 0.0, got {}", self.pit_loss),
            ));
        }
        if self.max_charge <= 0.0 {
            return Err(SimulationError::parameter(
                "max_charge",
                format!("must be > 0.0, got {}", self.max_charge),
            ));
        }
        Ok(())
    }
}

/// Outcome of one race replication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    /// Driver names ordered by finishing position: classified finishers by
    /// ascending cumulative time, then DNFs in retirement order.
    pub classification: Vec<String>,
    /// Driver names that did not finish, in retirement order.
    pub dnfs: Vec<String>,
    /// Per-driver lap times for the laps each driver attempted.
    pub lap_times: BTreeMap<String, Vec<f64>>,
}

/// Simulate one race with default per-car strategies.
///
/// Every driver uses the constant-deploy strategy found by
/// [`find_best_constant_deploy`] for the shared team car.
///
/// # Errors
///
/// Returns [`SimulationError::Parameter`] when `laps` is zero, `teams` is
/// empty, or the config fails validation; all checks run before any
/// stochastic work happens.
pub fn simulate_race(
    track: &Track,
    teams: &[Team],
    laps: u32,
    seed: u64,
    config: &RaceConfig,
) -> Result<RaceResult> {
    run_race(track, teams, laps, seed, config, None)
}

/// Simulate one race with explicit per-driver strategies.
///
/// Drivers not present in `strategies` fall back to the default
/// constant-deploy search, exactly as in [`simulate_race`].
pub fn simulate_race_with_strategies(
    track: &Track,
    teams: &[Team],
    laps: u32,
    seed: u64,
    config: &RaceConfig,
    strategies: &HashMap<String, Strategy>,
) -> Result<RaceResult> {
    run_race(track, teams, laps, seed, config, Some(strategies))
}

fn run_race(
    track: &Track,
    teams: &[Team],
    laps: u32,
    seed: u64,
    config: &RaceConfig,
    strategies: Option<&HashMap<String, Strategy>>,
) -> Result<RaceResult> {
    if laps == 0 {
        return Err(SimulationError::parameter("laps", "must be >= 1"));
    }
    if teams.is_empty() {
        return Err(SimulationError::parameter("teams", "must not be empty"));
    }
    config.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut entries: Vec<RunningEntry<'_>> = Vec::with_capacity(teams.len() * 2);
    for team in teams {
        let default_strategy = find_best_constant_deploy(track, &team.car, laps)?.strategy;
        for driver in &team.drivers {
            let strategy = strategies
                .and_then(|map| map.get(&driver.name))
                .cloned()
                .unwrap_or_else(|| default_strategy.clone());
            entries.push(RunningEntry::new(driver, &team.car, strategy, config.max_charge)?);
        }
    }

    debug!(
        track = %track.name,
        laps,
        seed,
        entries = entries.len(),
        "starting race replication"
    );

    let mut retired_count = 0u32;
    for lap in 1..=laps {
        for entry in entries.iter_mut() {
            if !entry.running {
                continue;
            }
            run_entry_lap(entry, track, lap, config, &mut retired_count, &mut rng)?;
        }

        let mut ranked: Vec<usize> =
            (0..entries.len()).filter(|&i| entries[i].running).collect();
        ranked.sort_by(|&a, &b| {
            entries[a].cumulative_time.total_cmp(&entries[b].cumulative_time)
        });
        overtake_sweep(
            &mut entries,
            &mut ranked,
            track.overtake_coefficient,
            config.pass_time_delta,
            &mut rng,
        );
    }

    let mut finishers: Vec<&RunningEntry<'_>> =
        entries.iter().filter(|e| e.running).collect();
    finishers.sort_by(|a, b| a.cumulative_time.total_cmp(&b.cumulative_time));

    let mut retirees: Vec<&RunningEntry<'_>> =
        entries.iter().filter(|e| !e.running).collect();
    retirees.sort_by_key(|e| e.retired_seq);

    let classification: Vec<String> = finishers
        .iter()
        .chain(retirees.iter())
        .map(|e| e.driver.name.clone())
        .collect();
    let dnfs: Vec<String> = retirees.iter().map(|e| e.driver.name.clone()).collect();
    let lap_times: BTreeMap<String, Vec<f64>> = entries
        .iter()
        .map(|e| (e.driver.name.clone(), e.lap_times.clone()))
        .collect();

    debug!(
        winner = classification.first().map(String::as_str).unwrap_or(""),
        dnfs = dnfs.len(),
        "race replication finished"
    );

    Ok(RaceResult { classification, dnfs, lap_times })
}

/// Advance one running entry through one lap.
///
/// Order matters and is part of the model: harvest, deploy, lap time,
/// hazard, tyre age, pit stop. The tyre age increment comes after the
/// hazard roll so the retirement lap still counts as attempted.
fn run_entry_lap<R: Rng + ?Sized>(
    entry: &mut RunningEntry<'_>,
    track: &Track,
    lap: u32,
    config: &RaceConfig,
    retired_count: &mut u32,
    rng: &mut R,
) -> Result<()> {
    let harvest_request = track.energy_harvest_factor * entry.strategy.harvest_level;
    entry.energy.harvest(harvest_request)?;
    let actual_deploy = entry.energy.deploy(entry.strategy.deploy_level)?;

    // The kernel is called with zero tyre age so the compound's wear rate
    // can scale the degradation term here
    let compound = entry.tyre.compound().clone();
    let base_degradation =
        f64::from(entry.tyre.age()) * track.tyre_degradation_factor * entry.car.tyre_wear_rate;
    let mut time = noisy_lap_time(
        track,
        entry.car,
        0.0,
        actual_deploy,
        Some(entry.driver),
        config.noise_std,
        rng,
    )?;
    time += base_degradation * compound.degradation_rate;
    time += compound.base_pace_delta;

    entry.last_lap_time = time;
    entry.cumulative_time += time;
    entry.lap_times.push(time);

    // Hazard is rolled per driver, independently, even when two drivers
    // share one car
    let hazard = 1.0 - (-(1.0 - entry.car.reliability)).exp();
    if rng.random::<f64>() < hazard {
        entry.running = false;
        entry.retired_seq = Some(*retired_count);
        *retired_count += 1;
        trace!(driver = %entry.driver.name, lap, "retirement");
    }

    entry.tyre.increment_age();

    if entry.strategy.pit_laps.contains(&lap) {
        entry.cumulative_time += config.pit_loss;
        entry.stint_index += 1;
        let next = entry.strategy.compound_sequence.get(entry.stint_index).cloned();
        entry.tyre.refit(next);
    }

    Ok(())
}
