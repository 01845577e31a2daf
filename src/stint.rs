//! Deterministic stint simulation and strategy search.
//!
//! A stint run has no stochastic elements at all: it exercises the
//! harvest/deploy feedback loop and tyre ageing against the lap-time
//! kernel, which makes it cheap enough to grid-search deployment levels and
//! pit schedules. The race engine uses [`find_best_constant_deploy`] to
//! pick default strategies for drivers that were not given one.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::physics::lap_time;
use crate::state::{DEFAULT_MAX_CHARGE, EnergyState, TyreCompound, TyreState};
use crate::types::{Car, Strategy, Track};

/// Deploy levels tried by [`find_best_constant_deploy`].
const DEPLOY_GRID: [f64; 5] = [0.0, 0.2, 0.4, 0.6, 0.8];

/// Telemetry traces from a deterministic stint run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StintResult {
    /// Sum of all lap times in seconds.
    pub total_time: f64,
    /// Per-lap times in seconds.
    pub lap_times: Vec<f64>,
    /// Battery charge after each lap.
    pub energy_trace: Vec<f64>,
    /// Tyre age after each lap.
    pub tyre_trace: Vec<u32>,
}

/// Outcome of a strategy grid search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySearch {
    /// The fastest strategy found.
    pub strategy: Strategy,
    /// Estimated total time for that strategy in seconds.
    pub total_time: f64,
}

/// Simulate a deterministic stint on a full battery of default capacity.
pub fn simulate_stint(
    track: &Track,
    car: &Car,
    strategy: &Strategy,
    laps: u32,
) -> Result<StintResult> {
    simulate_stint_from(track, car, strategy, laps, EnergyState::new(DEFAULT_MAX_CHARGE)?)
}

/// Simulate a deterministic stint starting from an explicit battery state.
///
/// Per lap: harvest (track factor times strategy level), deploy (bounded by
/// the battery), lap time from the kernel with the *actual* deployed
/// amount, tyre age increment.
///
/// # Errors
///
/// Returns [`SimulationError::Parameter`] when `laps` is zero.
pub fn simulate_stint_from(
    track: &Track,
    car: &Car,
    strategy: &Strategy,
    laps: u32,
    mut energy: EnergyState,
) -> Result<StintResult> {
    if laps == 0 {
        return Err(SimulationError::parameter("laps", "must be >= 1"));
    }

    let starting_compound = strategy.compound_sequence.first().cloned().ok_or_else(|| {
        SimulationError::validation("Strategy", "compound_sequence must not be empty")
    })?;
    let mut tyre = TyreState::new(car.tyre_wear_rate, starting_compound)?;
    let mut lap_times = Vec::with_capacity(laps as usize);
    let mut energy_trace = Vec::with_capacity(laps as usize);
    let mut tyre_trace = Vec::with_capacity(laps as usize);

    for _ in 0..laps {
        let harvest_request = track.energy_harvest_factor * strategy.harvest_level;
        energy.harvest(harvest_request)?;
        let actual_deploy = energy.deploy(strategy.deploy_level)?;

        let time = lap_time(track, car, f64::from(tyre.age()), actual_deploy)?;
        lap_times.push(time);

        tyre.increment_age();
        energy_trace.push(energy.charge());
        tyre_trace.push(tyre.age());
    }

    Ok(StintResult {
        total_time: lap_times.iter().sum(),
        lap_times,
        energy_trace,
        tyre_trace,
    })
}

/// Grid-search fixed deploy levels and return the fastest stint strategy.
///
/// Harvest is held at 1.0 for every candidate; ties go to the lower deploy
/// level (first in the grid).
pub fn find_best_constant_deploy(track: &Track, car: &Car, laps: u32) -> Result<StrategySearch> {
    let mut best: Option<StrategySearch> = None;
    for deploy_level in DEPLOY_GRID {
        let strategy = Strategy::new(deploy_level, 1.0)?;
        let result = simulate_stint(track, car, &strategy, laps)?;
        let better = best.as_ref().is_none_or(|b| result.total_time < b.total_time);
        if better {
            best = Some(StrategySearch { strategy, total_time: result.total_time });
        }
    }
    // The grid is non-empty, so a best candidate always exists
    best.ok_or_else(|| SimulationError::parameter("deploy_grid", "search produced no candidate"))
}

/// Total time for a single-compound stint, compound-scaled degradation and
/// pace delta included.
fn compound_stint_time(
    track: &Track,
    car: &Car,
    laps: u32,
    compound: &TyreCompound,
    deploy_level: f64,
    harvest_level: f64,
) -> Result<f64> {
    let mut energy = EnergyState::new(DEFAULT_MAX_CHARGE)?;
    let mut tyre = TyreState::new(car.tyre_wear_rate, compound.clone())?;
    let mut total = 0.0;
    for _ in 0..laps {
        let harvest_request = track.energy_harvest_factor * harvest_level;
        energy.harvest(harvest_request)?;
        let actual_deploy = energy.deploy(deploy_level)?;

        // Kernel with zero age; the compound scales the degradation term
        let mut time = lap_time(track, car, 0.0, actual_deploy)?;
        let base_degradation =
            f64::from(tyre.age()) * track.tyre_degradation_factor * car.tyre_wear_rate;
        time += base_degradation * compound.degradation_rate;
        time += compound.base_pace_delta;
        total += time;
        tyre.increment_age();
    }
    Ok(total)
}

/// Search a limited grid of 1-stop and 2-stop pit strategies.
///
/// 1-stop candidates pit within five laps either side of half distance;
/// 2-stop candidates within five laps either side of each third. Every
/// SOFT/MEDIUM/HARD assignment per stint is evaluated with the deploy level
/// chosen by [`find_best_constant_deploy`].
///
/// # Errors
///
/// Returns [`SimulationError::Parameter`] when `total_laps` is too short to
/// fit any candidate schedule (fewer than 3 laps), or when `pit_loss` is
/// negative.
pub fn find_best_pit_strategy(
    track: &Track,
    car: &Car,
    total_laps: u32,
    pit_loss: f64,
) -> Result<StrategySearch> {
    if pit_loss < 0.0 {
        return Err(SimulationError::parameter(
            "pit_loss",
            format!("must be >= 0.0, got {pit_loss}"),
        ));
    }
    if total_laps < 3 {
        return Err(SimulationError::parameter(
            "total_laps",
            "must be >= 3 to fit a pit stop",
        ));
    }

    let constant = find_best_constant_deploy(track, car, total_laps)?;
    let deploy = constant.strategy.deploy_level;
    let harvest = constant.strategy.harvest_level;

    let compounds = [TyreCompound::soft(), TyreCompound::medium(), TyreCompound::hard()];
    let mut best: Option<StrategySearch> = None;

    let mut consider = |strategy: Strategy, total_time: f64, best: &mut Option<StrategySearch>| {
        let better = best.as_ref().is_none_or(|b| total_time < b.total_time);
        if better {
            *best = Some(StrategySearch { strategy, total_time });
        }
    };

    // 1-stop candidates around half distance
    let pit1_center = (total_laps / 2).clamp(2, total_laps.saturating_sub(1));
    for offset in -5i64..=5 {
        let pit_lap = pit1_center as i64 + offset;
        if pit_lap < 2 || pit_lap >= i64::from(total_laps) {
            continue;
        }
        let pit_lap = pit_lap as u32;
        let stint1_laps = pit_lap;
        let stint2_laps = total_laps - pit_lap;
        for first in &compounds {
            let t1 = compound_stint_time(track, car, stint1_laps, first, deploy, harvest)?;
            for second in &compounds {
                let t2 =
                    compound_stint_time(track, car, stint2_laps, second, deploy, harvest)?;
                let total = t1 + pit_loss + t2;
                let strategy = Strategy::with_pit_schedule(
                    deploy,
                    harvest,
                    vec![first.clone(), second.clone()],
                    vec![pit_lap],
                )?;
                consider(strategy, total, &mut best);
            }
        }
    }

    // 2-stop candidates around the thirds
    let p1_center = (total_laps / 3).max(2);
    let p2_center = (2 * total_laps / 3).max(p1_center + 1);
    for offset1 in -5i64..=5 {
        for offset2 in -5i64..=5 {
            let p1 = p1_center as i64 + offset1;
            let p2 = p2_center as i64 + offset2;
            if p1 < 2 || p2 <= p1 || p2 >= i64::from(total_laps) {
                continue;
            }
            let (p1, p2) = (p1 as u32, p2 as u32);
            let stint_laps = [p1, p2 - p1, total_laps - p2];
            for first in &compounds {
                let t1 =
                    compound_stint_time(track, car, stint_laps[0], first, deploy, harvest)?;
                for second in &compounds {
                    let t2 = compound_stint_time(
                        track, car, stint_laps[1], second, deploy, harvest,
                    )?;
                    for third in &compounds {
                        let t3 = compound_stint_time(
                            track, car, stint_laps[2], third, deploy, harvest,
                        )?;
                        let total = t1 + pit_loss + t2 + pit_loss + t3;
                        let strategy = Strategy::with_pit_schedule(
                            deploy,
                            harvest,
                            vec![first.clone(), second.clone(), third.clone()],
                            vec![p1, p2],
                        )?;
                        consider(strategy, total, &mut best);
                    }
                }
            }
        }
    }

    best.ok_or_else(|| {
        SimulationError::parameter("total_laps", "no candidate pit schedule fits this distance")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track() -> Track {
        Track::new("Test Circuit", 0.6, 0.5, 0.7, 0.05, 0.50).unwrap()
    }

    fn sample_car() -> Car {
        Car::new("Test Team", 80.0, 0.80, 0.85, 1.0, 0.98).unwrap()
    }

    #[test]
    fn stint_traces_have_one_entry_per_lap() {
        let result = simulate_stint(
            &sample_track(),
            &sample_car(),
            &Strategy::new(0.5, 1.0).unwrap(),
            10,
        )
        .unwrap();
        assert_eq!(result.lap_times.len(), 10);
        assert_eq!(result.energy_trace.len(), 10);
        assert_eq!(result.tyre_trace, (1..=10).collect::<Vec<u32>>());
        assert!((result.total_time - result.lap_times.iter().sum::<f64>()).abs() < 1e-9);
    }

    #[test]
    fn battery_depletion_feeds_back_into_lap_times() {
        // Deploy far more than can be harvested: once the battery drains,
        // the actual deployment shrinks and lap times rise
        let track = Track::new("Low Harvest", 0.6, 0.5, 0.1, 0.0, 0.50).unwrap();
        let car = Car::new("Test Team", 80.0, 0.80, 0.85, 0.0, 0.98).unwrap();
        let strategy = Strategy::new(1.0, 1.0).unwrap();
        let result = simulate_stint(&track, &car, &strategy, 10).unwrap();

        // Zero wear rates isolate the ERS effect: later laps are slower
        // than the first full-battery lap
        assert!(result.lap_times[9] > result.lap_times[0]);
        // And the battery trace is pinned at its depleted equilibrium
        assert!(result.energy_trace[9] < 1e-9);
    }

    #[test]
    fn stint_rejects_zero_laps() {
        let err = simulate_stint(
            &sample_track(),
            &sample_car(),
            &Strategy::new(0.5, 1.0).unwrap(),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, SimulationError::Parameter { .. }));
    }

    #[test]
    fn constant_deploy_search_picks_from_the_grid() {
        let search = find_best_constant_deploy(&sample_track(), &sample_car(), 20).unwrap();
        assert!(DEPLOY_GRID.contains(&search.strategy.deploy_level));
        assert_eq!(search.strategy.harvest_level, 1.0);

        // The winner is at least as fast as every other candidate
        for deploy_level in DEPLOY_GRID {
            let strategy = Strategy::new(deploy_level, 1.0).unwrap();
            let result = simulate_stint(&sample_track(), &sample_car(), &strategy, 20).unwrap();
            assert!(search.total_time <= result.total_time + 1e-9);
        }
    }

    #[test]
    fn pit_strategy_search_returns_a_valid_schedule() {
        let search = find_best_pit_strategy(&sample_track(), &sample_car(), 50, 20.0).unwrap();
        let strategy = &search.strategy;

        assert!(!strategy.pit_laps.is_empty());
        assert!(strategy.pit_laps.len() <= 2);
        assert_eq!(strategy.compound_sequence.len(), strategy.pit_laps.len() + 1);
        for &pit_lap in &strategy.pit_laps {
            assert!(pit_lap >= 2 && pit_lap < 50);
        }
        assert!(search.total_time.is_finite());
    }

    #[test]
    fn pit_strategy_search_rejects_sprint_distances() {
        assert!(find_best_pit_strategy(&sample_track(), &sample_car(), 2, 20.0).is_err());
        assert!(find_best_pit_strategy(&sample_track(), &sample_car(), 50, -1.0).is_err());
    }
}
