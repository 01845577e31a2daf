//! Championship sensitivity and volatility analytics.
//!
//! Elasticity is estimated by central difference: the season engine runs
//! once with the target parameter nudged up and once nudged down (same
//! seeds, same calendar, same opposition), and the WDC probability delta
//! is divided by the effective parameter width. Central difference is
//! preferred over one-sided at equal cost because its error shrinks with
//! the square of the step.
//!
//! A perturbation that cannot move both ways (a zero step, or a parameter
//! pinned at a range boundary) carries no gradient information, so the
//! elasticity is 0.0 by convention and no simulation is run at all.
//!
//! Volatility is the Shannon entropy of an outcome distribution, ranging
//! from 0 (a certain champion) to `ln(n)` (a perfectly open field of *n*).

use tracing::debug;

use crate::error::{Result, SimulationError};
use crate::race::RaceConfig;
use crate::season::simulate_season_monte_carlo;
use crate::types::{Car, Team, Track};

/// Scalar car parameter a sensitivity run can perturb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarParameter {
    /// Mechanical reliability (drives the per-lap retirement hazard).
    Reliability,
    /// ERS efficiency (drives the deployment gain in the lap-time kernel).
    ErsEfficiency,
}

impl CarParameter {
    /// Read the parameter's current value from a car.
    pub fn value(self, car: &Car) -> f64 {
        match self {
            CarParameter::Reliability => car.reliability,
            CarParameter::ErsEfficiency => car.ers_efficiency,
        }
    }

    /// Build a new car with the parameter set to `value`.
    pub fn applied(self, car: &Car, value: f64) -> Result<Car> {
        match self {
            CarParameter::Reliability => car.with_reliability(value),
            CarParameter::ErsEfficiency => car.with_ers_efficiency(value),
        }
    }
}

/// Central-difference elasticity of a driver's WDC probability with
/// respect to one scalar parameter of their team's car.
///
/// The perturbed values are clamped to the parameter's valid range
/// [0, 1]. When the perturbation collapses on either side (a zero `delta`,
/// or the parameter pinned at a boundary), the elasticity is 0.0 by
/// convention and the season engine is never invoked; that check comes
/// first, so a collapsed call does no simulation work whatsoever.
///
/// Both season runs share `base_seed`, the calendar and the opposition, so
/// the difference isolates the parameter change.
///
/// # Errors
///
/// Returns [`SimulationError::UnknownEntrant`] when `driver_name` does not
/// drive for `target_team`, or [`SimulationError::Parameter`] when `delta`
/// is negative or the season arguments are invalid.
#[allow(clippy::too_many_arguments)]
pub fn championship_sensitivity(
    calendar: &[Track],
    target_team: &Team,
    other_teams: &[Team],
    driver_name: &str,
    parameter: CarParameter,
    laps_per_race: u32,
    seasons: usize,
    delta: f64,
    base_seed: u64,
    config: &RaceConfig,
) -> Result<f64> {
    if !delta.is_finite() || delta < 0.0 {
        return Err(SimulationError::parameter(
            "delta",
            format!("must be finite and >= 0.0, got {delta}"),
        ));
    }
    if !target_team.drivers.iter().any(|d| d.name == driver_name) {
        return Err(SimulationError::unknown_entrant(driver_name));
    }

    let value = parameter.value(&target_team.car);
    let value_plus = (value + delta).min(1.0);
    let value_minus = (value - delta).max(0.0);

    // Central difference needs movement on both sides; a collapsed side
    // means no gradient information and no simulation
    if value_plus == value || value_minus == value {
        debug!(?parameter, value, delta, "perturbation collapsed, elasticity is 0");
        return Ok(0.0);
    }

    let wdc_plus = perturbed_wdc_probability(
        calendar, target_team, other_teams, driver_name, parameter, value_plus,
        laps_per_race, seasons, base_seed, config,
    )?;
    let wdc_minus = perturbed_wdc_probability(
        calendar, target_team, other_teams, driver_name, parameter, value_minus,
        laps_per_race, seasons, base_seed, config,
    )?;

    Ok((wdc_plus - wdc_minus) / (value_plus - value_minus))
}

/// WDC probability of `driver_name` with the target car's parameter set to
/// `value`, everything else unchanged.
#[allow(clippy::too_many_arguments)]
fn perturbed_wdc_probability(
    calendar: &[Track],
    target_team: &Team,
    other_teams: &[Team],
    driver_name: &str,
    parameter: CarParameter,
    value: f64,
    laps_per_race: u32,
    seasons: usize,
    base_seed: u64,
    config: &RaceConfig,
) -> Result<f64> {
    let perturbed_car = parameter.applied(&target_team.car, value)?;
    let mut field = Vec::with_capacity(other_teams.len() + 1);
    field.push(target_team.with_car(perturbed_car)?);
    field.extend_from_slice(other_teams);

    let stats = simulate_season_monte_carlo(
        calendar,
        &field,
        laps_per_race,
        seasons,
        base_seed,
        config,
    )?;
    Ok(stats
        .drivers
        .get(driver_name)
        .map(|entry| entry.title_probability)
        .unwrap_or(0.0))
}

/// Shannon entropy of a championship probability distribution, in nats.
///
/// Zero-probability entries contribute nothing (`0 * ln 0 = 0` by
/// convention). A one-hot distribution scores 0.0; a uniform distribution
/// over *n* entrants scores `ln(n)`.
pub fn championship_entropy<I>(probabilities: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    probabilities
        .into_iter()
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.ln())
        .sum()
}
