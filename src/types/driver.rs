//! Driver description layered on top of the shared team car.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Immutable description of a driver.
///
/// Two drivers share one car; the individual contribution is an additive
/// skill offset on the deterministic lap time plus a multiplier on the
/// Gaussian noise standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Unique driver name; the key every result table is reported under.
    pub name: String,
    /// Constructor team the driver belongs to.
    pub team_name: String,
    /// Additive lap-time offset in seconds. Negative is faster than the car
    /// baseline.
    pub skill_offset: f64,
    /// Multiplier on the noise standard deviation. 1.0 is baseline; below
    /// 1.0 is more consistent.
    pub consistency: f64,
}

impl Driver {
    /// Build a validated driver.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Validation`] when either name is empty or
    /// `consistency` is not strictly positive.
    pub fn new(
        name: impl Into<String>,
        team_name: impl Into<String>,
        skill_offset: f64,
        consistency: f64,
    ) -> Result<Self> {
        let name = name.into();
        let team_name = team_name.into();
        if name.is_empty() {
            return Err(SimulationError::validation("Driver", "name must not be empty"));
        }
        if team_name.is_empty() {
            return Err(SimulationError::validation("Driver", "team_name must not be empty"));
        }
        if consistency <= 0.0 {
            return Err(SimulationError::validation(
                "Driver",
                format!("consistency must be > 0.0, got {consistency}"),
            ));
        }
        Ok(Self { name, team_name, skill_offset, consistency })
    }
}
