//! Constructor team: one car, exactly two drivers.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::types::{Car, Driver};

/// A constructor team pairing one [`Car`] with exactly two [`Driver`]s.
///
/// The pairing invariant (both drivers carry this team's name) is enforced
/// once at construction; simulation code can assume it holds and never
/// re-checks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Constructor team name.
    pub name: String,
    /// Car shared by both drivers.
    pub car: Car,
    /// Exactly two drivers.
    pub drivers: Vec<Driver>,
}

impl Team {
    /// Build a validated team.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Validation`] when the name is empty, the
    /// driver count is not exactly two, or any driver's `team_name` does not
    /// match `name`. The car's own `team_name` must match as well.
    pub fn new(name: impl Into<String>, car: Car, drivers: Vec<Driver>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SimulationError::validation("Team", "name must not be empty"));
        }
        if drivers.len() != 2 {
            return Err(SimulationError::validation(
                "Team",
                format!("team '{name}' must have exactly 2 drivers, got {}", drivers.len()),
            ));
        }
        if car.team_name != name {
            return Err(SimulationError::validation(
                "Team",
                format!("car team_name '{}' does not match team name '{name}'", car.team_name),
            ));
        }
        for driver in &drivers {
            if driver.team_name != name {
                return Err(SimulationError::validation(
                    "Team",
                    format!(
                        "driver '{}' team_name '{}' does not match team name '{name}'",
                        driver.name, driver.team_name
                    ),
                ));
            }
        }
        Ok(Self { name, car, drivers })
    }

    /// Return a new team with the same name and drivers but a different car.
    ///
    /// Used by sensitivity analysis to field a perturbed car without
    /// touching the original team.
    pub fn with_car(&self, car: Car) -> Result<Self> {
        Self::new(self.name.clone(), car, self.drivers.clone())
    }
}
