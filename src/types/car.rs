//! Constructor car description, including the perturbation helpers used by
//! sensitivity analysis.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Immutable description of a car, shared by both of a team's drivers.
///
/// A `Car` never changes after construction. Sensitivity analysis perturbs a
/// parameter by building a fresh value via [`Car::with_reliability`] or
/// [`Car::with_ers_efficiency`]; the original stays untouched and remains
/// valid for every other concurrent replication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    /// Constructor team name; must match the owning [`Team`](crate::Team).
    pub team_name: String,
    /// Baseline lap time in seconds (lower is faster).
    pub base_speed: f64,
    /// Effectiveness of energy recovery and deployment (0.0-1.0).
    pub ers_efficiency: f64,
    /// Aerodynamic efficiency coefficient (0.0-1.0).
    pub aero_efficiency: f64,
    /// Car-specific tyre degradation multiplier (>= 0.0).
    pub tyre_wear_rate: f64,
    /// Mechanical reliability factor (0.0-1.0); 1.0 means the car never
    /// retires.
    pub reliability: f64,
}

impl Car {
    /// Build a validated car.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Validation`] when the team name is empty,
    /// `base_speed` is not positive, a ratio coefficient leaves [0, 1], or
    /// `tyre_wear_rate` is negative.
    pub fn new(
        team_name: impl Into<String>,
        base_speed: f64,
        ers_efficiency: f64,
        aero_efficiency: f64,
        tyre_wear_rate: f64,
        reliability: f64,
    ) -> Result<Self> {
        let team_name = team_name.into();
        if team_name.is_empty() {
            return Err(SimulationError::validation("Car", "team_name must not be empty"));
        }
        if base_speed <= 0.0 {
            return Err(SimulationError::validation(
                "Car",
                format!("base_speed must be > 0.0, got {base_speed}"),
            ));
        }
        for (field, value) in [
            ("ers_efficiency", ers_efficiency),
            ("aero_efficiency", aero_efficiency),
            ("reliability", reliability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimulationError::validation(
                    "Car",
                    format!("{field} must be between 0.0 and 1.0, got {value}"),
                ));
            }
        }
        if tyre_wear_rate < 0.0 {
            return Err(SimulationError::validation(
                "Car",
                format!("tyre_wear_rate must be >= 0.0, got {tyre_wear_rate}"),
            ));
        }
        Ok(Self { team_name, base_speed, ers_efficiency, aero_efficiency, tyre_wear_rate, reliability })
    }

    /// Return a new car identical to this one except for `reliability`.
    pub fn with_reliability(&self, reliability: f64) -> Result<Self> {
        Self::new(
            self.team_name.clone(),
            self.base_speed,
            self.ers_efficiency,
            self.aero_efficiency,
            self.tyre_wear_rate,
            reliability,
        )
    }

    /// Return a new car identical to this one except for `ers_efficiency`.
    pub fn with_ers_efficiency(&self, ers_efficiency: f64) -> Result<Self> {
        Self::new(
            self.team_name.clone(),
            self.base_speed,
            ers_efficiency,
            self.aero_efficiency,
            self.tyre_wear_rate,
            self.reliability,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Car {
        Car::new("Test Team", 80.0, 0.80, 0.85, 1.0, 0.98).unwrap()
    }

    #[test]
    fn valid_car_constructs() {
        let car = sample();
        assert_eq!(car.team_name, "Test Team");
        assert_eq!(car.reliability, 0.98);
    }

    #[test]
    fn out_of_range_parameters_rejected() {
        assert!(Car::new("T", 0.0, 0.8, 0.85, 1.0, 0.98).is_err());
        assert!(Car::new("T", 80.0, 1.1, 0.85, 1.0, 0.98).is_err());
        assert!(Car::new("T", 80.0, 0.8, -0.1, 1.0, 0.98).is_err());
        assert!(Car::new("T", 80.0, 0.8, 0.85, -1.0, 0.98).is_err());
        assert!(Car::new("T", 80.0, 0.8, 0.85, 1.0, 1.5).is_err());
        assert!(Car::new("", 80.0, 0.8, 0.85, 1.0, 0.98).is_err());
    }

    #[test]
    fn perturbation_produces_a_new_value() {
        let car = sample();
        let perturbed = car.with_reliability(0.5).unwrap();
        assert_eq!(car.reliability, 0.98);
        assert_eq!(perturbed.reliability, 0.5);
        assert_eq!(perturbed.base_speed, car.base_speed);

        let perturbed = car.with_ers_efficiency(0.9).unwrap();
        assert_eq!(car.ers_efficiency, 0.80);
        assert_eq!(perturbed.ers_efficiency, 0.9);
    }

    #[test]
    fn perturbation_revalidates() {
        let car = sample();
        assert!(car.with_reliability(1.2).is_err());
        assert!(car.with_ers_efficiency(-0.1).is_err());
    }
}
