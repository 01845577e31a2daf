//! ERS battery state.

use crate::error::{Result, SimulationError};

/// Default battery capacity in MJ.
pub const DEFAULT_MAX_CHARGE: f64 = 4.0;

/// Bounded ERS battery charge over one race.
///
/// Harvest and deploy are the only mutations and both are clamped by the
/// physical limits, so the charge invariant `0 <= charge <= max_charge`
/// holds after any call sequence. Both return the *actual* amount moved;
/// the lap-time kernel must consume that value, not the request, which is
/// what couples battery depletion back into lap time.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyState {
    charge: f64,
    max_charge: f64,
}

impl EnergyState {
    /// Create a full battery with the given capacity.
    pub fn new(max_charge: f64) -> Result<Self> {
        Self::with_charge(max_charge, max_charge)
    }

    /// Create a battery with an explicit starting charge.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Validation`] when the capacity is not
    /// positive or the starting charge leaves `[0, max_charge]`.
    pub fn with_charge(max_charge: f64, charge: f64) -> Result<Self> {
        if max_charge <= 0.0 {
            return Err(SimulationError::validation(
                "EnergyState",
                format!("max_charge must be > 0.0, got {max_charge}"),
            ));
        }
        if charge < 0.0 || charge > max_charge {
            return Err(SimulationError::validation(
                "EnergyState",
                format!("charge must be within [0.0, {max_charge}], got {charge}"),
            ));
        }
        Ok(Self { charge, max_charge })
    }

    /// Current charge in MJ.
    pub fn charge(&self) -> f64 {
        self.charge
    }

    /// Battery capacity in MJ.
    pub fn max_charge(&self) -> f64 {
        self.max_charge
    }

    /// Harvest energy into the battery, bounded by the remaining headroom.
    ///
    /// Returns the actual amount harvested.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Validation`] for a negative request.
    pub fn harvest(&mut self, requested: f64) -> Result<f64> {
        if requested < 0.0 {
            return Err(SimulationError::validation(
                "EnergyState",
                format!("harvest amount must be >= 0.0, got {requested}"),
            ));
        }
        let actual = requested.min(self.max_charge - self.charge);
        self.charge += actual;
        Ok(actual)
    }

    /// Deploy energy from the battery, bounded by the available charge.
    ///
    /// Returns the actual amount deployed.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Validation`] for a negative request.
    pub fn deploy(&mut self, requested: f64) -> Result<f64> {
        if requested < 0.0 {
            return Err(SimulationError::validation(
                "EnergyState",
                format!("deploy amount must be >= 0.0, got {requested}"),
            ));
        }
        let actual = requested.min(self.charge);
        self.charge -= actual;
        Ok(actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn charge_stays_in_bounds_over_any_call_sequence(
                ops in prop::collection::vec((any::<bool>(), 0.0f64..10.0f64), 0..100)
            ) {
                // Property: no harvest/deploy sequence can drive the charge
                // outside [0, max_charge], and the returned actual amounts
                // never exceed what was physically available
                let mut energy = EnergyState::new(DEFAULT_MAX_CHARGE).unwrap();
                for (is_harvest, amount) in ops {
                    let before = energy.charge();
                    if is_harvest {
                        let actual = energy.harvest(amount).unwrap();
                        prop_assert!(actual <= DEFAULT_MAX_CHARGE - before + 1e-12);
                        prop_assert!(actual <= amount);
                    } else {
                        let actual = energy.deploy(amount).unwrap();
                        prop_assert!(actual <= before);
                        prop_assert!(actual <= amount);
                    }
                    prop_assert!(energy.charge() >= 0.0);
                    prop_assert!(energy.charge() <= energy.max_charge());
                }
            }
        }
    }

    #[test]
    fn battery_starts_full_by_default() {
        let energy = EnergyState::new(4.0).unwrap();
        assert_eq!(energy.charge(), 4.0);
        assert_eq!(energy.max_charge(), 4.0);
    }

    #[test]
    fn deploy_is_bounded_by_charge() {
        let mut energy = EnergyState::with_charge(4.0, 1.5).unwrap();
        let actual = energy.deploy(2.0).unwrap();
        assert_eq!(actual, 1.5);
        assert_eq!(energy.charge(), 0.0);
    }

    #[test]
    fn harvest_is_bounded_by_headroom() {
        let mut energy = EnergyState::with_charge(4.0, 3.5).unwrap();
        let actual = energy.harvest(2.0).unwrap();
        assert_eq!(actual, 0.5);
        assert_eq!(energy.charge(), 4.0);
    }

    #[test]
    fn negative_requests_rejected() {
        let mut energy = EnergyState::new(4.0).unwrap();
        assert!(energy.harvest(-0.1).is_err());
        assert!(energy.deploy(-0.1).is_err());
    }

    #[test]
    fn invalid_construction_rejected() {
        assert!(EnergyState::new(0.0).is_err());
        assert!(EnergyState::with_charge(4.0, -0.1).is_err());
        assert!(EnergyState::with_charge(4.0, 4.1).is_err());
    }
}
