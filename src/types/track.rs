//! Circuit description consumed by the lap-time kernel and race engine.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Immutable description of a circuit.
///
/// All coefficients are dimensionless scalars calibrated externally; the
/// engine treats a `Track` as opaque read-only input shared across every
/// replication. Construction validates ranges once so simulation code never
/// has to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Circuit name, used only for labelling results.
    pub name: String,
    /// Proportion of the lap spent on straights (0.0-1.0).
    pub straight_ratio: f64,
    /// Relative ease of overtaking at this circuit (0.0-1.0).
    pub overtake_coefficient: f64,
    /// ERS energy recovery potential per lap (0.0-1.0).
    pub energy_harvest_factor: f64,
    /// Circuit-specific tyre wear multiplier (>= 0.0).
    pub tyre_degradation_factor: f64,
    /// How strongly downforce deficits cost lap time here (>= 0.0).
    pub downforce_sensitivity: f64,
}

impl Track {
    /// Build a validated track.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Validation`] when the name is empty, any
    /// of the three ratio coefficients leaves [0, 1], or a multiplier is
    /// negative.
    pub fn new(
        name: impl Into<String>,
        straight_ratio: f64,
        overtake_coefficient: f64,
        energy_harvest_factor: f64,
        tyre_degradation_factor: f64,
        downforce_sensitivity: f64,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SimulationError::validation("Track", "name must not be empty"));
        }
        for (field, value) in [
            ("straight_ratio", straight_ratio),
            ("overtake_coefficient", overtake_coefficient),
            ("energy_harvest_factor", energy_harvest_factor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimulationError::validation(
                    "Track",
                    format!("{field} must be between 0.0 and 1.0, got {value}"),
                ));
            }
        }
        if tyre_degradation_factor < 0.0 {
            return Err(SimulationError::validation(
                "Track",
                format!("tyre_degradation_factor must be >= 0.0, got {tyre_degradation_factor}"),
            ));
        }
        if downforce_sensitivity < 0.0 {
            return Err(SimulationError::validation(
                "Track",
                format!("downforce_sensitivity must be >= 0.0, got {downforce_sensitivity}"),
            ));
        }
        Ok(Self {
            name,
            straight_ratio,
            overtake_coefficient,
            energy_harvest_factor,
            tyre_degradation_factor,
            downforce_sensitivity,
        })
    }
}
