//! Tyre compound descriptions and per-race tyre wear state.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Immutable description of a tyre compound.
///
/// The pace delta is additive on lap time (negative is faster); the
/// degradation rate multiplies the track/car degradation term, with 1.0 as
/// the medium baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TyreCompound {
    /// Compound label, e.g. "SOFT".
    pub name: String,
    /// Additive lap-time offset in seconds; negative is faster.
    pub base_pace_delta: f64,
    /// Multiplier on the track/car degradation term; 1.0 is the medium
    /// baseline.
    pub degradation_rate: f64,
}

impl TyreCompound {
    /// Build a validated compound.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Validation`] when the name is empty or the
    /// degradation rate is negative.
    pub fn new(
        name: impl Into<String>,
        base_pace_delta: f64,
        degradation_rate: f64,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SimulationError::validation("TyreCompound", "name must not be empty"));
        }
        if degradation_rate < 0.0 {
            return Err(SimulationError::validation(
                "TyreCompound",
                format!("degradation_rate must be >= 0.0, got {degradation_rate}"),
            ));
        }
        Ok(Self { name, base_pace_delta, degradation_rate })
    }

    /// The soft compound: fastest, wears quickest.
    pub fn soft() -> Self {
        Self { name: "SOFT".to_string(), base_pace_delta: -0.6, degradation_rate: 1.5 }
    }

    /// The medium compound: the degradation baseline.
    pub fn medium() -> Self {
        Self { name: "MEDIUM".to_string(), base_pace_delta: -0.3, degradation_rate: 1.0 }
    }

    /// The hard compound: slowest, most durable.
    pub fn hard() -> Self {
        Self { name: "HARD".to_string(), base_pace_delta: 0.0, degradation_rate: 0.7 }
    }
}

/// Tyre wear over a race, owned by one driver's per-race context.
///
/// Age counts laps *attempted* on the current set: it advances by exactly
/// one after every lap a driver starts, including the lap on which the
/// driver retires, and only [`TyreState::refit`] (a pit stop) resets it.
#[derive(Debug, Clone, PartialEq)]
pub struct TyreState {
    age: u32,
    wear_rate_multiplier: f64,
    compound: TyreCompound,
}

impl TyreState {
    /// Create a fresh set of tyres.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Validation`] for a negative wear
    /// multiplier.
    pub fn new(wear_rate_multiplier: f64, compound: TyreCompound) -> Result<Self> {
        if wear_rate_multiplier < 0.0 {
            return Err(SimulationError::validation(
                "TyreState",
                format!("wear_rate_multiplier must be >= 0.0, got {wear_rate_multiplier}"),
            ));
        }
        Ok(Self { age: 0, wear_rate_multiplier, compound })
    }

    /// Laps attempted on the current set.
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Car-specific wear multiplier copied at race start.
    pub fn wear_rate_multiplier(&self) -> f64 {
        self.wear_rate_multiplier
    }

    /// Compound currently fitted.
    pub fn compound(&self) -> &TyreCompound {
        &self.compound
    }

    /// Advance the age by one lap.
    pub fn increment_age(&mut self) {
        self.age += 1;
    }

    /// Pit stop: reset the age to zero, optionally fitting a new compound.
    pub fn refit(&mut self, compound: Option<TyreCompound>) {
        self.age = 0;
        if let Some(compound) = compound {
            self.compound = compound;
        }
    }
}
