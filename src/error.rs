//! Error types for the simulation engine.
//!
//! All failures surface before any stochastic work begins: value objects
//! reject malformed parameters at construction, and the race/season entry
//! points reject invalid replication parameters before the first seed is
//! derived. Once a replication starts it is a pure function of its inputs
//! and seed and cannot fail mid-run.
//!
//! ## Error Categories
//!
//! - **Validation Errors**: out-of-range coefficients, mismatched
//!   team/driver pairing, malformed strategies; raised at construction
//! - **Parameter Errors**: zero/negative lap counts, empty entrant lists,
//!   non-positive replication counts; raised before any replication
//! - **Lookup Errors**: a named entrant does not exist in the field
//!
//! Numeric edge cases (zero-probability entropy terms, a collapsed
//! sensitivity delta) are handled by explicit convention and are *not*
//! errors; see [`crate::sensitivity`].

use thiserror::Error;

/// Result type alias for simulation operations.
pub type Result<T, E = SimulationError> = std::result::Result<T, E>;

/// Main error type for simulation operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SimulationError {
    #[error("{entity} validation failed: {reason}")]
    Validation { entity: &'static str, reason: String },

    #[error("invalid simulation parameter '{parameter}': {reason}")]
    Parameter { parameter: &'static str, reason: String },

    #[error("unknown entrant '{name}'")]
    UnknownEntrant { name: String },
}

impl SimulationError {
    /// Helper constructor for construction-time validation failures.
    pub fn validation(entity: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::Validation { entity, reason: reason.into() }
    }

    /// Helper constructor for pre-replication parameter failures.
    pub fn parameter(parameter: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::Parameter { parameter, reason: reason.into() }
    }

    /// Helper constructor for entrant lookup failures.
    pub fn unknown_entrant(name: impl Into<String>) -> Self {
        SimulationError::UnknownEntrant { name: name.into() }
    }

    /// Returns whether this error was raised while constructing a value
    /// object (as opposed to rejecting a simulation call).
    pub fn is_validation(&self) -> bool {
        matches!(self, SimulationError::Validation { .. })
    }
}
