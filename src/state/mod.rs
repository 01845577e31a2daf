//! Mutable per-driver state machines: ERS battery and tyre wear.
//!
//! Each race replication constructs its own [`EnergyState`] and
//! [`TyreState`] per driver and discards them when the race result is
//! produced; nothing here is shared between replications.

mod energy;
mod tyre;

pub use energy::{DEFAULT_MAX_CHARGE, EnergyState};
pub use tyre::{TyreCompound, TyreState};
