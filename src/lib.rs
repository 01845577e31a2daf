//! Stochastic race and championship Monte Carlo simulation engine.
//!
//! Gridsim simulates a hybrid-era racing season end to end: deterministic
//! per-lap physics, stochastic single-race outcomes, and large-scale Monte
//! Carlo aggregation into calibrated championship probabilities.
//!
//! # Features
//!
//! - **Reproducible by construction**: every replication derives its own
//!   random source from an explicit seed; identical arguments give
//!   bit-identical statistics
//! - **Persistent overtakes**: passes transfer real cumulative time, so
//!   position changes stick instead of oscillating
//! - **Two parallel championships**: drivers' and constructors' titles
//!   accumulate from the same season replications
//! - **Sensitivity analytics**: central-difference elasticity of title
//!   probability to car parameters, and Shannon-entropy volatility
//!
//! # Quick Start
//!
//! ```rust
//! use gridsim::{Car, Driver, RaceConfig, Team, Track, simulate_race_monte_carlo};
//!
//! fn main() -> gridsim::Result<()> {
//!     let track = Track::new("Sakhir", 0.6, 0.5, 0.7, 0.05, 0.50)?;
//!
//!     let mut teams = Vec::new();
//!     for (name, base_speed) in [("Aurora", 80.0), ("Borealis", 80.4)] {
//!         let car = Car::new(name, base_speed, 0.80, 0.85, 1.0, 0.97)?;
//!         let drivers = vec![
//!             Driver::new(format!("{name} #1"), name, 0.0, 1.0)?,
//!             Driver::new(format!("{name} #2"), name, 0.05, 1.1)?,
//!         ];
//!         teams.push(Team::new(name, car, drivers)?);
//!     }
//!
//!     let stats =
//!         simulate_race_monte_carlo(&track, &teams, 30, 200, 42, &RaceConfig::default())?;
//!     for (driver, entry) in &stats.entrants {
//!         println!("{driver}: P(win) = {:.3}", entry.winner_probability);
//!     }
//!     Ok(())
//! }
//! ```

// Value objects and error handling
mod error;
pub mod state;
pub mod types;

// Deterministic layer
pub mod physics;
pub mod stint;

// Stochastic race engine
pub mod race;

// Monte Carlo aggregation stack
pub mod monte_carlo;
pub mod season;
pub mod sensitivity;

// Core exports
pub use error::{Result, SimulationError};
pub use state::{DEFAULT_MAX_CHARGE, EnergyState, TyreCompound, TyreState};
pub use types::{Car, Driver, POINTS_TABLE, Strategy, Team, Track, points_for_position};

// Deterministic layer exports
pub use physics::{lap_time, noisy_lap_time};
pub use stint::{
    StintResult, StrategySearch, find_best_constant_deploy, find_best_pit_strategy,
    simulate_stint, simulate_stint_from,
};

// Race engine exports
pub use race::{
    PASS_TIME_DELTA, PIT_LOSS, RaceConfig, RaceResult, simulate_race,
    simulate_race_with_strategies,
};

// Monte Carlo exports
pub use monte_carlo::{EntrantRaceStats, RaceStatistics, simulate_race_monte_carlo};
pub use season::{EntrantSeasonStats, SeasonStatistics, simulate_season_monte_carlo};
pub use sensitivity::{CarParameter, championship_entropy, championship_sensitivity};
