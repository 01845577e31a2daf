//! Core value objects consumed by the simulation engine.
//!
//! Everything in this module is an immutable, constructor-validated value:
//! a [`Track`], [`Car`], [`Driver`], [`Team`] or [`Strategy`] that fails
//! validation never exists, so the race and season engines can assume every
//! invariant holds and never re-check inputs mid-replication. Perturbations
//! (see [`crate::sensitivity`]) construct fresh values instead of mutating.

mod car;
mod driver;
mod points;
mod strategy;
mod team;
mod track;

pub use car::Car;
pub use driver::Driver;
pub use points::{POINTS_TABLE, points_for_position};
pub use strategy::Strategy;
pub use team::Team;
pub use track::Track;
