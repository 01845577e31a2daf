//! Per-driver bookkeeping for one race replication.

use crate::error::{Result, SimulationError};
use crate::state::{EnergyState, TyreState};
use crate::types::{Car, Driver, Strategy};

/// Mutable per-driver state, alive only for the duration of one race.
///
/// Owns the driver's battery and tyres exclusively; destroyed when the
/// race result is produced.
#[derive(Debug)]
pub(crate) struct RunningEntry<'race> {
    pub driver: &'race Driver,
    pub car: &'race Car,
    pub strategy: Strategy,
    pub energy: EnergyState,
    pub tyre: TyreState,
    pub cumulative_time: f64,
    pub last_lap_time: f64,
    pub lap_times: Vec<f64>,
    pub running: bool,
    /// Sequence number of this entry's retirement, used to order DNFs in
    /// the final classification.
    pub retired_seq: Option<u32>,
    /// Index into `strategy.compound_sequence` of the current stint.
    pub stint_index: usize,
}

impl<'race> RunningEntry<'race> {
    pub fn new(
        driver: &'race Driver,
        car: &'race Car,
        strategy: Strategy,
        max_charge: f64,
    ) -> Result<Self> {
        let starting_compound = strategy.compound_sequence.first().cloned().ok_or_else(|| {
            SimulationError::validation("Strategy", "compound_sequence must not be empty")
        })?;
        Ok(Self {
            driver,
            car,
            energy: EnergyState::new(max_charge)?,
            tyre: TyreState::new(car.tyre_wear_rate, starting_compound)?,
            strategy,
            cumulative_time: 0.0,
            last_lap_time: 0.0,
            lap_times: Vec::new(),
            running: true,
            retired_seq: None,
            stint_index: 0,
        })
    }
}
