//! ERS deployment strategy and pit-stop schedule.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::state::TyreCompound;

/// Constant ERS deployment/harvest strategy plus an optional pit schedule.
///
/// Both levels are scalar multipliers in [0.0, 1.0]. The compound sequence
/// lists one compound per stint: the first entry is fitted at the start and
/// each later entry is fitted after the corresponding pit stop, so its
/// length is always `pit_laps.len() + 1`. Pit laps are 1-based and strictly
/// ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Fraction of available ERS energy requested for deployment per lap.
    pub deploy_level: f64,
    /// Fraction of maximum harvestable energy recovered per lap.
    pub harvest_level: f64,
    /// Tyre compounds per stint; one more entry than `pit_laps`.
    pub compound_sequence: Vec<TyreCompound>,
    /// 1-based lap numbers on which a pit stop occurs.
    pub pit_laps: Vec<u32>,
}

impl Strategy {
    /// Build a single-stint strategy on the medium compound with no stops.
    pub fn new(deploy_level: f64, harvest_level: f64) -> Result<Self> {
        Self::with_pit_schedule(deploy_level, harvest_level, vec![TyreCompound::medium()], vec![])
    }

    /// Build a strategy with an explicit compound sequence and pit schedule.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Validation`] when a level leaves [0, 1],
    /// the compound sequence length is not `pit_laps.len() + 1`, or the pit
    /// laps are not strictly ascending.
    pub fn with_pit_schedule(
        deploy_level: f64,
        harvest_level: f64,
        compound_sequence: Vec<TyreCompound>,
        pit_laps: Vec<u32>,
    ) -> Result<Self> {
        for (field, value) in [("deploy_level", deploy_level), ("harvest_level", harvest_level)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimulationError::validation(
                    "Strategy",
                    format!("{field} must be between 0.0 and 1.0, got {value}"),
                ));
            }
        }
        if compound_sequence.len() != pit_laps.len() + 1 {
            return Err(SimulationError::validation(
                "Strategy",
                format!(
                    "compound_sequence length must be pit_laps length + 1 ({} != {} + 1)",
                    compound_sequence.len(),
                    pit_laps.len()
                ),
            ));
        }
        if pit_laps.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(SimulationError::validation(
                "Strategy",
                "pit_laps must be strictly ascending",
            ));
        }
        Ok(Self { deploy_level, harvest_level, compound_sequence, pit_laps })
    }
}
