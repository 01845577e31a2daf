//! Lap-time kernel.
//!
//! The deterministic part is a closed-form combination of car baseline,
//! aerodynamic deficit, tyre degradation and ERS deployment:
//!
//! ```text
//! lap_time = base_speed
//!          + downforce_sensitivity * (1 - aero_efficiency)
//!          + tyre_age * tyre_degradation_factor * tyre_wear_rate
//!          - actual_deploy * ers_efficiency
//! ```
//!
//! [`noisy_lap_time`] layers the driver skill offset and Gaussian noise on
//! top. Noise is always drawn from a caller-supplied generator, never from
//! shared global state, so two calls fed identically seeded generators
//! produce bit-identical values regardless of call order or what any other
//! thread is doing.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Result, SimulationError};
use crate::types::{Car, Driver, Track};

/// Deterministic lap time in seconds for a car on a track.
///
/// `actual_deploy` must be the amount the battery actually released (see
/// [`crate::state::EnergyState::deploy`]), not the requested level.
///
/// # Errors
///
/// Returns [`SimulationError::Parameter`] when `tyre_age` is negative or
/// `actual_deploy` leaves [0, 1].
pub fn lap_time(track: &Track, car: &Car, tyre_age: f64, actual_deploy: f64) -> Result<f64> {
    if tyre_age < 0.0 {
        return Err(SimulationError::parameter(
            "tyre_age",
            format!("must be >= 0.0, got {tyre_age}"),
        ));
    }
    if !(0.0..=1.0).contains(&actual_deploy) {
        return Err(SimulationError::parameter(
            "actual_deploy",
            format!("must be between 0.0 and 1.0, got {actual_deploy}"),
        ));
    }

    let base_component = car.base_speed;
    let aero_component = track.downforce_sensitivity * (1.0 - car.aero_efficiency);
    let tyre_component = tyre_age * track.tyre_degradation_factor * car.tyre_wear_rate;
    let ers_component = actual_deploy * car.ers_efficiency;

    Ok(base_component + aero_component + tyre_component - ers_component)
}

/// Lap time with driver skill offset and Gaussian noise.
///
/// The noise is drawn from `N(0, noise_std * consistency)` where the
/// consistency multiplier comes from the driver (1.0 when no driver is
/// given). A `noise_std` of exactly zero draws nothing from the generator,
/// which keeps draw sequences comparable between noisy and noise-free runs.
///
/// # Errors
///
/// Returns [`SimulationError::Parameter`] on the same conditions as
/// [`lap_time`], or when `noise_std` is negative.
pub fn noisy_lap_time<R: Rng + ?Sized>(
    track: &Track,
    car: &Car,
    tyre_age: f64,
    actual_deploy: f64,
    driver: Option<&Driver>,
    noise_std: f64,
    rng: &mut R,
) -> Result<f64> {
    if noise_std < 0.0 {
        return Err(SimulationError::parameter(
            "noise_std",
            format!("must be >= 0.0, got {noise_std}"),
        ));
    }

    let mut time = lap_time(track, car, tyre_age, actual_deploy)?;
    if let Some(driver) = driver {
        time += driver.skill_offset;
    }
    if noise_std > 0.0 {
        let consistency = driver.map_or(1.0, |d| d.consistency);
        let normal = Normal::new(0.0, noise_std * consistency)
            .map_err(|e| SimulationError::parameter("noise_std", e.to_string()))?;
        time += normal.sample(rng);
    }
    Ok(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_track() -> Track {
        Track::new("Test Circuit", 0.6, 0.5, 0.7, 0.05, 0.50).unwrap()
    }

    fn sample_car() -> Car {
        Car::new("Test Team", 80.0, 0.80, 0.85, 1.0, 0.98).unwrap()
    }

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn lap_time_is_a_pure_function(
                tyre_age in 0.0f64..100.0,
                deploy in 0.0f64..=1.0,
                seed in any::<u64>(),
            ) {
                // Property: identical inputs and identically seeded
                // generators yield bit-identical lap times
                let track = sample_track();
                let car = sample_car();
                let driver = Driver::new("D", "Test Team", -0.05, 1.1).unwrap();

                let a = lap_time(&track, &car, tyre_age, deploy).unwrap();
                let b = lap_time(&track, &car, tyre_age, deploy).unwrap();
                prop_assert_eq!(a.to_bits(), b.to_bits());

                let mut rng_a = ChaCha8Rng::seed_from_u64(seed);
                let mut rng_b = ChaCha8Rng::seed_from_u64(seed);
                let noisy_a = noisy_lap_time(
                    &track, &car, tyre_age, deploy, Some(&driver), 0.05, &mut rng_a,
                ).unwrap();
                let noisy_b = noisy_lap_time(
                    &track, &car, tyre_age, deploy, Some(&driver), 0.05, &mut rng_b,
                ).unwrap();
                prop_assert_eq!(noisy_a.to_bits(), noisy_b.to_bits());
            }

            #[test]
            fn degradation_is_monotone_in_tyre_age(
                age_young in 0.0f64..50.0,
                extra in 0.1f64..50.0,
            ) {
                // Property: older tyres are never faster, all else equal
                let track = sample_track();
                let car = sample_car();
                let young = lap_time(&track, &car, age_young, 0.5).unwrap();
                let old = lap_time(&track, &car, age_young + extra, 0.5).unwrap();
                prop_assert!(old >= young);
            }
        }
    }

    #[test]
    fn formula_components_add_up() {
        let track = sample_track();
        let car = sample_car();
        // 80.0 + 0.50 * (1 - 0.85) + 10 * 0.05 * 1.0 - 0.5 * 0.80
        let expected = 80.0 + 0.075 + 0.5 - 0.4;
        let time = lap_time(&track, &car, 10.0, 0.5).unwrap();
        assert!((time - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_noise_matches_deterministic_plus_offset() {
        let track = sample_track();
        let car = sample_car();
        let driver = Driver::new("D", "Test Team", 0.3, 1.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let noisy =
            noisy_lap_time(&track, &car, 5.0, 0.4, Some(&driver), 0.0, &mut rng).unwrap();
        let deterministic = lap_time(&track, &car, 5.0, 0.4).unwrap();
        assert_eq!(noisy, deterministic + 0.3);
    }

    #[test]
    fn invalid_arguments_rejected() {
        let track = sample_track();
        let car = sample_car();
        assert!(lap_time(&track, &car, -1.0, 0.5).is_err());
        assert!(lap_time(&track, &car, 0.0, 1.5).is_err());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(noisy_lap_time(&track, &car, 0.0, 0.5, None, -0.1, &mut rng).is_err());
    }
}
