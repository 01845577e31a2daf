//! Persistent-overtake resolution.
//!
//! Once per lap the running order is scanned front to back and each
//! adjacent pair inside the attack window rolls a logistic pass
//! probability. A successful pass transfers real cumulative time between
//! the two cars before swapping their ranking slots, so next lap's
//! comparison starts from the new, separated times: passes stick instead
//! of oscillating.

use rand::Rng;

use super::entry::RunningEntry;

/// Maximum cumulative-time gap (seconds) at which a trailer can attack.
const ATTACK_WINDOW: f64 = 1.0;

/// Steepness of the logistic pass-probability curve.
const LOGISTIC_SLOPE: f64 = 3.0;

/// Run one front-to-back adjacent-pair sweep over the current running
/// order.
///
/// `ranked` holds indices into `entries` sorted by ascending cumulative
/// time. On a successful pass the pair's ranking slots are swapped and the
/// cursor advances past both, so a swapped pair is never re-evaluated
/// within the same sweep.
pub(crate) fn overtake_sweep<R: Rng + ?Sized>(
    entries: &mut [RunningEntry<'_>],
    ranked: &mut [usize],
    overtake_coefficient: f64,
    pass_time_delta: f64,
    rng: &mut R,
) {
    let mut i = 0;
    while i + 1 < ranked.len() {
        let leader = ranked[i];
        let trailer = ranked[i + 1];

        let gap = entries[trailer].cumulative_time - entries[leader].cumulative_time;
        if gap < ATTACK_WINDOW {
            let delta = entries[trailer].last_lap_time - entries[leader].last_lap_time;
            let exponent = -LOGISTIC_SLOPE * delta * overtake_coefficient;
            let pass_prob = 1.0 / (1.0 + exponent.exp());

            if rng.random::<f64>() < pass_prob {
                // Persistent time transfer: the overtaker ends up ahead by
                // construction, clamped at 0
                let leader_time = entries[leader].cumulative_time;
                entries[trailer].cumulative_time = (leader_time - pass_time_delta).max(0.0);
                entries[leader].cumulative_time += pass_time_delta;

                ranked.swap(i, i + 1);
                i += 2;
                continue;
            }
        }
        i += 1;
    }
}
