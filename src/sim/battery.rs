//! Battery state-of-charge integration over the simulation horizon.

use crate::error::{SimError, ensure_aligned};

/// SOC at the start of the horizon, and the value the reported trace is
/// blended with at the first hour.
pub const INITIAL_SOC: f64 = 1.0;

/// Carried state of the hourly SOC recurrence.
///
/// `raw` is the clamped energy balance that feeds the next hour.
/// `reported` is the trapezoid-smoothed value exposed in the trace; it
/// averages `raw` with the previous reported value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryState {
    pub raw: f64,
    pub reported: f64,
}

impl BatteryState {
    /// A fully charged bank with no reported history.
    pub const FULL: Self = Self {
        raw: INITIAL_SOC,
        reported: INITIAL_SOC,
    };

    /// Advances one hour and returns the reported SOC for it.
    ///
    /// The energy balance is clamped to `[0, 1]` before smoothing, so the
    /// reported value may lag the physical one during hours of heavy
    /// clamping.
    pub fn step(&mut self, generated_wh: f64, consumed_wh: f64, capacity_wh: f64) -> f64 {
        let available_wh = self.raw * capacity_wh;
        let balance_wh = available_wh + generated_wh - consumed_wh;
        let raw = (balance_wh / capacity_wh).clamp(0.0, 1.0);

        self.reported = (raw + self.reported) / 2.0;
        self.raw = raw;
        self.reported
    }
}

/// Integrates hourly generation and consumption into a SOC trace.
///
/// Steps run strictly in time order starting from a full bank. At the
/// first hour the new value is averaged with [`INITIAL_SOC`].
///
/// # Errors
///
/// Returns [`SimError::InvalidParameter`] if `capacity_wh` is not a finite
/// positive value and [`SimError::LengthMismatch`] if the inputs differ in
/// length.
///
/// # Examples
///
/// ```
/// use offgrid_pv::sim::battery::integrate;
///
/// // Draining half of a 10 Wh bank in one hour reports the midpoint
/// // between full and half.
/// let soc = integrate(&[0.0], &[5.0], 10.0).unwrap();
/// assert_eq!(soc, vec![0.75]);
/// ```
pub fn integrate(generated: &[f64], consumption: &[f64], capacity_wh: f64) -> Result<Vec<f64>, SimError> {
    if !(capacity_wh.is_finite() && capacity_wh > 0.0) {
        return Err(SimError::InvalidParameter {
            name: "battery_capacity",
            value: capacity_wh,
            reason: "must be finite and > 0",
        });
    }
    ensure_aligned("total_consumption", generated.len(), consumption.len())?;

    Ok(generated
        .iter()
        .zip(consumption)
        .scan(BatteryState::FULL, |state, (&g, &c)| {
            Some(state.step(g, c, capacity_wh))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn single_hour_blends_with_initial_value() {
        // clamp((1.0 * 10 + 10 - 0) / 10) = 1.0, averaged with the initial 1.0
        let soc = integrate(&[10.0], &[0.0], 10.0).expect("valid");
        assert_eq!(soc, vec![(1.0 + INITIAL_SOC) / 2.0]);
        assert_eq!(soc[0], 1.0);
    }

    #[test]
    fn first_hour_uses_initial_value_not_last_hour() {
        // Deep discharge leaves the final reported value low; the first hour
        // must still blend against 1.0.
        let soc = integrate(&[0.0, 0.0, 0.0], &[5.0, 5.0, 5.0], 10.0).expect("valid");
        assert_eq!(soc[0], (0.5 + 1.0) / 2.0);
        assert_eq!(soc[1], (0.0 + soc[0]) / 2.0);
        assert_eq!(soc[2], (0.0 + soc[1]) / 2.0);
    }

    #[test]
    fn clamps_before_smoothing() {
        // Raw balance would be -1.0, clamped to 0.0 before averaging.
        let soc = integrate(&[0.0], &[20.0], 10.0).expect("valid");
        assert_eq!(soc, vec![0.5]);
    }

    #[test]
    fn surplus_is_capped_at_full() {
        let soc = integrate(&[0.0, 100.0], &[10.0, 0.0], 10.0).expect("valid");
        // Hour 0: raw 0.0, reported 0.5. Hour 1: raw 1.0, reported 0.75.
        assert_eq!(soc, vec![0.5, 0.75]);
    }

    #[test]
    fn raw_state_carries_between_hours() {
        let mut state = BatteryState::FULL;
        state.step(0.0, 4.0, 10.0);
        assert_eq!(state.raw, 0.6);
        state.step(1.0, 0.0, 10.0);
        assert!((state.raw - 0.7).abs() < 1e-12);
    }

    #[test]
    fn huge_capacity_stays_full() {
        let n = 1000;
        let soc = integrate(&vec![0.0; n], &vec![250.0; n], 1e300).expect("valid");
        assert!(soc.iter().all(|&s| s == 1.0));
    }

    #[test]
    fn stays_within_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 5000;
        let generated: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..500.0)).collect();
        let consumed: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..500.0)).collect();
        for capacity in [1.0, 50.0, 1200.0, 1e6] {
            let soc = integrate(&generated, &consumed, capacity).expect("valid");
            assert_eq!(soc.len(), n);
            assert!(soc.iter().all(|s| (0.0..=1.0).contains(s)), "capacity {capacity}");
        }
    }

    #[test]
    fn larger_bank_never_reads_lower_while_smaller_bank_stays_above_empty() {
        // Load-only hours: neither bank recharges, so the deficit grows the
        // same for both and the larger bank keeps a higher fraction.
        let mut rng = StdRng::seed_from_u64(11);
        let consumed: Vec<f64> = (0..500).map(|_| rng.random_range(0.0..2.0)).collect();
        let generated = vec![0.0; consumed.len()];
        let small = integrate(&generated, &consumed, 2000.0).expect("valid");
        let large = integrate(&generated, &consumed, 4000.0).expect("valid");
        for (s, l) in small.iter().zip(&large) {
            assert!(l >= s);
        }
    }

    #[test]
    fn rejects_non_positive_capacity() {
        for capacity in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = integrate(&[0.0], &[0.0], capacity).unwrap_err();
            assert!(matches!(err, SimError::InvalidParameter { name: "battery_capacity", .. }));
        }
    }

    #[test]
    fn rejects_misaligned_inputs() {
        let err = integrate(&[0.0, 1.0], &[0.0], 10.0).unwrap_err();
        assert!(matches!(err, SimError::LengthMismatch { .. }));
    }

    #[test]
    fn empty_input_gives_empty_trace() {
        assert!(integrate(&[], &[], 10.0).expect("valid").is_empty());
    }
}
