//! Array output: reference power scaled to the rated array size.

use crate::data::HourlyRecord;
use crate::error::SimError;

use super::types::{DaylightWindow, check_efficiency};

/// Output per rated watt for every hour, after efficiency and daylight
/// clipping.
///
/// `base[i] = records[i].base_power * efficiency` when the hour of record
/// `i` lies inside `window`, otherwise zero. This is the series load rules
/// use as their daylight proxy.
///
/// # Errors
///
/// Returns [`SimError::InvalidParameter`] if `efficiency` lies outside `(0, 1]`.
pub fn clipped_base_power(
    records: &[HourlyRecord],
    efficiency: f64,
    window: DaylightWindow,
) -> Result<Vec<f64>, SimError> {
    check_efficiency(efficiency)?;
    Ok(records
        .iter()
        .map(|r| {
            if window.contains(r.hour) {
                r.base_power * efficiency
            } else {
                0.0
            }
        })
        .collect())
}

/// Scales clipped per-watt output to an array of `rated_power` watts.
///
/// # Errors
///
/// Returns [`SimError::InvalidParameter`] if `rated_power` is negative or
/// not finite.
pub fn scale_to_array(base_power: &[f64], rated_power: f64) -> Result<Vec<f64>, SimError> {
    if !(rated_power.is_finite() && rated_power >= 0.0) {
        return Err(SimError::InvalidParameter {
            name: "rated_power",
            value: rated_power,
            reason: "must be finite and >= 0",
        });
    }
    Ok(base_power.iter().map(|b| b * rated_power).collect())
}

/// Computes generated power per hour (W).
///
/// `generated[i] = base_power[i] * efficiency * rated_power` when the hour
/// of record `i` lies inside `window`, otherwise zero.
///
/// # Errors
///
/// Returns [`SimError::InvalidParameter`] if `rated_power` is negative or
/// `efficiency` lies outside `(0, 1]`.
///
/// # Examples
///
/// ```
/// # use offgrid_pv::sim::generation::generate;
/// # use offgrid_pv::sim::types::DaylightWindow;
/// let generated = generate(&[], 100.0, 0.95, DaylightWindow::FULL_DAY).unwrap();
/// assert!(generated.is_empty());
/// ```
pub fn generate(
    records: &[HourlyRecord],
    rated_power: f64,
    efficiency: f64,
    window: DaylightWindow,
) -> Result<Vec<f64>, SimError> {
    let base = clipped_base_power(records, efficiency, window)?;
    scale_to_array(&base, rated_power)
}
