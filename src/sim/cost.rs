//! Up-front hardware cost estimate.

use crate::error::SimError;

/// Panel cost per rated watt.
pub const COST_PER_PANEL_W: f64 = 1.33;
/// Battery cost per watt-hour of capacity.
pub const COST_PER_BATTERY_WH: f64 = 0.20;

/// Estimated system cost for an array of `rated_power` W and a bank of
/// `capacity` Wh.
///
/// # Errors
///
/// Returns [`SimError::InvalidParameter`] for negative or non-finite inputs.
pub fn cost(rated_power: f64, capacity: f64) -> Result<f64, SimError> {
    for (name, value) in [("rated_array_power", rated_power), ("battery_capacity", capacity)] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(SimError::InvalidParameter {
                name,
                value,
                reason: "must be finite and >= 0",
            });
        }
    }
    Ok(COST_PER_PANEL_W * rated_power + COST_PER_BATTERY_WH * capacity)
}
