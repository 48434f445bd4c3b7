//! Sizing trade studies: independent runs over a grid of array and bank sizes.

use std::fmt;

use tracing::info;

use crate::data::HourlyRecord;
use crate::error::SimError;

use super::consumption::ConsumptionPolicy;
use super::engine::Simulation;
use super::types::SizingParameters;

/// Outcome of one grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub rated_array_power: f64,
    pub battery_capacity: f64,
    pub min_soc: f64,
    pub cost: f64,
}

impl fmt::Display for SweepPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "array={:>8.1} W  bank={:>8.1} Wh | SoC min={:>5.1}%  cost=${:.2}",
            self.rated_array_power,
            self.battery_capacity,
            self.min_soc * 100.0,
            self.cost
        )
    }
}

/// Runs one simulation per (array, capacity) pair, array-major.
///
/// Efficiency and daylight window come from `base`. Each run is
/// independent; the records are shared read-only.
///
/// # Errors
///
/// Returns the first error from any grid point.
pub fn run_sweep(
    records: &[HourlyRecord],
    base: &SizingParameters,
    policy: &ConsumptionPolicy,
    array_powers: &[f64],
    capacities: &[f64],
) -> Result<Vec<SweepPoint>, SimError> {
    let mut points = Vec::with_capacity(array_powers.len() * capacities.len());
    for &rated_array_power in array_powers {
        for &battery_capacity in capacities {
            let params = SizingParameters {
                rated_array_power,
                battery_capacity,
                ..*base
            };
            let result = Simulation::new(params, policy.clone())?.run(records)?;
            let min_soc = result.min_soc().map_or(1.0, |(_, v)| v);
            points.push(SweepPoint {
                rated_array_power,
                battery_capacity,
                min_soc,
                cost: result.cost,
            });
        }
    }
    info!(points = points.len(), "sweep complete");
    Ok(points)
}

/// Lowest-cost point whose minimum SOC is at least `min_soc`.
pub fn cheapest_feasible(points: &[SweepPoint], min_soc: f64) -> Option<&SweepPoint> {
    points
        .iter()
        .filter(|p| p.min_soc >= min_soc)
        .min_by(|a, b| a.cost.total_cmp(&b.cost))
}
