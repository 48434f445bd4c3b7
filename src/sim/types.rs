//! Core simulation types: sizing parameters and the aligned result bundle.

use std::fmt;

use crate::data::HourlyRecord;
use crate::error::SimError;

/// Default power conversion efficiency.
pub const DEFAULT_EFFICIENCY: f64 = 0.95;

/// Inclusive hour-of-day range during which the array may produce power.
///
/// Outside the window generated power is forced to zero, which models
/// obstruction at dawn and dusk.
///
/// # Examples
///
/// ```
/// use offgrid_pv::sim::types::DaylightWindow;
///
/// let window = DaylightWindow::new(10, 15).unwrap();
/// assert!(window.contains(10) && window.contains(15));
/// assert!(!window.contains(16));
/// assert!(DaylightWindow::FULL_DAY.contains(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaylightWindow {
    /// First hour with generation (inclusive).
    pub start_hour: u8,
    /// Last hour with generation (inclusive).
    pub end_hour: u8,
}

impl DaylightWindow {
    /// Window covering every hour of the day.
    pub const FULL_DAY: Self = Self {
        start_hour: 0,
        end_hour: 23,
    };

    /// Creates a window from `start_hour` to `end_hour`, both in `0..=23`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] if either hour exceeds 23.
    pub fn new(start_hour: u8, end_hour: u8) -> Result<Self, SimError> {
        for (name, hour) in [("start_hour", start_hour), ("end_hour", end_hour)] {
            if hour > 23 {
                return Err(SimError::InvalidParameter {
                    name,
                    value: f64::from(hour),
                    reason: "must be in 0..=23",
                });
            }
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    /// Whether `hour` falls inside the window.
    pub fn contains(&self, hour: u8) -> bool {
        (self.start_hour..=self.end_hour).contains(&hour)
    }
}

impl Default for DaylightWindow {
    fn default() -> Self {
        Self::FULL_DAY
    }
}

/// Array and battery sizing for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingParameters {
    /// Total rated panel power (W).
    pub rated_array_power: f64,
    /// Total battery capacity (Wh).
    pub battery_capacity: f64,
    /// Power conversion efficiency, in `(0, 1]`.
    pub efficiency: f64,
    /// Hours during which the array produces power.
    pub daylight_window: DaylightWindow,
}

impl SizingParameters {
    /// Creates parameters with the default efficiency and a full-day window.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] for non-positive power or capacity.
    pub fn new(rated_array_power: f64, battery_capacity: f64) -> Result<Self, SimError> {
        let params = Self {
            rated_array_power,
            battery_capacity,
            efficiency: DEFAULT_EFFICIENCY,
            daylight_window: DaylightWindow::FULL_DAY,
        };
        params.validate()?;
        Ok(params)
    }

    /// Returns a copy with the given conversion efficiency.
    #[must_use]
    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }

    /// Returns a copy with the given daylight window.
    #[must_use]
    pub fn with_window(mut self, window: DaylightWindow) -> Self {
        self.daylight_window = window;
        self
    }

    /// Checks every field against its valid range.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimError::InvalidParameter`] found.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.rated_array_power.is_finite() && self.rated_array_power > 0.0) {
            return Err(SimError::InvalidParameter {
                name: "rated_array_power",
                value: self.rated_array_power,
                reason: "must be finite and > 0",
            });
        }
        if !(self.battery_capacity.is_finite() && self.battery_capacity > 0.0) {
            return Err(SimError::InvalidParameter {
                name: "battery_capacity",
                value: self.battery_capacity,
                reason: "must be finite and > 0",
            });
        }
        check_efficiency(self.efficiency)
    }
}

pub(crate) fn check_efficiency(efficiency: f64) -> Result<(), SimError> {
    if efficiency > 0.0 && efficiency <= 1.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter {
            name: "efficiency",
            value: efficiency,
            reason: "must be in (0, 1]",
        })
    }
}

/// Per-hour total and direct consumption produced by a consumption policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsumptionSeries {
    /// Total load per hour (W), including direct loads.
    pub total: Vec<f64>,
    /// Portion of `total` served only from instantaneous generation (W).
    pub direct: Vec<f64>,
}

/// Aligned output of one simulation run.
///
/// Every series has one value per input record.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Sizing used for this run.
    pub params: SizingParameters,
    /// Input records, in order.
    pub records: Vec<HourlyRecord>,
    /// Generated power per hour (W).
    pub generated: Vec<f64>,
    /// Total consumption per hour (W).
    pub total_consumption: Vec<f64>,
    /// Direct consumption per hour (W).
    pub direct_consumption: Vec<f64>,
    /// Reported battery state of charge per hour, in `[0, 1]`.
    pub soc: Vec<f64>,
    /// System cost estimate.
    pub cost: f64,
}

impl SimulationResult {
    /// Number of simulated hours.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the run covered no hours.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index and value of the first occurrence of the minimum SOC.
    pub fn min_soc(&self) -> Option<(usize, f64)> {
        self.soc
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, v)| match best {
                Some((_, b)) if b <= v => best,
                _ => Some((i, v)),
            })
    }

    /// Iterates over per-hour views of the bundle.
    pub fn steps(&self) -> impl Iterator<Item = StepView<'_>> {
        (0..self.len()).map(move |i| StepView {
            record: &self.records[i],
            generated: self.generated[i],
            total_consumption: self.total_consumption[i],
            direct_consumption: self.direct_consumption[i],
            soc: self.soc[i],
        })
    }
}

/// One hour of a [`SimulationResult`].
#[derive(Debug, Clone, Copy)]
pub struct StepView<'a> {
    pub record: &'a HourlyRecord,
    pub generated: f64,
    pub total_consumption: f64,
    pub direct_consumption: f64,
    pub soc: f64,
}

impl fmt::Display for StepView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | gen={:>8.2} W  load={:>7.2} W  direct={:>6.2} W | SoC={:>5.1}%",
            self.record.timestamp.format("%Y-%m-%d %H:%M"),
            self.generated,
            self.total_consumption,
            self.direct_consumption,
            self.soc * 100.0,
        )
    }
}
