//! One hour of site weather and reference PV output.

use chrono::NaiveDateTime;

/// Day-of-week index used by [`HourlyRecord::weekday`], counted from Sunday.
pub const SATURDAY: u8 = 6;

/// A validated hourly record produced by a [`TimeSeriesProvider`](super::TimeSeriesProvider).
///
/// Temperatures are stored in degrees Celsius as delivered by the source
/// data. `base_power` is the reference array output normalised to one rated
/// watt of panel, before conversion efficiency and daylight clipping.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    /// Wall-clock stamp of the start of this hour.
    pub timestamp: NaiveDateTime,
    /// Month of year, 1–12.
    pub month: u8,
    /// Day of month, 1–31.
    pub day: u8,
    /// Hour of day, 0–23.
    pub hour: u8,
    /// Day of week, 0–6 with Sunday = 0 and Saturday = 6.
    pub weekday: u8,
    /// Diffuse irradiance (W/m²).
    pub irradiance: f64,
    /// Ambient air temperature (°C).
    pub ambient_temp: f64,
    /// PV cell temperature (°C).
    pub cell_temp: f64,
    /// Wind speed (m/s).
    pub wind: f64,
    /// Reference output per rated watt of panel (W/W).
    pub base_power: f64,
}

impl HourlyRecord {
    /// Ambient temperature in degrees Fahrenheit.
    ///
    /// Load rule thresholds are expressed in °F.
    pub fn ambient_temp_f(&self) -> f64 {
        self.ambient_temp * 9.0 / 5.0 + 32.0
    }

    /// Whether the hour of day lies within `start..=end`.
    pub fn hour_within(&self, start: u8, end: u8) -> bool {
        (start..=end).contains(&self.hour)
    }

    /// Whether the month lies within `first..=last`.
    pub fn month_within(&self, first: u8, last: u8) -> bool {
        (first..=last).contains(&self.month)
    }
}
