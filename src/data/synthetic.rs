//! Deterministic synthetic weather year for demos and tests.

use std::f64::consts::PI;

use chrono::{Datelike, Timelike};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::error::SimError;

use super::provider::{HourlyCalendar, TimeSeriesProvider};
use super::record::HourlyRecord;

/// Hours in a non-leap year.
pub const HOURS_PER_YEAR: usize = 8760;

/// Day of year (0-based) of the June solstice.
const SOLSTICE_DOY: f64 = 171.0;
/// Peak per-rated-watt output under a clear summer sky.
const PEAK_BASE_POWER: f64 = 0.8;
/// Peak diffuse irradiance under a clear summer sky (W/m²).
const PEAK_IRRADIANCE: f64 = 250.0;

/// A seeded, reproducible year of hourly weather at a mid-latitude site.
///
/// Daylight follows a half-sine between sunrise and sunset with a seasonal
/// day length of 9 to 15 hours. Each day draws one cloudiness factor, so
/// overcast days stay overcast. Temperatures combine an annual and a daily
/// sinusoid plus Gaussian noise.
#[derive(Debug, Clone)]
pub struct SyntheticYear {
    start_year: i32,
    hours: usize,
    seed: u64,
}

impl SyntheticYear {
    /// Creates a generator for `hours` hours starting 1 January of `start_year`.
    pub fn new(start_year: i32, hours: usize, seed: u64) -> Self {
        Self {
            start_year,
            hours,
            seed,
        }
    }
}

impl TimeSeriesProvider for SyntheticYear {
    fn load(&self) -> Result<Vec<HourlyRecord>, SimError> {
        if self.hours == 0 {
            return Err(SimError::malformed(self.describe(), 0, "zero hours requested"));
        }
        let calendar = HourlyCalendar::starting(self.start_year)?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut clearness = 1.0;
        let mut records = Vec::with_capacity(self.hours);

        for i in 0..self.hours {
            let ts = calendar.timestamp(i)?;
            let hour = ts.hour() as u8;
            if i == 0 || hour == 0 {
                clearness = (0.7 + gaussian_noise(&mut rng, 0.25)).clamp(0.1, 1.0);
            }

            let season = (2.0 * PI * (f64::from(ts.ordinal0()) - SOLSTICE_DOY) / 365.0).cos();
            let frac = daylight_frac(f64::from(hour) + 0.5, 12.0 + 3.0 * season);
            let sun = frac * clearness * (0.75 + 0.25 * season);

            let base_power = PEAK_BASE_POWER * sun;
            let ambient_temp = 10.0
                + 12.0 * season
                + 5.0 * (2.0 * PI * (f64::from(hour) - 9.0) / 24.0).sin()
                + gaussian_noise(&mut rng, 1.5);

            records.push(HourlyRecord {
                timestamp: ts,
                month: ts.month() as u8,
                day: ts.day() as u8,
                hour,
                weekday: calendar.weekday(i)?,
                irradiance: PEAK_IRRADIANCE * sun,
                ambient_temp,
                cell_temp: ambient_temp + 30.0 * sun,
                wind: gaussian_noise(&mut rng, 3.0).abs(),
                base_power,
            });
        }

        debug!(hours = records.len(), seed = self.seed, "generated synthetic year");
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("synthetic year {} (seed {})", self.start_year, self.seed)
    }
}

/// Fraction of peak sun at `hour` for a day `day_length` hours long centred
/// on noon. Zero outside daylight.
fn daylight_frac(hour: f64, day_length: f64) -> f64 {
    let sunrise = 12.0 - day_length / 2.0;
    let pos = (hour - sunrise) / day_length;
    if (0.0..=1.0).contains(&pos) {
        (PI * pos).sin()
    } else {
        0.0
    }
}

/// Gaussian noise with mean 0 via the Box-Muller transform.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos() * std_dev
}
