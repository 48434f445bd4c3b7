//! Record builders shared by the engine's unit tests.

use chrono::NaiveDate;

use crate::data::{HourlyCalendar, HourlyRecord};

/// A calm, 20 °C, dark hour at calendar `index` from 2019-01-01.
pub(crate) fn blank(index: usize) -> HourlyRecord {
    let calendar = HourlyCalendar::starting(2019).expect("valid year");
    let ts = calendar.timestamp(index).expect("in range");
    HourlyRecord {
        timestamp: ts,
        month: chrono::Datelike::month(&ts) as u8,
        day: chrono::Datelike::day(&ts) as u8,
        hour: chrono::Timelike::hour(&ts) as u8,
        weekday: calendar.weekday(index).expect("in range"),
        irradiance: 0.0,
        ambient_temp: 20.0,
        cell_temp: 20.0,
        wind: 0.0,
        base_power: 0.0,
    }
}

/// One record per base power value, hours counting up from midnight.
pub(crate) fn hour_records(base_power: &[f64]) -> Vec<HourlyRecord> {
    base_power
        .iter()
        .enumerate()
        .map(|(i, &b)| HourlyRecord {
            base_power: b,
            ..blank(i)
        })
        .collect()
}

/// A single hour with explicit calendar fields.
pub(crate) fn at(month: u8, hour: u8, weekday: u8, ambient_temp: f64) -> HourlyRecord {
    let timestamp = NaiveDate::from_ymd_opt(2019, u32::from(month), 1)
        .and_then(|d| d.and_hms_opt(u32::from(hour), 0, 0))
        .expect("valid stamp");
    HourlyRecord {
        timestamp,
        month,
        day: 1,
        hour,
        weekday,
        ambient_temp,
        ..blank(0)
    }
}

/// Converts °F to °C for building records against °F thresholds.
pub(crate) fn f_to_c(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}
