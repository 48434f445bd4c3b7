//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate, TimeDelta};
use tempfile::TempDir;

use offgrid_pv::data::synthetic::HOURS_PER_YEAR;
use offgrid_pv::data::{HourlyRecord, SyntheticYear, TimeSeriesProvider};
use offgrid_pv::sim::consumption::{BasicLoads, ConsumptionPolicy};

/// Full synthetic year starting 2019 (seed 42).
pub fn synthetic_year() -> Vec<HourlyRecord> {
    SyntheticYear::new(2019, HOURS_PER_YEAR, 42)
        .load()
        .expect("synthetic year should load")
}

/// Basic loads with only a constant draw.
pub fn constant_load(watts: f64) -> ConsumptionPolicy {
    ConsumptionPolicy::Basic(BasicLoads {
        constant_w: watts,
        ..BasicLoads::default()
    })
}

/// A PVWatts-style hourly export covering `days` days from 1 January 2019.
///
/// Sun is up 08:00–16:00 at a fixed DC output of `dc_w` W; ambient is 10 °C.
pub fn pvwatts_csv(days: usize, dc_w: f64) -> String {
    let mut out = String::from(
        "\"Requested Location\",\"cleveland, oh\"\n\
         \"DC System Size (kW)\",\"4\"\n\
         \"Month\",\"Day\",\"Hour\",\"Beam Irradiance (W/m^2)\",\"Diffuse Irradiance (W/m^2)\",\
         \"Ambient Temperature (C)\",\"Wind Speed (m/s)\",\"Plane of Array Irradiance (W/m^2)\",\
         \"Cell Temperature (C)\",\"DC Array Output (W)\",\"AC System Output (W)\"\n",
    );
    let start = NaiveDate::from_ymd_opt(2019, 1, 1).expect("valid date");
    for d in 0..days {
        let date = start + TimeDelta::days(d as i64);
        for hour in 0..24 {
            let sun = (8..16).contains(&hour);
            let (diffuse, dc) = if sun { (120.0, dc_w) } else { (0.0, 0.0) };
            writeln!(
                out,
                "\"{}\",\"{}\",\"{hour}\",\"0\",\"{diffuse}\",\"10\",\"2\",\"0\",\"10\",\"{dc}\",\"{}\"",
                date.month(),
                date.day(),
                dc * 0.96,
            )
            .expect("write to string");
        }
    }
    out
}

/// Writes `contents` to `name` inside `dir`; removed when `dir` drops.
pub fn write_temp(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("temp file should be writable");
    path
}
