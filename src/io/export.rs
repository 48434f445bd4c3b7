//! CSV export of simulation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::kpi::DailyEnergy;
use crate::sim::types::SimulationResult;

/// Column header for the hourly export.
const HOURLY_HEADER: &str = "timestamp,month,day,hour,weekday,ambient_c,\
                             generated_w,consumption_w,direct_w,soc";

/// Column header for the daily export.
const DAILY_HEADER: &str = "date,generated_wh,consumed_wh,direct_wh,net_wh";

/// Exports the hourly result bundle to a CSV file at `path`.
///
/// # Arguments
///
/// * `result` - Complete simulation result bundle
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(result: &SimulationResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_csv(result, io::BufWriter::new(file))
}

/// Writes the hourly result bundle as CSV to any writer.
///
/// One row per simulated hour, in order. Output is deterministic for
/// identical results.
///
/// # Arguments
///
/// * `result` - Complete simulation result bundle
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(result: &SimulationResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HOURLY_HEADER.split(',').map(str::trim))?;

    for step in result.steps() {
        let r = step.record;
        wtr.write_record(&[
            r.timestamp.format("%Y-%m-%dT%H:%M").to_string(),
            r.month.to_string(),
            r.day.to_string(),
            r.hour.to_string(),
            r.weekday.to_string(),
            format!("{:.2}", r.ambient_temp),
            format!("{:.4}", step.generated),
            format!("{:.4}", step.total_consumption),
            format!("{:.4}", step.direct_consumption),
            format!("{:.6}", step.soc),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports daily energy totals to a CSV file at `path`.
///
/// # Arguments
///
/// * `days` - Per-day totals from `daily_energy`
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_daily_csv(days: &[DailyEnergy], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_daily_csv(days, io::BufWriter::new(file))
}

/// Writes daily energy totals as CSV to any writer.
///
/// # Arguments
///
/// * `days` - Per-day totals from `daily_energy`
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_daily_csv(days: &[DailyEnergy], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(DAILY_HEADER.split(','))?;
    for d in days {
        wtr.write_record(&[
            d.date.to_string(),
            format!("{:.3}", d.generated_wh),
            format!("{:.3}", d.consumed_wh),
            format!("{:.3}", d.direct_wh),
            format!("{:.3}", d.net_wh),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
