//! NREL PVWatts hourly CSV ingestion.
//!
//! PVWatts exports start with a few metadata lines and a column header,
//! followed by one data row per hour:
//!
//! ```text
//! Month,Day,Hour,Beam,Diffuse,Ambient °C,Wind,POA,Cell °C,DC W,AC W
//! ```
//!
//! Only rows with exactly eleven fields and a numeric first field are data;
//! everything else is skipped.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::SimError;

use super::provider::{HourlyCalendar, TimeSeriesProvider};
use super::record::HourlyRecord;

/// Number of fields in a PVWatts hourly data row.
const FIELD_COUNT: usize = 11;

const COL_MONTH: usize = 0;
const COL_DAY: usize = 1;
const COL_HOUR: usize = 2;
const COL_DIFFUSE: usize = 4;
const COL_AMBIENT: usize = 5;
const COL_WIND: usize = 6;
const COL_CELL: usize = 8;
const COL_DC: usize = 9;

/// Rated DC size of the reference system PVWatts simulates by default (W).
pub const DEFAULT_REFERENCE_SYSTEM_W: f64 = 4000.0;

/// Provider reading one or more PVWatts hourly CSV files in order.
#[derive(Debug, Clone)]
pub struct NrelCsv {
    files: Vec<PathBuf>,
    start_year: i32,
    reference_system_w: f64,
}

impl NrelCsv {
    /// Creates a provider over `files`, stamping the first row at 1 January
    /// of `start_year`. DC output is divided by `reference_system_w` to give
    /// output per rated watt.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] if `reference_system_w` is not
    /// positive, or [`SimError::MalformedInput`] if no files are given.
    pub fn new(files: Vec<PathBuf>, start_year: i32, reference_system_w: f64) -> Result<Self, SimError> {
        if !(reference_system_w.is_finite() && reference_system_w > 0.0) {
            return Err(SimError::InvalidParameter {
                name: "reference_system_w",
                value: reference_system_w,
                reason: "must be finite and > 0",
            });
        }
        if files.is_empty() {
            return Err(SimError::malformed("nrel", 0, "no data files given"));
        }
        Ok(Self {
            files,
            start_year,
            reference_system_w,
        })
    }

    /// Parses one PVWatts export, stamping records from calendar index
    /// `offset` onward.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MalformedInput`] for data rows that do not parse
    /// or break the hourly cadence.
    pub fn parse_reader<R: Read>(
        &self,
        reader: R,
        source_name: &str,
        calendar: &HourlyCalendar,
        offset: usize,
    ) -> Result<Vec<HourlyRecord>, SimError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records: Vec<HourlyRecord> = Vec::new();
        let mut skipped = 0usize;

        for row in rdr.records() {
            let row = row.map_err(|e| undecodable_row(e, source_name))?;
            let line = row.position().map_or(0, csv::Position::line);
            if !is_data_row(&row) {
                skipped += 1;
                continue;
            }

            let values = parse_fields(&row, source_name, line)?;
            let month = integral(values[COL_MONTH], 1, 12, "month", source_name, line)?;
            let day = integral(values[COL_DAY], 1, 31, "day", source_name, line)?;
            let hour = integral(values[COL_HOUR], 0, 23, "hour", source_name, line)?;
            let irradiance = non_negative(values[COL_DIFFUSE], "irradiance", source_name, line)?;
            let wind = non_negative(values[COL_WIND], "wind speed", source_name, line)?;
            let dc_w = non_negative(values[COL_DC], "DC output", source_name, line)?;

            if let Some(prev) = records.last() {
                if hour != (prev.hour + 1) % 24 {
                    return Err(SimError::malformed(
                        source_name,
                        line,
                        format!("hour {hour} does not follow hour {}", prev.hour),
                    ));
                }
            }

            let index = offset + records.len();
            records.push(HourlyRecord {
                timestamp: calendar.timestamp(index)?,
                month,
                day,
                hour,
                weekday: calendar.weekday(index)?,
                irradiance,
                ambient_temp: values[COL_AMBIENT],
                cell_temp: values[COL_CELL],
                wind,
                base_power: dc_w / self.reference_system_w,
            });
        }

        debug!(source = source_name, rows = records.len(), skipped, "parsed PVWatts export");
        Ok(records)
    }
}

impl TimeSeriesProvider for NrelCsv {
    fn load(&self) -> Result<Vec<HourlyRecord>, SimError> {
        let calendar = HourlyCalendar::starting(self.start_year)?;
        let mut all = Vec::new();

        for path in &self.files {
            let file = File::open(path).map_err(|source| SimError::Io {
                path: path.clone(),
                source,
            })?;
            let name = path.display().to_string();
            let records = self.parse_reader(file, &name, &calendar, all.len())?;
            info!(file = %name, hours = records.len(), "loaded hourly data");
            all.extend(records);
        }

        if all.is_empty() {
            return Err(SimError::malformed(self.describe(), 0, "no hourly data rows found"));
        }
        Ok(all)
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.files.iter().map(|p| p.display().to_string()).collect();
        format!("NREL PVWatts [{}]", names.join(", "))
    }
}

/// Rows that are not valid UTF-8 are malformed input; other csv failures
/// (I/O) pass through unchanged.
fn undecodable_row(err: csv::Error, source_name: &str) -> SimError {
    match err.kind() {
        csv::ErrorKind::Utf8 { pos, err: utf8 } => SimError::malformed(
            source_name,
            pos.as_ref().map_or(0, csv::Position::line),
            format!("row is not valid UTF-8: {utf8}"),
        ),
        _ => SimError::Csv(err),
    }
}

fn is_data_row(row: &csv::StringRecord) -> bool {
    row.len() == FIELD_COUNT
        && row
            .get(0)
            .is_some_and(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
}

fn parse_fields(row: &csv::StringRecord, source_name: &str, line: u64) -> Result<[f64; FIELD_COUNT], SimError> {
    let mut values = [0.0; FIELD_COUNT];
    for (i, field) in row.iter().enumerate() {
        let value: f64 = field
            .parse()
            .map_err(|_| SimError::malformed(source_name, line, format!("field {} is not a number: {field:?}", i + 1)))?;
        if !value.is_finite() {
            return Err(SimError::malformed(source_name, line, format!("field {} is not finite", i + 1)));
        }
        values[i] = value;
    }
    Ok(values)
}

fn integral(value: f64, min: u8, max: u8, what: &str, source_name: &str, line: u64) -> Result<u8, SimError> {
    if value.fract() != 0.0 || value < f64::from(min) || value > f64::from(max) {
        return Err(SimError::malformed(
            source_name,
            line,
            format!("{what} {value} outside {min}..={max}"),
        ));
    }
    Ok(value as u8)
}

fn non_negative(value: f64, what: &str, source_name: &str, line: u64) -> Result<f64, SimError> {
    if value < 0.0 {
        return Err(SimError::malformed(source_name, line, format!("{what} {value} is negative")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\"Requested Location:\",\"cleveland\"\n\
                          \"Month\",\"Day\",\"Hour\",\"Beam Irradiance (W/m^2)\",\"Diffuse Irradiance (W/m^2)\",\"Ambient Temperature (C)\",\"Wind Speed (m/s)\",\"Plane of Array Irradiance (W/m^2)\",\"Cell Temperature (C)\",\"DC Array Output (W)\",\"AC System Output (W)\"\n";

    fn provider() -> NrelCsv {
        NrelCsv::new(vec![PathBuf::from("unused.csv")], 2019, 4000.0).expect("valid provider")
    }

    fn parse(body: &str) -> Result<Vec<HourlyRecord>, SimError> {
        let calendar = HourlyCalendar::starting(2019).expect("valid year");
        let text = format!("{HEADER}{body}");
        provider().parse_reader(text.as_bytes(), "test.csv", &calendar, 0)
    }

    #[test]
    fn skips_metadata_and_header_lines() {
        let records = parse("1,1,0,0,0,-3.5,4.1,0,-3.5,0,0\n1,1,1,0,0,-3.8,4.0,0,-3.8,0,0\n")
            .expect("should parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].hour, 1);
        assert_eq!(records[0].ambient_temp, -3.5);
    }

    #[test]
    fn strips_quotes_and_scales_dc_output() {
        let records = parse("\"6\",\"1\",\"12\",\"800\",\"120\",\"25\",\"3\",\"900\",\"40\",\"2000\",\"1900\"\n")
            .expect("should parse");
        let r = &records[0];
        assert_eq!((r.month, r.day, r.hour), (6, 1, 12));
        assert_eq!(r.irradiance, 120.0);
        assert_eq!(r.cell_temp, 40.0);
        assert_eq!(r.wind, 3.0);
        assert_eq!(r.base_power, 0.5);
    }

    #[test]
    fn stamps_records_from_calendar() {
        let records = parse("1,1,0,0,0,0,0,0,0,0,0\n1,1,1,0,0,0,0,0,0,0,0\n").expect("should parse");
        assert_eq!(records[0].weekday, 2); // 2019-01-01 is a Tuesday
        assert_eq!(records[1].timestamp - records[0].timestamp, chrono::TimeDelta::hours(1));
    }

    #[test]
    fn rejects_row_with_invalid_utf8() {
        let calendar = HourlyCalendar::starting(2019).expect("valid year");
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"1,1,0,0,0,-3.5,4.1,0,-3.5,0,0\n1,1,1,0,0,\xff\xfe,4.0,0,-3.8,0,0\n");
        let err = provider()
            .parse_reader(bytes.as_slice(), "test.csv", &calendar, 0)
            .unwrap_err();
        assert!(matches!(err, SimError::MalformedInput { line: 4, .. }), "{err}");
    }

    #[test]
    fn rejects_unparseable_data_row() {
        let err = parse("1,1,0,0,0,abc,0,0,0,0,0\n").unwrap_err();
        assert!(matches!(err, SimError::MalformedInput { line: 3, .. }), "{err}");
    }

    #[test]
    fn rejects_out_of_range_hour() {
        let err = parse("1,1,24,0,0,0,0,0,0,0,0\n").unwrap_err();
        assert!(err.to_string().contains("hour"));
    }

    #[test]
    fn rejects_negative_dc_output() {
        let err = parse("1,1,0,0,0,0,0,0,0,-5,0\n").unwrap_err();
        assert!(err.to_string().contains("DC output"));
    }

    #[test]
    fn rejects_gap_in_hourly_cadence() {
        let err = parse("1,1,0,0,0,0,0,0,0,0,0\n1,1,2,0,0,0,0,0,0,0,0\n").unwrap_err();
        assert!(err.to_string().contains("does not follow"));
    }

    #[test]
    fn accepts_midnight_rollover() {
        let records = parse("1,1,23,0,0,0,0,0,0,0,0\n1,2,0,0,0,0,0,0,0,0,0\n").expect("should parse");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn rejects_non_positive_reference_system() {
        let err = NrelCsv::new(vec![PathBuf::from("a.csv")], 2019, 0.0).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { name: "reference_system_w", .. }));
    }

    #[test]
    fn rejects_empty_file_list() {
        assert!(NrelCsv::new(Vec::new(), 2019, 4000.0).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let provider = NrelCsv::new(vec![PathBuf::from("does/not/exist.csv")], 2019, 4000.0)
            .expect("valid provider");
        assert!(matches!(provider.load(), Err(SimError::Io { .. })));
    }
}
