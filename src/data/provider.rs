//! The boundary between data sources and the simulation engine.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::SimError;

use super::record::HourlyRecord;

/// A source of chronologically contiguous hourly records.
///
/// Implementations validate every record and concatenate multiple sources
/// into one sequence. The engine relies on the returned sequence being
/// non-empty, fully populated and free of gaps.
pub trait TimeSeriesProvider {
    /// Loads the complete record sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MalformedInput`] for rows that fail validation or
    /// an empty sequence, and [`SimError::Io`] when a source cannot be read.
    fn load(&self) -> Result<Vec<HourlyRecord>, SimError>;

    /// Short human-readable description of the source, for logs.
    fn describe(&self) -> String;
}

/// Maps record indices to wall-clock stamps starting at 1 January of a year.
#[derive(Debug, Clone, Copy)]
pub struct HourlyCalendar {
    start: NaiveDateTime,
}

impl HourlyCalendar {
    /// Creates a calendar whose index 0 is `year`-01-01 00:00.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] when the year is out of range.
    pub fn starting(year: i32) -> Result<Self, SimError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or(SimError::InvalidParameter {
                name: "start_year",
                value: f64::from(year),
                reason: "not a representable calendar year",
            })?;
        Ok(Self { start })
    }

    /// Stamp of the hour at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] if the stamp falls outside the
    /// representable calendar.
    pub fn timestamp(&self, index: usize) -> Result<NaiveDateTime, SimError> {
        i64::try_from(index)
            .ok()
            .and_then(TimeDelta::try_hours)
            .and_then(|offset| self.start.checked_add_signed(offset))
            .ok_or(SimError::InvalidParameter {
                name: "record index",
                value: index as f64,
                reason: "hour lies beyond the representable calendar",
            })
    }

    /// Day of week of the hour at `index`, Sunday = 0.
    ///
    /// # Errors
    ///
    /// Same as [`HourlyCalendar::timestamp`].
    pub fn weekday(&self, index: usize) -> Result<u8, SimError> {
        Ok(self.timestamp(index)?.weekday().num_days_from_sunday() as u8)
    }
}
