//! Hourly time-series sources feeding the simulation.

/// NREL PVWatts hourly CSV provider.
pub mod nrel;
pub mod provider;
pub mod record;
/// Seeded synthetic weather year.
pub mod synthetic;

pub use nrel::NrelCsv;
pub use provider::{HourlyCalendar, TimeSeriesProvider};
pub use record::HourlyRecord;
pub use synthetic::SyntheticYear;
