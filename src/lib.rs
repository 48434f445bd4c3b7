//! Off-grid photovoltaic array and battery sizing.
//!
//! Hourly weather and production records drive a rule-based load model and
//! a battery state-of-charge integration; the outcome is the minimum SOC and
//! cost of a candidate system.

pub mod cli;
pub mod config;
/// Hourly data sources: NREL PVWatts exports and a synthetic year.
pub mod data;
pub mod error;
pub mod io;
/// Generation, consumption, battery, cost and the run pipeline.
pub mod sim;
pub mod telemetry;
