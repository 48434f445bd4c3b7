/// State-of-charge integration.
pub mod battery;
/// Rule-based load profiles.
pub mod consumption;
pub mod cost;
pub mod engine;
/// Array output scaling and daylight clipping.
pub mod generation;
pub mod kpi;
pub mod sweep;
#[cfg(test)]
pub(crate) mod testutil;
pub mod types;
