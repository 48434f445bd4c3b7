//! Simulation graph: generation, consumption and battery stages in one pass.
//!
//! ```text
//! records ──► generation ──┬──────────────► battery ──► soc
//!    │                     │                   ▲
//!    └─────────────────────┴─► consumption ────┘
//! sizing ──► cost
//! ```

use tracing::{debug, info, info_span};

use crate::data::{HourlyRecord, TimeSeriesProvider};
use crate::error::{SimError, ensure_aligned};

use super::battery::integrate;
use super::consumption::ConsumptionPolicy;
use super::cost::cost;
use super::generation::{clipped_base_power, scale_to_array};
use super::types::{SimulationResult, SizingParameters};

/// A validated sizing and load profile, ready to run against hourly data.
///
/// Each call to [`Simulation::run`] is an independent, deterministic pass
/// over the full horizon; nothing is cached between runs.
#[derive(Debug, Clone)]
pub struct Simulation {
    params: SizingParameters,
    policy: ConsumptionPolicy,
}

impl Simulation {
    /// Creates a simulation after validating every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] for out-of-range sizing or loads.
    pub fn new(params: SizingParameters, policy: ConsumptionPolicy) -> Result<Self, SimError> {
        params.validate()?;
        policy.validate()?;
        Ok(Self { params, policy })
    }

    pub fn params(&self) -> &SizingParameters {
        &self.params
    }

    pub fn policy(&self) -> &ConsumptionPolicy {
        &self.policy
    }

    /// Runs all stages over `records` and returns the aligned bundle.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MalformedInput`] for an empty record sequence and
    /// [`SimError::LengthMismatch`] if a stage breaks alignment.
    pub fn run(&self, records: &[HourlyRecord]) -> Result<SimulationResult, SimError> {
        let _span = info_span!("simulate", policy = self.policy.name(), hours = records.len()).entered();
        if records.is_empty() {
            return Err(SimError::malformed("records", 0, "at least one hourly record is required"));
        }
        let n = records.len();
        let p = &self.params;

        // 1. Generation
        let base_power = clipped_base_power(records, p.efficiency, p.daylight_window)?;
        ensure_aligned("base_power", n, base_power.len())?;
        let generated = scale_to_array(&base_power, p.rated_array_power)?;
        ensure_aligned("generated", n, generated.len())?;
        debug!("generation done");

        // 2. Consumption (daylight loads read clipped base power, direct loads read generation)
        let consumption = self.policy.consume(records, &base_power, &generated)?;
        ensure_aligned("total_consumption", n, consumption.total.len())?;
        ensure_aligned("direct_consumption", n, consumption.direct.len())?;

        // 3. Battery
        let soc = integrate(&generated, &consumption.total, p.battery_capacity)?;
        ensure_aligned("soc", n, soc.len())?;
        debug!("integration done");

        // 4. Cost
        let cost = cost(p.rated_array_power, p.battery_capacity)?;

        let result = SimulationResult {
            params: *p,
            records: records.to_vec(),
            generated,
            total_consumption: consumption.total,
            direct_consumption: consumption.direct,
            soc,
            cost,
        };
        if let Some((_, min_soc)) = result.min_soc() {
            info!(min_soc, cost, "simulation complete");
        }
        Ok(result)
    }

    /// Loads records from `provider` and runs the simulation over them.
    ///
    /// # Errors
    ///
    /// Propagates provider errors unchanged, then any error from [`Simulation::run`].
    pub fn run_with(&self, provider: &dyn TimeSeriesProvider) -> Result<SimulationResult, SimError> {
        info!(source = %provider.describe(), "loading hourly data");
        let records = provider.load()?;
        self.run(&records)
    }
}
