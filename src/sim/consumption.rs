//! Load profiles as additive (condition, magnitude) rules.
//!
//! Every policy expands to a list of [`LoadRule`]s. For each hour the
//! consumption is the sum of the magnitudes of all rules whose condition
//! holds for that hour's record and array output; rules flagged as
//! direct also count towards direct consumption. New behaviour is added by
//! appending a rule, never by changing an existing one.
//!
//! Temperature thresholds are in °F.

use tracing::debug;

use crate::data::HourlyRecord;
use crate::data::record::SATURDAY;
use crate::error::{SimError, ensure_aligned};

use super::types::ConsumptionSeries;

/// Array output during one hour, as seen by load conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArrayHour {
    /// Output per rated watt after efficiency and daylight-window clipping.
    pub base_power: f64,
    /// Generated power (W).
    pub generated: f64,
}

/// Predicate over one hour's record and array output.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Every hour.
    Always,
    /// Clipped output per rated watt at least this value (daylight proxy).
    BasePowerAtLeast(f64),
    /// Irradiance strictly below this value (night proxy).
    IrradianceBelow(f64),
    /// Generated power (W) at least this value.
    GenerationAtLeast(f64),
    /// Ambient temperature (°F) at least this value.
    AmbientAtLeastF(f64),
    /// Ambient temperature (°F) strictly above this value.
    AmbientAboveF(f64),
    /// Hour of day equal to this value.
    HourIs(u8),
    /// Day of week equal to this value (Sunday = 0).
    WeekdayIs(u8),
    /// Month within this inclusive range.
    MonthWithin(u8, u8),
    /// Every inner condition holds.
    All(Vec<Condition>),
}

impl Condition {
    /// Evaluates the condition for one hour.
    pub fn holds(&self, record: &HourlyRecord, output: ArrayHour) -> bool {
        match self {
            Self::Always => true,
            Self::BasePowerAtLeast(min) => output.base_power >= *min,
            Self::IrradianceBelow(max) => record.irradiance < *max,
            Self::GenerationAtLeast(min) => output.generated >= *min,
            Self::AmbientAtLeastF(min) => record.ambient_temp_f() >= *min,
            Self::AmbientAboveF(min) => record.ambient_temp_f() > *min,
            Self::HourIs(hour) => record.hour == *hour,
            Self::WeekdayIs(weekday) => record.weekday == *weekday,
            Self::MonthWithin(first, last) => record.month_within(*first, *last),
            Self::All(inner) => inner.iter().all(|c| c.holds(record, output)),
        }
    }
}

/// A named load drawing `watts` during every hour its condition holds.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRule {
    pub name: &'static str,
    pub watts: f64,
    pub condition: Condition,
    /// Served only from instantaneous generation.
    pub direct: bool,
}

impl LoadRule {
    pub fn new(name: &'static str, watts: f64, condition: Condition) -> Self {
        Self {
            name,
            watts,
            condition,
            direct: false,
        }
    }

    /// Marks the load as direct.
    #[must_use]
    pub fn direct(mut self) -> Self {
        self.direct = true;
        self
    }

    /// Power drawn by this load during one hour (W).
    pub fn draw(&self, record: &HourlyRecord, output: ArrayHour) -> f64 {
        if self.condition.holds(record, output) {
            self.watts
        } else {
            0.0
        }
    }
}

/// Electrical draw of an irrigation pump sized for `gallons` per day (W).
///
/// The pump moves 200 gallons per hour at 50 W.
pub fn pump_power_w(gallons: f64) -> f64 {
    gallons / 200.0 * 50.0
}

/// Residential baseline: constant, daytime, nighttime and direct loads.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicLoads {
    /// Always-on background load (W).
    pub constant_w: f64,
    /// Extra load while the sun is up (W).
    pub daytime_w: f64,
    /// Extra load while it is dark (W).
    pub nighttime_w: f64,
    /// Load that runs only when generation covers it (W).
    pub direct_w: f64,
    /// Minimum ambient temperature for the direct load (°F).
    pub direct_min_temp_f: f64,
}

impl Default for BasicLoads {
    fn default() -> Self {
        Self {
            constant_w: 0.0,
            daytime_w: 0.0,
            nighttime_w: 0.0,
            direct_w: 0.0,
            direct_min_temp_f: -40.0,
        }
    }
}

impl BasicLoads {
    /// Base power at or above which an hour counts as daylight.
    pub const DAYLIGHT_BASE_POWER: f64 = 0.01;
    /// Irradiance below which an hour counts as night (W/m²).
    pub const NIGHT_IRRADIANCE: f64 = 10.0;

    fn rules(&self) -> Vec<LoadRule> {
        vec![
            LoadRule::new("constant", self.constant_w, Condition::Always),
            LoadRule::new(
                "daytime",
                self.daytime_w,
                Condition::BasePowerAtLeast(Self::DAYLIGHT_BASE_POWER),
            ),
            LoadRule::new(
                "nighttime",
                self.nighttime_w,
                Condition::IrradianceBelow(Self::NIGHT_IRRADIANCE),
            ),
            LoadRule::new(
                "direct",
                self.direct_w,
                Condition::All(vec![
                    Condition::GenerationAtLeast(self.direct_w),
                    Condition::AmbientAtLeastF(self.direct_min_temp_f),
                ]),
            )
            .direct(),
        ]
    }
}

/// Greenhouse with a background load and a noon irrigation pump.
#[derive(Debug, Clone, PartialEq)]
pub struct GreenhouseLoads {
    /// Always-on background load (W).
    pub constant_w: f64,
    /// Daily irrigation volume (gallons).
    pub pump_gallons: f64,
}

impl Default for GreenhouseLoads {
    fn default() -> Self {
        Self {
            constant_w: 0.0,
            pump_gallons: 2.0,
        }
    }
}

impl GreenhouseLoads {
    /// Pumps stay off at or below this ambient temperature (°F).
    pub const PUMP_MIN_TEMP_F: f64 = 40.0;
    /// Hour at which the pump runs.
    pub const PUMP_HOUR: u8 = 12;

    fn rules(&self) -> Vec<LoadRule> {
        vec![
            LoadRule::new("constant", self.constant_w, Condition::Always),
            LoadRule::new(
                "pump",
                pump_power_w(self.pump_gallons),
                Condition::All(vec![
                    Condition::HourIs(Self::PUMP_HOUR),
                    Condition::AmbientAboveF(Self::PUMP_MIN_TEMP_F),
                ]),
            ),
        ]
    }
}

/// Seasonal greenhouse with controller, cooling fan, pump and battery
/// maintenance charging.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledGreenhouse {
    /// Microcontroller draw, every hour (W).
    pub controller_w: f64,
    /// Cooling fan, run directly from the panels (W).
    pub fan_w: f64,
    /// Fan runs at or above this ambient temperature (°F).
    pub fan_min_temp_f: f64,
    /// Daily irrigation volume (gallons).
    pub pump_gallons: f64,
    /// Hour at which the pump runs.
    pub pump_hour: u8,
    /// Months of the growing season (inclusive).
    pub growing_season: (u8, u8),
    /// Trickle charge of an auxiliary battery, every hour (W).
    pub trickle_w: f64,
    /// Weekly full charge of an auxiliary battery (W for one hour).
    pub full_charge_w: f64,
    pub full_charge_hour: u8,
    pub full_charge_weekday: u8,
    /// Months during which the weekly full charge runs (inclusive).
    pub charging_season: (u8, u8),
}

impl Default for ScheduledGreenhouse {
    fn default() -> Self {
        Self {
            controller_w: 3.0,
            fan_w: 15.0,
            fan_min_temp_f: 60.0,
            pump_gallons: 5.0,
            pump_hour: 12,
            growing_season: (4, 10),
            trickle_w: 6.0,
            full_charge_w: 80.0,
            full_charge_hour: 17,
            full_charge_weekday: SATURDAY,
            charging_season: (3, 10),
        }
    }
}

impl ScheduledGreenhouse {
    fn rules(&self) -> Vec<LoadRule> {
        let (grow_first, grow_last) = self.growing_season;
        let (charge_first, charge_last) = self.charging_season;
        vec![
            LoadRule::new("controller", self.controller_w, Condition::Always),
            LoadRule::new(
                "fan",
                self.fan_w,
                Condition::All(vec![
                    Condition::GenerationAtLeast(self.fan_w),
                    Condition::AmbientAtLeastF(self.fan_min_temp_f),
                    Condition::MonthWithin(grow_first, grow_last),
                ]),
            )
            .direct(),
            LoadRule::new(
                "pump",
                pump_power_w(self.pump_gallons),
                Condition::All(vec![
                    Condition::HourIs(self.pump_hour),
                    Condition::MonthWithin(grow_first, grow_last),
                ]),
            ),
            LoadRule::new("trickle charge", self.trickle_w, Condition::Always),
            LoadRule::new(
                "full charge",
                self.full_charge_w,
                Condition::All(vec![
                    Condition::HourIs(self.full_charge_hour),
                    Condition::WeekdayIs(self.full_charge_weekday),
                    Condition::MonthWithin(charge_first, charge_last),
                ]),
            ),
        ]
    }
}

/// Load profile used to compute hourly consumption.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsumptionPolicy {
    Basic(BasicLoads),
    Greenhouse(GreenhouseLoads),
    ScheduledGreenhouse(ScheduledGreenhouse),
}

impl Default for ConsumptionPolicy {
    fn default() -> Self {
        Self::Basic(BasicLoads::default())
    }
}

impl ConsumptionPolicy {
    /// Short name used in configs and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic(_) => "basic",
            Self::Greenhouse(_) => "greenhouse",
            Self::ScheduledGreenhouse(_) => "greenhouse_scheduled",
        }
    }

    /// Expands the policy into its load rules.
    pub fn rules(&self) -> Vec<LoadRule> {
        match self {
            Self::Basic(p) => p.rules(),
            Self::Greenhouse(p) => p.rules(),
            Self::ScheduledGreenhouse(p) => p.rules(),
        }
    }

    /// Checks that every load magnitude is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] naming the offending load.
    pub fn validate(&self) -> Result<(), SimError> {
        for rule in self.rules() {
            if !(rule.watts.is_finite() && rule.watts >= 0.0) {
                return Err(SimError::InvalidParameter {
                    name: rule.name,
                    value: rule.watts,
                    reason: "load must be finite and >= 0",
                });
            }
        }
        Ok(())
    }

    /// Computes total and direct consumption for every hour.
    ///
    /// # Arguments
    ///
    /// * `records` - Hourly weather records.
    /// * `base_power` - Clipped output per rated watt, aligned with `records`.
    /// * `generated` - Generated power (W), aligned with `records`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] for invalid loads and
    /// [`SimError::LengthMismatch`] if either series is not aligned with `records`.
    pub fn consume(
        &self,
        records: &[HourlyRecord],
        base_power: &[f64],
        generated: &[f64],
    ) -> Result<ConsumptionSeries, SimError> {
        self.validate()?;
        ensure_aligned("base_power", records.len(), base_power.len())?;
        ensure_aligned("generated", records.len(), generated.len())?;

        let rules = self.rules();
        let mut series = ConsumptionSeries {
            total: vec![0.0; records.len()],
            direct: vec![0.0; records.len()],
        };

        for rule in &rules {
            let hours = records.iter().zip(base_power).zip(generated);
            for (i, ((record, &base), &generated)) in hours.enumerate() {
                let output = ArrayHour {
                    base_power: base,
                    generated,
                };
                let watts = rule.draw(record, output);
                series.total[i] += watts;
                if rule.direct {
                    series.direct[i] += watts;
                }
            }
        }

        debug!(policy = self.name(), rules = rules.len(), hours = records.len(), "computed consumption");
        Ok(series)
    }
}
