//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::data::nrel::DEFAULT_REFERENCE_SYSTEM_W;
use crate::data::synthetic::HOURS_PER_YEAR;
use crate::data::{NrelCsv, SyntheticYear, TimeSeriesProvider};
use crate::error::SimError;
use crate::sim::consumption::{BasicLoads, ConsumptionPolicy, GreenhouseLoads, ScheduledGreenhouse};
use crate::sim::types::{DEFAULT_EFFICIENCY, DaylightWindow, SizingParameters};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Weather/production data source.
    #[serde(default)]
    pub data: DataConfig,
    /// Panel array sizing.
    #[serde(default)]
    pub array: ArrayConfig,
    /// Battery bank sizing.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Load profile.
    #[serde(default)]
    pub loads: LoadsConfig,
    /// Sizing sweep grid.
    #[serde(default)]
    pub sweep: SweepConfig,
}

/// Weather/production data source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// `"synthetic"` or `"nrel"`.
    pub source: String,
    /// PVWatts hourly CSV files, read in order (nrel only).
    pub files: Vec<PathBuf>,
    /// Calendar year of the first record.
    pub start_year: i32,
    /// Rated DC size of the system the NREL files were generated for (W).
    pub reference_system_w: f64,
    /// Seed for the synthetic weather year.
    pub seed: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: "synthetic".to_string(),
            files: Vec::new(),
            start_year: 2019,
            reference_system_w: DEFAULT_REFERENCE_SYSTEM_W,
            seed: 42,
        }
    }
}

/// Panel array sizing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrayConfig {
    /// Rated array power (W).
    pub rated_power_w: f64,
    /// Power conversion efficiency (0.0–1.0].
    pub efficiency: f64,
    /// First hour of the daylight window (inclusive).
    pub start_hour: u8,
    /// Last hour of the daylight window (inclusive).
    pub end_hour: u8,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            rated_power_w: 100.0,
            efficiency: DEFAULT_EFFICIENCY,
            start_hour: 0,
            end_hour: 23,
        }
    }
}

/// Battery bank sizing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Usable capacity (Wh).
    pub capacity_wh: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self { capacity_wh: 600.0 }
    }
}

/// Load profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadsConfig {
    /// `"basic"`, `"greenhouse"` or `"greenhouse_scheduled"`.
    pub policy: String,
    /// Always-on load (W). Used by `basic` and `greenhouse`.
    pub constant_w: f64,
    pub daytime_w: f64,
    pub nighttime_w: f64,
    pub direct_w: f64,
    /// Minimum ambient temperature for the direct load (°F).
    pub direct_min_temp_f: f64,
    /// Daily irrigation volume (gallons). Used by `greenhouse`.
    pub pump_gallons: f64,
}

impl Default for LoadsConfig {
    fn default() -> Self {
        let basic = BasicLoads::default();
        Self {
            policy: "basic".to_string(),
            constant_w: basic.constant_w,
            daytime_w: basic.daytime_w,
            nighttime_w: basic.nighttime_w,
            direct_w: basic.direct_w,
            direct_min_temp_f: basic.direct_min_temp_f,
            pump_gallons: GreenhouseLoads::default().pump_gallons,
        }
    }
}

/// Sizing sweep grid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Array powers to try (W).
    pub array_power_w: Vec<f64>,
    /// Battery capacities to try (Wh).
    pub battery_capacity_wh: Vec<f64>,
    /// Minimum SOC a feasible point must keep.
    pub min_soc: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            array_power_w: vec![50.0, 100.0, 200.0, 300.0],
            battery_capacity_wh: vec![300.0, 600.0, 1200.0, 2400.0],
            min_soc: 0.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity_wh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the remote sensor preset: a tiny always-on load on a small
    /// panel and bank.
    pub fn sensor_node() -> Self {
        Self {
            array: ArrayConfig {
                rated_power_w: 5.2,
                ..ArrayConfig::default()
            },
            battery: BatteryConfig { capacity_wh: 7.4 },
            loads: LoadsConfig {
                constant_w: 0.1,
                ..LoadsConfig::default()
            },
            sweep: SweepConfig {
                array_power_w: vec![2.0, 5.2, 10.0],
                battery_capacity_wh: vec![3.7, 7.4, 14.8],
                min_soc: 0.2,
            },
            ..Self::default()
        }
    }

    /// Returns the greenhouse preset: background load and noon pump, with
    /// the array producing from 10:00 through 15:00.
    pub fn greenhouse() -> Self {
        Self {
            array: ArrayConfig {
                rated_power_w: 300.0,
                start_hour: 10,
                end_hour: 15,
                ..ArrayConfig::default()
            },
            battery: BatteryConfig {
                capacity_wh: 1200.0,
            },
            loads: LoadsConfig {
                policy: "greenhouse".to_string(),
                constant_w: 11.0,
                pump_gallons: 5.0,
                ..LoadsConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the seasonal greenhouse preset with scheduled loads.
    pub fn greenhouse_scheduled() -> Self {
        Self {
            loads: LoadsConfig {
                policy: "greenhouse_scheduled".to_string(),
                ..LoadsConfig::default()
            },
            ..Self::greenhouse()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "sensor_node", "greenhouse", "greenhouse_scheduled"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "sensor_node" => Ok(Self::sensor_node()),
            "greenhouse" => Ok(Self::greenhouse()),
            "greenhouse_scheduled" => Ok(Self::greenhouse_scheduled()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Points the scenario at NREL files, replacing any configured source.
    pub fn use_nrel_files(&mut self, files: Vec<PathBuf>) {
        self.data.source = "nrel".to_string();
        self.data.files = files;
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let d = &self.data;
        match d.source.as_str() {
            "synthetic" => {}
            "nrel" => {
                if d.files.is_empty() {
                    errors.push(ConfigError::new("data.files", "must list at least one file when source = \"nrel\""));
                }
            }
            other => errors.push(ConfigError::new(
                "data.source",
                format!("must be \"synthetic\" or \"nrel\", got \"{other}\""),
            )),
        }
        if !(1..=9999).contains(&d.start_year) {
            errors.push(ConfigError::new("data.start_year", "must be in 1..=9999"));
        }
        if !(d.reference_system_w.is_finite() && d.reference_system_w > 0.0) {
            errors.push(ConfigError::new("data.reference_system_w", "must be > 0"));
        }

        let a = &self.array;
        if !(a.rated_power_w.is_finite() && a.rated_power_w > 0.0) {
            errors.push(ConfigError::new("array.rated_power_w", "must be > 0"));
        }
        if !(a.efficiency > 0.0 && a.efficiency <= 1.0) {
            errors.push(ConfigError::new("array.efficiency", "must be in (0.0, 1.0]"));
        }
        if a.start_hour > 23 {
            errors.push(ConfigError::new("array.start_hour", "must be in 0..=23"));
        }
        if a.end_hour > 23 {
            errors.push(ConfigError::new("array.end_hour", "must be in 0..=23"));
        }

        let capacity = self.battery.capacity_wh;
        if !(capacity.is_finite() && capacity > 0.0) {
            errors.push(ConfigError::new("battery.capacity_wh", "must be finite and > 0"));
        }

        let l = &self.loads;
        if !matches!(l.policy.as_str(), "basic" | "greenhouse" | "greenhouse_scheduled") {
            errors.push(ConfigError::new(
                "loads.policy",
                format!(
                    "must be \"basic\", \"greenhouse\" or \"greenhouse_scheduled\", got \"{}\"",
                    l.policy
                ),
            ));
        }
        for (field, value) in [
            ("loads.constant_w", l.constant_w),
            ("loads.daytime_w", l.daytime_w),
            ("loads.nighttime_w", l.nighttime_w),
            ("loads.direct_w", l.direct_w),
            ("loads.pump_gallons", l.pump_gallons),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }

        let s = &self.sweep;
        if s.array_power_w.iter().any(|p| !(p.is_finite() && *p > 0.0)) {
            errors.push(ConfigError::new("sweep.array_power_w", "values must be > 0"));
        }
        if s.battery_capacity_wh.iter().any(|c| !(c.is_finite() && *c > 0.0)) {
            errors.push(ConfigError::new("sweep.battery_capacity_wh", "values must be > 0"));
        }
        if !(0.0..=1.0).contains(&s.min_soc) {
            errors.push(ConfigError::new("sweep.min_soc", "must be in [0.0, 1.0]"));
        }

        errors
    }

    /// Array and bank parameters for a single run.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] for out-of-range values.
    pub fn sizing_parameters(&self) -> Result<SizingParameters, SimError> {
        let window = DaylightWindow::new(self.array.start_hour, self.array.end_hour)?;
        let params = SizingParameters::new(self.array.rated_power_w, self.battery.capacity_wh)?
            .with_efficiency(self.array.efficiency)
            .with_window(window);
        params.validate()?;
        Ok(params)
    }

    /// The load policy selected by `[loads]`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] for an unknown policy name.
    pub fn consumption_policy(&self) -> Result<ConsumptionPolicy, SimError> {
        let l = &self.loads;
        let policy = match l.policy.as_str() {
            "basic" => ConsumptionPolicy::Basic(BasicLoads {
                constant_w: l.constant_w,
                daytime_w: l.daytime_w,
                nighttime_w: l.nighttime_w,
                direct_w: l.direct_w,
                direct_min_temp_f: l.direct_min_temp_f,
            }),
            "greenhouse" => ConsumptionPolicy::Greenhouse(GreenhouseLoads {
                constant_w: l.constant_w,
                pump_gallons: l.pump_gallons,
            }),
            "greenhouse_scheduled" => ConsumptionPolicy::ScheduledGreenhouse(ScheduledGreenhouse::default()),
            _ => {
                return Err(SimError::InvalidParameter {
                    name: "loads.policy",
                    value: f64::NAN,
                    reason: "unknown load policy",
                });
            }
        };
        policy.validate()?;
        Ok(policy)
    }

    /// The hourly data source selected by `[data]`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError`] if the NREL provider cannot be built.
    pub fn provider(&self) -> Result<Box<dyn TimeSeriesProvider>, SimError> {
        let d = &self.data;
        match d.source.as_str() {
            "nrel" => Ok(Box::new(NrelCsv::new(
                d.files.clone(),
                d.start_year,
                d.reference_system_w,
            )?)),
            _ => Ok(Box::new(SyntheticYear::new(d.start_year, HOURS_PER_YEAR, d.seed))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert_eq!(e.field, "preset");
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }

    #[test]
    fn presets_build_runnable_inputs() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name).expect("preset loads");
            assert!(cfg.sizing_parameters().is_ok(), "{name}");
            assert!(cfg.consumption_policy().is_ok(), "{name}");
            assert!(cfg.provider().is_ok(), "{name}");
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[data]
source = "nrel"
files = ["data/cleveland.csv", "data/akron.csv"]
start_year = 2021
reference_system_w = 4000.0

[array]
rated_power_w = 100.0
efficiency = 0.95
start_hour = 10
end_hour = 15

[battery]
capacity_wh = 30.0

[loads]
policy = "basic"
constant_w = 1.0

[sweep]
array_power_w = [50.0, 100.0]
battery_capacity_wh = [30.0, 60.0]
min_soc = 0.25
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).expect("valid TOML should parse");
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.data.files.len(), 2);
        assert_eq!(cfg.data.start_year, 2021);
        assert_eq!(cfg.battery.capacity_wh, 30.0);

        let params = cfg.sizing_parameters().expect("valid params");
        assert!(params.daylight_window.contains(10));
        assert!(!params.daylight_window.contains(16));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[battery]
capacity_wh = 100.0
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = ScenarioConfig::from_toml_str("[battery]\ncapacity_wh = 1200.0\n").expect("parses");
        assert_eq!(cfg.battery.capacity_wh, 1200.0);
        assert_eq!(cfg.array.rated_power_w, 100.0);
        assert_eq!(cfg.array.efficiency, DEFAULT_EFFICIENCY);
        assert_eq!(cfg.data.source, "synthetic");
        assert_eq!(cfg.loads.direct_min_temp_f, -40.0);
    }

    #[test]
    fn validation_catches_zero_capacity() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.capacity_wh = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.capacity_wh"));
    }

    #[test]
    fn validation_catches_bad_efficiency_and_hours() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.array.efficiency = 1.5;
        cfg.array.end_hour = 24;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "array.efficiency"));
        assert!(errors.iter().any(|e| e.field == "array.end_hour"));
    }

    #[test]
    fn validation_catches_bad_policy_and_source() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.loads.policy = "bogus".to_string();
        cfg.data.source = "weather.gov".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "loads.policy"));
        assert!(errors.iter().any(|e| e.field == "data.source"));
        assert!(cfg.consumption_policy().is_err());
    }

    #[test]
    fn validation_catches_far_future_start_year() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.data.start_year = 262_142;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "data.start_year"));
    }

    #[test]
    fn greenhouse_presets_clip_to_midday_window() {
        for cfg in [ScenarioConfig::greenhouse(), ScenarioConfig::greenhouse_scheduled()] {
            let window = cfg.sizing_parameters().expect("valid").daylight_window;
            assert!(!window.contains(9));
            assert!(window.contains(10));
            assert!(window.contains(15));
            assert!(!window.contains(16));
        }
    }

    #[test]
    fn nrel_source_requires_files() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.data.source = "nrel".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "data.files"));
        assert!(cfg.provider().is_err());
    }

    #[test]
    fn nrel_override_switches_source() {
        let mut cfg = ScenarioConfig::greenhouse();
        cfg.use_nrel_files(vec![PathBuf::from("a.csv")]);
        assert_eq!(cfg.data.source, "nrel");
        assert!(cfg.validate().is_empty());
        assert!(cfg.provider().expect("builds").describe().contains("a.csv"));
    }

    #[test]
    fn greenhouse_preset_maps_to_policy() {
        let policy = ScenarioConfig::greenhouse().consumption_policy().expect("valid");
        assert_eq!(
            policy,
            ConsumptionPolicy::Greenhouse(GreenhouseLoads {
                constant_w: 11.0,
                pump_gallons: 5.0,
            })
        );
        let scheduled = ScenarioConfig::greenhouse_scheduled()
            .consumption_policy()
            .expect("valid");
        assert!(matches!(scheduled, ConsumptionPolicy::ScheduledGreenhouse(_)));
    }
}
