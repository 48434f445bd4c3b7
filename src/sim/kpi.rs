//! Post-hoc sizing report and daily energy totals.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use super::types::SimulationResult;

/// Summary of one run, computed from the result bundle.
///
/// Energies are in kWh; each hourly power value counts as one hour of energy.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingReport {
    /// Rated array power (W).
    pub rated_array_power: f64,
    /// Battery capacity (Wh).
    pub battery_capacity: f64,
    /// Lowest reported SOC.
    pub min_soc: f64,
    /// First hour at which `min_soc` was reported.
    pub min_soc_at: Option<NaiveDateTime>,
    /// Hours whose reported SOC is zero.
    pub depleted_hours: usize,
    /// Energy the array could collect.
    pub generated_kwh: f64,
    /// Energy consumed by direct loads.
    pub direct_kwh: f64,
    /// Energy consumed by all loads.
    pub consumed_kwh: f64,
    /// Collected minus consumed energy.
    pub net_surplus_kwh: f64,
    /// System cost estimate.
    pub cost: f64,
}

impl SizingReport {
    /// Computes the report from a completed run.
    ///
    /// An empty bundle reports a minimum SOC of 1.0 with no timestamp.
    ///
    /// # Arguments
    ///
    /// * `result` - Complete simulation result bundle
    pub fn from_result(result: &SimulationResult) -> Self {
        let (min_soc, min_soc_at) = match result.min_soc() {
            Some((i, v)) => (v, Some(result.records[i].timestamp)),
            None => (1.0, None),
        };
        let generated_wh: f64 = result.generated.iter().sum();
        let consumed_wh: f64 = result.total_consumption.iter().sum();
        let direct_wh: f64 = result.direct_consumption.iter().sum();

        Self {
            rated_array_power: result.params.rated_array_power,
            battery_capacity: result.params.battery_capacity,
            min_soc,
            min_soc_at,
            depleted_hours: result.soc.iter().filter(|&&s| s <= 0.0).count(),
            generated_kwh: generated_wh / 1000.0,
            direct_kwh: direct_wh / 1000.0,
            consumed_kwh: consumed_wh / 1000.0,
            net_surplus_kwh: (generated_wh - consumed_wh) / 1000.0,
            cost: result.cost,
        }
    }
}

impl fmt::Display for SizingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Sizing Report ---")?;
        writeln!(f, "Panel array:           {:.2} W rated", self.rated_array_power)?;
        writeln!(f, "Battery capacity:      {:.2} Wh", self.battery_capacity)?;
        match self.min_soc_at {
            Some(at) => writeln!(
                f,
                "Battery SOC min:       {:.2}% on {}",
                self.min_soc * 100.0,
                at.format("%B %d %H:00")
            )?,
            None => writeln!(f, "Battery SOC min:       n/a")?,
        }
        writeln!(f, "Depleted hours:        {}", self.depleted_hours)?;
        writeln!(f, "Collectable energy:    {:.1} kWh", self.generated_kwh)?;
        writeln!(f, "Direct loads powered:  {:.1} kWh", self.direct_kwh)?;
        writeln!(f, "All loads powered:     {:.1} kWh", self.consumed_kwh)?;
        writeln!(f, "Net surplus:           {:.1} kWh", self.net_surplus_kwh)?;
        write!(f, "Estimated cost:        ${:.2}", self.cost)
    }
}

/// Energy totals for one calendar day (Wh).
#[derive(Debug, Clone, PartialEq)]
pub struct DailyEnergy {
    pub date: NaiveDate,
    pub generated_wh: f64,
    pub consumed_wh: f64,
    pub direct_wh: f64,
    pub net_wh: f64,
}

/// Sums the bundle per calendar day, in chronological order.
///
/// # Arguments
///
/// * `result` - Complete simulation result bundle
pub fn daily_energy(result: &SimulationResult) -> Vec<DailyEnergy> {
    let mut days: Vec<DailyEnergy> = Vec::new();
    for step in result.steps() {
        let date = step.record.timestamp.date();
        if days.last().is_none_or(|d| d.date != date) {
            days.push(DailyEnergy {
                date,
                generated_wh: 0.0,
                consumed_wh: 0.0,
                direct_wh: 0.0,
                net_wh: 0.0,
            });
        }
        if let Some(day) = days.last_mut() {
            day.generated_wh += step.generated;
            day.consumed_wh += step.total_consumption;
            day.direct_wh += step.direct_consumption;
            day.net_wh += step.generated - step.total_consumption;
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testutil::hour_records;
    use crate::sim::types::SizingParameters;

    fn result(generated: Vec<f64>, total: Vec<f64>, direct: Vec<f64>, soc: Vec<f64>) -> SimulationResult {
        SimulationResult {
            params: SizingParameters::new(100.0, 600.0).expect("valid"),
            records: hour_records(&vec![0.0; soc.len()]),
            generated,
            total_consumption: total,
            direct_consumption: direct,
            soc,
            cost: 253.0,
        }
    }

    #[test]
    fn energy_totals_in_kwh() {
        let r = result(
            vec![1000.0, 500.0, 0.0],
            vec![200.0, 200.0, 100.0],
            vec![50.0, 0.0, 0.0],
            vec![1.0, 0.9, 0.8],
        );
        let report = SizingReport::from_result(&r);
        assert_eq!(report.generated_kwh, 1.5);
        assert_eq!(report.consumed_kwh, 0.5);
        assert_eq!(report.direct_kwh, 0.05);
        assert_eq!(report.net_surplus_kwh, 1.0);
        assert_eq!(report.cost, 253.0);
    }

    #[test]
    fn min_soc_reports_first_occurrence() {
        let r = result(vec![0.0; 4], vec![0.0; 4], vec![0.0; 4], vec![0.9, 0.0, 0.0, 0.5]);
        let report = SizingReport::from_result(&r);
        assert_eq!(report.min_soc, 0.0);
        assert_eq!(report.min_soc_at, Some(r.records[1].timestamp));
        assert_eq!(report.depleted_hours, 2);
    }

    #[test]
    fn daily_totals_cover_every_hour() {
        let n = 24 * 3 + 5;
        let r = result(vec![2.0; n], vec![1.0; n], vec![0.5; n], vec![1.0; n]);
        let days = daily_energy(&r);
        assert_eq!(days.len(), 4);
        assert_eq!(days[0].generated_wh, 48.0);
        assert_eq!(days[0].net_wh, 24.0);
        assert_eq!(days[3].consumed_wh, 5.0);
        let total: f64 = days.iter().map(|d| d.generated_wh).sum();
        assert_eq!(total, 2.0 * n as f64);
    }

    #[test]
    fn report_display_mentions_min_soc() {
        let r = result(vec![0.0; 2], vec![0.0; 2], vec![0.0; 2], vec![1.0, 0.42]);
        let text = SizingReport::from_result(&r).to_string();
        assert!(text.contains("Battery SOC min:       42.00%"));
    }
}
