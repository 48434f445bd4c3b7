//! offgrid-pv entry point: CLI wiring and config-driven runs.

use std::process;

use tracing::{error, info};

use offgrid_pv::cli::{self, CliOptions};
use offgrid_pv::config::ScenarioConfig;
use offgrid_pv::io::export::{export_csv, export_daily_csv};
use offgrid_pv::sim::engine::Simulation;
use offgrid_pv::sim::kpi::{SizingReport, daily_energy};
use offgrid_pv::sim::sweep::{cheapest_feasible, run_sweep};
use offgrid_pv::telemetry;

/// Logs `msg` and exits with status 1.
fn fail(msg: impl std::fmt::Display) -> ! {
    error!("{msg}");
    process::exit(1);
}

/// Loads the scenario: `--config` file, else the named preset.
fn load_scenario(opts: &CliOptions) -> ScenarioConfig {
    let loaded = match (&opts.config, &opts.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path),
        (None, Some(name)) => ScenarioConfig::from_preset(name),
        (None, None) => Ok(ScenarioConfig::baseline()),
    };
    let mut scenario = loaded.unwrap_or_else(|e| fail(e));

    if !opts.data.is_empty() {
        scenario.use_nrel_files(opts.data.clone());
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        process::exit(1);
    }
    scenario
}

fn main() {
    telemetry::init_tracing();

    let opts = cli::parse_args().unwrap_or_else(|e| {
        cli::print_usage(ScenarioConfig::PRESETS);
        fail(e)
    });
    if opts.help {
        cli::print_usage(ScenarioConfig::PRESETS);
        return;
    }

    let scenario = load_scenario(&opts);
    let params = scenario.sizing_parameters().unwrap_or_else(|e| fail(e));
    let policy = scenario.consumption_policy().unwrap_or_else(|e| fail(e));
    let provider = scenario.provider().unwrap_or_else(|e| fail(e));

    info!(source = %provider.describe(), policy = policy.name(), "loading hourly data");
    let records = provider.load().unwrap_or_else(|e| fail(e));

    let simulation = Simulation::new(params, policy.clone()).unwrap_or_else(|e| fail(e));
    let result = simulation.run(&records).unwrap_or_else(|e| fail(e));

    println!("{}", SizingReport::from_result(&result));

    if let Some(path) = &opts.export {
        if let Err(e) = export_csv(&result, path) {
            fail(format!("failed to write CSV {}: {e}", path.display()));
        }
        info!(path = %path.display(), "hourly results written");
    }

    if let Some(path) = &opts.daily_out {
        if let Err(e) = export_daily_csv(&daily_energy(&result), path) {
            fail(format!("failed to write CSV {}: {e}", path.display()));
        }
        info!(path = %path.display(), "daily totals written");
    }

    if opts.sweep {
        let grid = &scenario.sweep;
        let points = run_sweep(
            &records,
            &params,
            &policy,
            &grid.array_power_w,
            &grid.battery_capacity_wh,
        )
        .unwrap_or_else(|e| fail(e));

        println!("\n--- Sizing Sweep ---");
        for p in &points {
            println!("{p}");
        }
        match cheapest_feasible(&points, grid.min_soc) {
            Some(best) => println!("\nCheapest with SoC min >= {:.1}%: {best}", grid.min_soc * 100.0),
            None => println!("\nNo grid point keeps SoC min >= {:.1}%", grid.min_soc * 100.0),
        }
    }
}
