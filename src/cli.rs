//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

/// What the binary should do, parsed from `argv`.
#[derive(Debug, Default, PartialEq)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    /// NREL CSV files overriding the configured data source.
    pub data: Vec<PathBuf>,
    pub export: Option<PathBuf>,
    pub daily_out: Option<PathBuf>,
    pub sweep: bool,
    pub help: bool,
}

/// Parses the process arguments.
///
/// # Errors
///
/// Returns a message describing the first invalid argument.
pub fn parse_args() -> Result<CliOptions, String> {
    parse_args_from(env::args().skip(1))
}

/// Parses an argument list (without the program name).
///
/// Falls back to the `baseline` preset when neither `--config` nor
/// `--preset` is given.
///
/// # Errors
///
/// Returns a message describing the first invalid argument.
pub fn parse_args_from<I, S>(args: I) -> Result<CliOptions, String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--data" => {
                i += 1;
                let list = args.next_or_err(i, "missing value for --data (expected comma-separated CSV paths)")?;
                opts.data.extend(
                    list.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(PathBuf::from),
                );
                if opts.data.is_empty() {
                    return Err("--data needs at least one file path".to_string());
                }
            }
            "--export" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --export (expected a file path)")?;
                if opts.export.replace(PathBuf::from(path)).is_some() {
                    return Err("--export provided more than once".to_string());
                }
            }
            "--daily-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --daily-out (expected a file path)")?;
                if opts.daily_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--daily-out provided more than once".to_string());
                }
            }
            "--sweep" => opts.sweep = true,
            "--help" | "-h" => opts.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source".to_string(),
        );
    }
    if opts.config.is_none() && opts.preset.is_none() {
        opts.preset = Some("baseline".to_string());
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index).map(String::as_str).ok_or_else(|| err.to_string())
    }
}

pub fn print_usage(presets: &[&str]) {
    eprintln!("offgrid-pv: off-grid PV array and battery sizing");
    eprintln!();
    eprintln!("Usage: offgrid-pv [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset ({})", presets.join(", "));
    eprintln!("  --data <a.csv,b.csv>     Use NREL PVWatts hourly CSV files");
    eprintln!("  --export <path>          Export hourly results to CSV");
    eprintln!("  --daily-out <path>       Export daily energy totals to CSV");
    eprintln!("  --sweep                  Run the sizing sweep from [sweep]");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the baseline preset is used.");
}
