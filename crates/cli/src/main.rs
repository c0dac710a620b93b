mod log;

use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;

use frees::{Config, Report, Solver, Toolkit};

/// Exit status when the system solved but left warnings.
const EXIT_WARNINGS: u8 = 2;

/// FrEES: solve a system of engineering equations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Equation file to solve, or `-` to read standard input
    file: PathBuf,

    /// Step size at which a numeric search stops
    #[arg(short, long)]
    precision: Option<f64>,

    /// Maximum number of sweeps over the system
    #[arg(long)]
    max_sweeps: Option<usize>,

    /// Percent error above which a searched value is flagged
    #[arg(long, value_name = "PERCENT")]
    error_threshold: Option<f64>,

    /// Extra constant, substituted before solving (repeatable)
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", value_parser = parse_define)]
    defines: Vec<(String, f64)>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// Entry point of the FrEES command line.
///
/// Exits with 0 for a clean solve, 2 when warnings remain, and 1 when the
/// input cannot be read or the options are invalid.
fn main() -> ExitCode {
    let cli = Cli::parse();
    log::init_logger(cli.debug);

    match try_main(&cli) {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_WARNINGS),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: &Cli) -> Result<Report, Box<dyn std::error::Error>> {
    let text = read_input(&cli.file)?;

    let defaults = Config::default();
    let config = Config::new(
        cli.precision.unwrap_or(defaults.precision()),
        defaults.steps(),
        defaults.default_bounds(),
        cli.max_sweeps.unwrap_or(defaults.max_sweeps()),
        defaults.max_evals(),
    )?
    .with_error_threshold(cli.error_threshold.unwrap_or(defaults.error_threshold()))?;

    let toolkit = cli
        .defines
        .iter()
        .fold(Toolkit::standard().to_builder(), |builder, (name, value)| {
            builder.constant(name, value.to_string())
        })
        .build();

    let report = Solver::new(toolkit, config).solve(&text);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(report)
}

fn read_input(path: &PathBuf) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(path)
    }
}

fn print_report(report: &Report) {
    let width = report.values.keys().map(String::len).max().unwrap_or(0);
    for (name, value) in &report.values {
        println!("{name:<width$} = {value}");
    }

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
}

/// Parses `NAME=VALUE` for `--define`.
fn parse_define(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{arg}`"))?;
    let name = name.trim();

    let mut chars = name.chars();
    let valid_name = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid_name {
        return Err(format!("`{name}` is not a valid name"));
    }

    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("`{value}` is not a number: {e}"))?;
    if !value.is_finite() {
        return Err(format!("`{name}` must be finite"));
    }

    Ok((name.to_string(), value))
}
