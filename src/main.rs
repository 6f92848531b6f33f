use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use log::info;
use serde::Serialize;

use aviation_figures::config::FigureConfig;
use aviation_figures::figures::{self, FigureKind};
use aviation_figures::fuel::{EstimatorSettings, FuelEstimate, FuelEstimator, Mission};
use aviation_figures::paths;
use aviation_figures::render::{export_figure, OutputFormat};

#[derive(Parser, Debug)]
#[command(author, version, about = "Aviation sustainability figures", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Figure format (svg, png); overrides the config file
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate the fuel mass of a mission by fixed-point iteration
    Fuel(FuelArgs),
    /// Count supply-chain paths in an input/output table
    Paths(PathsArgs),
    /// Render one figure and its data
    Figure(FigureArgs),
}

#[derive(Parser, Debug)]
struct FuelArgs {
    /// Operating empty weight [kg]
    #[arg(long)]
    oew: f64,

    /// Number of passengers
    #[arg(long)]
    passengers: u32,

    /// Mass per passenger including baggage [kg]
    #[arg(long)]
    mass_per_passenger: f64,

    /// Mission distance [km]
    #[arg(long)]
    distance: f64,

    /// Relative-change stopping threshold
    #[arg(long, conflicts_with = "fixed")]
    tolerance: Option<f64>,

    /// Iteration cap when a tolerance is used
    #[arg(long, conflicts_with = "fixed")]
    max_iterations: Option<usize>,

    /// Run exactly N iterations with no convergence test
    #[arg(long, value_name = "N")]
    fixed: Option<usize>,

    /// Print the estimate as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Also render the convergence figure
    #[arg(long, action = ArgAction::SetTrue)]
    plot: bool,

    /// Figure directory (defaults under the configured output directory)
    #[arg(long, value_hint = ValueHint::DirPath)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PathsArgs {
    /// Number of sectors in the table
    #[arg(long)]
    sectors: u32,

    /// Path length / order
    #[arg(long)]
    order: u32,
}

#[derive(Parser, Debug)]
struct FigureArgs {
    /// Figure to render
    #[arg(value_enum)]
    name: FigureKind,

    /// Input CSV file, or directory of CSV files for learning-curves
    #[arg(long, value_hint = ValueHint::AnyPath)]
    data: Option<PathBuf>,

    /// Output directory; the figure file is named after it
    #[arg(long, value_hint = ValueHint::DirPath)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut config = FigureConfig::load(cli.config.as_deref())?;
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Command::Fuel(args) => handle_fuel(args, &config),
        Command::Paths(args) => handle_paths(args),
        Command::Figure(args) => handle_figure(args, &config),
    }
}

#[derive(Serialize)]
struct FuelReport<'a> {
    #[serde(flatten)]
    estimate: &'a FuelEstimate,
    take_off_mass: f64,
    fuel_per_100_pax_km: f64,
}

fn handle_fuel(args: FuelArgs, config: &FigureConfig) -> Result<()> {
    let mission = Mission::new(args.oew, args.passengers, args.mass_per_passenger, args.distance)?;

    let settings = match args.fixed {
        Some(n) => EstimatorSettings::fixed(n),
        None => {
            let mut settings = config.estimator_settings();
            if let Some(tol) = args.tolerance {
                settings.tolerance = Some(tol);
            }
            if let Some(max) = args.max_iterations {
                settings.max_iterations = max;
            }
            settings
        }
    };
    let estimate = FuelEstimator::with_settings(settings).estimate(&mission)?;
    let per_pkm = estimate.fuel_per_100_pax_km_at(config.fuel_density_kg_per_l);

    if args.json {
        let report = FuelReport {
            estimate: &estimate,
            take_off_mass: estimate.take_off_mass(),
            fuel_per_100_pax_km: per_pkm,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{:>9}  {:>14}", "iteration", "fuel mass [kg]");
        for (i, fuel) in estimate.trajectory.iter().enumerate() {
            println!("{:>9}  {:>14.2}", i + 1, fuel);
        }
        let b = &estimate.breakdown;
        println!();
        for (label, kg) in [
            ("fuel mass", estimate.fuel_mass),
            ("  cruise", b.cruise),
            ("  takeoff/landing", b.takeoff_landing),
            ("  climb/descent", b.climb_descent),
            ("  reserve", b.reserve),
            ("take-off mass", estimate.take_off_mass()),
        ] {
            println!("{label:<18}{kg:>12.2} kg");
        }
        println!("{:<18}{per_pkm:>12.3} l", "fuel per 100 pkm");
        println!(
            "{} after {} iterations",
            if estimate.converged { "converged" } else { "not converged" },
            estimate.iterations
        );
    }

    if args.plot {
        let out = args
            .out
            .unwrap_or_else(|| config.output_dir.join(FigureKind::FuelConvergence.dir_name()));
        let spec = figures::fuel_convergence(&estimate, config.fuel_density_kg_per_l);
        let path = export_figure(&spec, &out, &config.render_settings())?;
        info!("convergence figure written to {}", path.display());
    }
    Ok(())
}

fn handle_paths(args: PathsArgs) -> Result<()> {
    let show = |count: aviation_figures::Result<u128>| match count {
        Ok(n) => n.to_string(),
        Err(e) => format!("n/a ({e})"),
    };
    println!("sectors:      {}", args.sectors);
    println!("order:        {}", args.order);
    println!("power series: {}", show(paths::power_series(args.sectors, args.order)));
    println!("graph theory: {}", show(paths::graph_theory(args.sectors, args.order)));
    Ok(())
}

fn handle_figure(args: FigureArgs, config: &FigureConfig) -> Result<()> {
    let spec = figures::build(args.name, args.data.as_deref(), config)
        .with_context(|| format!("building figure '{}'", args.name))?;
    let out = args
        .out
        .unwrap_or_else(|| config.output_dir.join(args.name.dir_name()));
    let path = export_figure(&spec, &out, &config.render_settings())?;
    println!("{}", path.display());
    Ok(())
}
