//! Runs both analyses over a network description file.
//!
//! Usage: `pulsegraph <input> [--config sim.yaml] [--presses N] [--sink NAME] [--report out.json]`

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

use pulsegraph::{SimConfig, SimResult, SimulationEngine};

#[derive(Parser, Debug)]
#[command(name = "pulsegraph")]
#[command(about = "Simulate a pulse network and report pulse totals and cycle length")]
struct Args {
    /// Network description, one module per line
    input: PathBuf,

    /// YAML or JSON simulation config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Presses for the pulse statistics
    #[arg(long)]
    presses: Option<u64>,

    /// Terminal sink whose feeder's sources are tracked
    #[arg(long)]
    sink: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Print the full report as JSON
    #[arg(long)]
    stats_json: bool,

    /// Write the full report as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn load_config(args: &Args) -> SimResult<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };

    if let Some(presses) = args.presses {
        config.simulation.presses = presses;
    }
    if let Some(sink) = &args.sink {
        config.simulation.terminal_sink = sink.clone();
    }
    if let Some(level) = &args.log_level {
        config.simulation.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: SimConfig) -> SimResult<()> {
    let text = std::fs::read_to_string(&args.input).map_err(pulsegraph::ConfigError::from)?;
    let engine = SimulationEngine::from_description(&text, config)?;
    info!(modules = engine.network().len(), "loaded {}", args.input.display());

    let report = engine.run()?;

    if args.stats_json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(err) => error!("failed to serialize report: {}", err),
        }
    }

    if let Some(path) = &args.report {
        match report.to_json_file(path) {
            Ok(()) => info!("wrote report to {}", path.display()),
            Err(err) => error!("failed to write {}: {}", path.display(), err),
        }
    }

    println!("Part 1: {}", report.pulse_product);
    println!("Part 2: {}", report.cycles.lcm);
    Ok(())
}

fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            pulsegraph::init_logging("info");
            error!("{}", err);
            process::exit(1);
        }
    };
    pulsegraph::init_logging(&config.simulation.log_level);

    if let Err(err) = run(&args, config) {
        error!("{}", err);
        process::exit(1);
    }
}
