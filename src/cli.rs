//! Command line interface for Physicsim

use clap::Parser;
use std::fmt;

use crate::config::SimulationConfig;
use crate::physics::math::Scalar;
use crate::resources::RunLimit;
use crate::simulations::{SimulationError, SimulationKind, SimulationRunner};

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// The configuration could not start a simulation
    InvalidConfig(SimulationError),
    /// Time step that is not a positive finite number
    InvalidTimestep(Scalar),
    /// Configuration could not be written out as TOML
    Serialize(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidConfig(err) => write!(f, "Invalid configuration: {err}"),
            CliError::InvalidTimestep(dt) => {
                write!(f, "Invalid time step: {dt} (expected a positive number of seconds)")
            }
            CliError::Serialize(msg) => write!(f, "Failed to serialize configuration: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Physicsim - headless runner for the physics visualization engines
#[derive(Parser, Debug)]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about,
    long_about = None
)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Simulation to run (overrides config file)
    #[arg(short = 's', long, value_name = "NAME")]
    pub simulation: Option<SimulationKind>,

    /// Stop after this many steps
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub steps: Option<u64>,

    /// Fixed time step in seconds instead of measured frame time
    #[arg(long, value_name = "SECONDS")]
    pub dt: Option<Scalar>,

    /// Random seed for stochastic simulations
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Start paused
    #[arg(short = 'p', long)]
    pub paused: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// List available simulations and exit
    #[arg(long)]
    pub list_simulations: bool,

    /// Write the simulation's records as CSV when the run ends
    #[arg(short = 'e', long, value_name = "FILE")]
    pub export: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

/// Handles the --list-simulations flag by printing available simulations
pub fn handle_list_simulations() {
    println!("Available simulations:");
    for kind in SimulationKind::ALL {
        let marker = if kind.is_static() { ", static" } else { "" };
        println!(
            "  - {:<16} {} ({:?}{})",
            kind.name(),
            kind.title(),
            kind.dimension(),
            marker
        );
    }
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<SimulationConfig, CliError> {
    let mut config = if let Some(config_path) = &args.config {
        println!("Loading configuration from: {config_path}");
        SimulationConfig::load_or_default(config_path)
    } else {
        SimulationConfig::load_from_user_config()
    };

    if let Some(kind) = args.simulation {
        println!("Running simulation: {}", kind.title());
        config.runtime.simulation = kind;
    }

    if let Some(dt) = args.dt {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(CliError::InvalidTimestep(dt));
        }
        println!("Using fixed time step: {dt} s");
        config.runtime.fixed_dt = Some(dt);
    }

    if let Some(seed) = args.seed {
        println!("Using random seed: {seed}");
        config.runtime.seed = Some(seed);
    }

    if args.paused {
        config.runtime.start_paused = true;
    }

    // Fail here rather than inside the running app
    SimulationRunner::from_config(&config, 0.0).map_err(CliError::InvalidConfig)?;

    Ok(config)
}

pub fn print_config(config: &SimulationConfig) -> Result<String, CliError> {
    toml::to_string_pretty(config).map_err(|err| CliError::Serialize(err.to_string()))
}

/// When the headless run should stop on its own
pub fn run_limit(args: &Args) -> RunLimit {
    RunLimit {
        max_steps: args.steps,
        until_finished: true,
        exit_requested: false,
    }
}
