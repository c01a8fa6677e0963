//! Command-line runner for Pasture simulations.

mod telemetry;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use pasture_core::SimulationConfig;
use pasture_world::{Simulation, SimulationResult};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "pasture",
    version,
    about = "Run a wolf-sheep-grass grid ecosystem and print the population trace as JSON"
)]
struct Cli {
    /// JSON configuration file; missing fields take their defaults.
    #[arg(short, long, env = "PASTURE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the number of ticks to run.
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Run without vegetation; prey never starve.
    #[arg(long)]
    no_vegetation: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    /// Print only the final counts and totals, without the per-tick trace.
    #[arg(long)]
    summary_only: bool,
}

#[derive(Debug, Serialize)]
struct RunReport {
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    config: SimulationConfig,
    #[serde(flatten)]
    result: SimulationResult,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_telemetry(cli.json_logs)?;

    let config = load_config(&cli)?;
    info!(
        seed = config.seed,
        num_ticks = config.num_ticks,
        width = config.world.width,
        height = config.world.height,
        vegetation = config.ecosystem.vegetation_enabled,
        "Starting Pasture run"
    );

    let started_at = Utc::now();
    let mut simulation = Simulation::new(config).context("failed to set up simulation")?;
    let mut result = simulation.run().context("simulation aborted")?;
    let finished_at = Utc::now();

    if cli.summary_only {
        result.trace.clear();
    }

    let report = RunReport {
        started_at,
        finished_at,
        config: simulation.config().clone(),
        result,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn load_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(ticks) = cli.ticks {
        config.num_ticks = ticks;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.no_vegetation {
        config.ecosystem.vegetation_enabled = false;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["pasture", "--ticks", "12", "--seed", "99", "--no-vegetation"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.num_ticks, 12);
        assert_eq!(config.seed, 99);
        assert!(!config.ecosystem.vegetation_enabled);
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::parse_from(["pasture"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.num_ticks, SimulationConfig::default().num_ticks);
        assert!(config.ecosystem.vegetation_enabled);
    }

    #[test]
    fn test_report_carries_the_config_that_ran() {
        let cli = Cli::parse_from(["pasture", "--ticks", "3", "--seed", "5"]);
        let config = load_config(&cli).unwrap();
        let mut simulation = Simulation::new(config).unwrap();
        let result = simulation.run().unwrap();

        let report = RunReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            config: simulation.config().clone(),
            result,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["config"]["seed"], 5);
        assert_eq!(json["config"]["num_ticks"], 3);
        assert!(json["trace"].is_array());
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let cli = Cli::parse_from(["pasture", "--config", "/nonexistent/pasture.json"]);
        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }
}
