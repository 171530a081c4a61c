use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use simulation::{SimulationConfig, SimulationReport};

#[derive(Parser)]
#[command(author, version, about = "Round-based limit order market simulator")]
struct Cli {
    /// JSON run configuration; defaults to two makers and one taker on AA
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the configured number of rounds
    #[arg(long)]
    rounds: Option<u64>,
    /// Override the configured RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// Write the JSON report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(rounds) = cli.rounds {
        config.rounds = rounds;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let mut sim = config.build()?;
    info!(rounds = config.rounds, seed = config.seed, assets = config.assets.len(), "Starting simulation");
    let summaries = sim.run(config.rounds)?;

    let trades: usize = summaries.iter().map(|s| s.trades).sum();
    info!(rounds = summaries.len(), trades, "Simulation complete");

    let report = SimulationReport::from_simulator(&sim);
    match &cli.output {
        Some(path) => {
            report
                .write_to_file(path)
                .with_context(|| format!("writing report {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{}", report.to_json()?),
    }
    Ok(())
}
