//! FlareSim - Scenario driver for the flare-nav engine
//!
//! Simulates a rescuer searching for a beacon: synthetic RSSI from the
//! log-distance model with Gaussian noise, compass headings and
//! accelerometer steps. The engine calibrates, guides the walk and plans
//! routes over its heat map on a background thread.
//!
//! ## Usage
//!
//! ```text
//! flare-sim [CONFIG] [--steps N] [--seed S]
//! ```
//!
//! Without a CONFIG argument, `flare-sim.toml` in the working directory is
//! used if present, otherwise built-in defaults.

mod config;
mod error;
mod scenario;

use config::SimConfig;
use error::Result;
use scenario::Scenario;

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "flare-sim.toml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario configuration (TOML)
    config: Option<PathBuf>,

    /// Step budget (overrides the config)
    #[arg(long)]
    steps: Option<usize>,

    /// RNG seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flare_sim=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            SimConfig::load(path)?
        }
        None if Path::new(DEFAULT_CONFIG).exists() => {
            info!("Loading configuration from {}", DEFAULT_CONFIG);
            SimConfig::load(Path::new(DEFAULT_CONFIG))?
        }
        None => {
            info!("Using default configuration");
            SimConfig::default()
        }
    };

    if let Some(steps) = args.steps {
        config.scenario.max_steps = steps;
    }
    if let Some(seed) = args.seed {
        config.scenario.seed = seed;
    }

    info!("FlareSim v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Path loss: tx {:.0} dBm, n = {:.1}; noise σ {:.1} dB; seed {}",
        config.navigation.signal.tx_power,
        config.navigation.signal.path_loss_exponent,
        config.scenario.rssi_noise_db,
        config.scenario.seed
    );

    let report = Scenario::new(config)?.run()?;

    info!(
        "{} after {} steps: true distance {:.2} m, estimated {}",
        if report.arrived { "Arrived" } else { "Gave up" },
        report.steps,
        report.true_distance_m,
        report
            .estimated_distance_m
            .map_or_else(|| "n/a".to_string(), |d| format!("{:.2} m", d))
    );
    info!(
        "Final state {:?}; dead-reckoning drift {:.0} cm; {} cells mapped",
        report.final_state, report.drift_cm, report.mapped_cells
    );
    if let Some(estimate) = report.victim_estimate {
        info!("Last victim estimate ({:.0}, {:.0}) cm", estimate.x, estimate.y);
    }
    if let Some(len) = report.last_path_len {
        info!("Last planned route: {} cells", len);
    }
    if report.stale_drops > 0 {
        info!("{} stale sensor pushes dropped", report.stale_drops);
    }

    info!("FlareSim finished");
    Ok(())
}
