use anyhow::Context;
use clap::Parser;
use cv_tracker::{
    config::{read_config_from_json, SimulationConfig},
    consistency::TrackingSummary,
    simulator::Simulation,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Track a simulated circling target with a constant velocity Kalman filter.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with simulation, estimator and motion settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(long)]
    steps: Option<usize>,

    /// Time step per tick
    #[arg(long)]
    dt: Option<f64>,

    /// Standard deviation of the position measurement noise
    #[arg(long)]
    noise_std: Option<f64>,

    /// Seed for the measurement noise
    #[arg(long)]
    seed: Option<u64>,

    /// Print one JSON record per tick to stdout
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Verbose logging (DEBUG level)
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config_from_json(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(steps) = cli.steps {
        config.steps = steps;
    }
    if let Some(dt) = cli.dt {
        config.dt = dt;
    }
    if let Some(noise_std) = cli.noise_std {
        config.motion.noise_std = noise_std;
    }
    if cli.seed.is_some() {
        config.motion.seed = cli.seed;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    info!(dt = config.dt, steps = config.steps, "starting tracker");

    let mut sim = Simulation::new(&config)?;
    let mut records = Vec::with_capacity(config.steps);
    for _ in 0..config.steps {
        let record = sim.tick()?;
        if cli.json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            info!(
                "t={:.1} true=({:.3}, {:.3}) measured=({:.3}, {:.3}) estimated=({:.3}, {:.3}) velocity=({:.3}, {:.3})",
                record.time,
                record.true_position[0],
                record.true_position[1],
                record.measurement[0],
                record.measurement[1],
                record.estimated_position[0],
                record.estimated_position[1],
                record.estimated_velocity[0],
                record.estimated_velocity[1],
            );
        }
        records.push(record);
    }

    let summary = TrackingSummary::from_records(&records);
    if summary.skipped_updates > 0 {
        warn!(skipped = summary.skipped_updates, "some updates were skipped");
    }
    info!(
        position_rmse = summary.position_rmse,
        velocity_rmse = summary.velocity_rmse,
        measurement_rmse = summary.measurement_rmse,
        mean_nis = ?summary.mean_nis,
        mean_nees = ?summary.mean_nees,
        "done"
    );
    Ok(())
}
