//! Civil Violence Simulation
//!
//! Runs one seeded model to completion and writes the run report and the
//! event log.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cv_core::output::{write_report, EVENTS_FILE_NAME};
use cv_core::{
    EventLogger, Model, ModelParams, PropagandaStrategy, SimError, DEFAULT_CONFIG_PATH,
};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "civil_violence")]
#[command(about = "Agent-based civil violence model with propaganda")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Parameter file (TOML); falls back to civil_violence.toml, then defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the iteration limit
    #[arg(long)]
    max_iters: Option<u64>,

    /// Override the propaganda strategy
    #[arg(long)]
    strategy: Option<PropagandaStrategy>,

    /// Directory for report.json and events.jsonl
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Run without propaganda agents
    #[arg(long)]
    no_propaganda: bool,

    /// Only log warnings and errors
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_params(args: &Args) -> Result<ModelParams, SimError> {
    let mut params = match &args.config {
        Some(path) => {
            tracing::info!("Loading parameters from {}", path.display());
            ModelParams::load(path)?
        }
        None => {
            tracing::debug!("Looking for {}", DEFAULT_CONFIG_PATH);
            ModelParams::load_or_default()
        }
    };

    if let Some(max_iters) = args.max_iters {
        params.max_iters = max_iters;
    }
    if let Some(strategy) = args.strategy {
        params.propaganda.strategy = strategy;
    }
    if args.no_propaganda {
        params.propaganda_allowed = false;
    }
    Ok(params)
}

fn run(args: Args) -> Result<(), SimError> {
    let params = load_params(&args)?;
    let max_iters = params.max_iters;

    std::fs::create_dir_all(&args.output_dir)?;
    let mut logger = EventLogger::new(args.output_dir.join(EVENTS_FILE_NAME))?;
    let mut model = Model::new(params, args.seed)?;

    while model.is_running() {
        model.step()?;
        logger.log_batch(&model.drain_events())?;

        let iteration = model.iteration();
        if iteration % 100 == 0 {
            if let Some(m) = model.latest_metrics() {
                tracing::info!(
                    "Step {} / {}: {} quiescent, {} active, {} jailed, ripeness {:.2}",
                    iteration,
                    max_iters,
                    m.quiescent,
                    m.active,
                    m.jailed,
                    m.ripeness_index
                );
            }
        }
    }
    logger.flush()?;

    let report = model.report()?;
    let path = write_report(&args.output_dir, &report)?;
    tracing::info!(
        "Simulation complete after {} steps. Logged {} events; report written to {}",
        model.iteration(),
        logger.event_count(),
        path.display()
    );
    Ok(())
}
