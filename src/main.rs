//! rollout-mcts - iteration-budget sweep on cart-pole
//!
//! For every budget `start, start + step, … ≤ stop`:
//! 1. Plays `--workers` independent cart-pole episodes in parallel, each
//!    replanning with a fresh MCTS tree at every step
//! 2. Saves the per-worker episode lengths to `<out-dir>/num_steps_<n>.bin`
//! 3. Prints a box-plot summary row

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use rollout_mcts::envs::CartPole;
use rollout_mcts::episodes::{sweep, SweepConfig, SweepPoint};
use rollout_mcts::mcts::MctsConfig;

/// Let the MCTS planner play many cart-pole episodes concurrently and
/// record how long it keeps the pole up for each iteration budget.
#[derive(Debug, Parser)]
#[command(name = "rollout-mcts", version)]
struct Args {
    /// First number of MCTS iterations per decision.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    start: u32,

    /// Last number of MCTS iterations per decision (inclusive).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    stop: u32,

    /// Distance between iteration budgets.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    step: u32,

    /// Parallel episodes per budget.
    #[arg(long, visible_alias = "procs", value_parser = clap::value_parser!(u32).range(1..))]
    workers: u32,

    /// Master seed for environments and rollouts.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Maximum steps per episode.
    #[arg(long, default_value_t = 1000)]
    max_steps: u32,

    /// UCT exploration constant.
    #[arg(long, default_value_t = 2.0)]
    exploration: f64,

    /// Rollout horizon.
    #[arg(long, default_value_t = 10)]
    horizon: usize,

    /// Rollout discount factor.
    #[arg(long, default_value_t = 0.9)]
    gamma: f64,

    /// Directory for per-budget result files.
    #[arg(long, default_value = "logs/value_only")]
    out_dir: PathBuf,

    /// Log level (overridden by RUST_LOG).
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn sweep_config(&self) -> SweepConfig {
        SweepConfig {
            start: self.start,
            stop: self.stop,
            step: self.step,
            workers: self.workers as usize,
            seed: self.seed,
            max_steps: self.max_steps,
            mcts: MctsConfig::default()
                .with_exploration(self.exploration)
                .with_horizon(self.horizon)
                .with_gamma(self.gamma),
        }
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn print_row(point: &SweepPoint) {
    match point.summary() {
        Some(s) => println!(
            "{:>10} {:>6} {:>8.1} {:>8.1} {:>8.1} {:>6} {:>8.1}",
            point.iterations, s.min, s.q1, s.median, s.q3, s.max, s.mean
        ),
        None => println!("{:>10} (no episodes)", point.iterations),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let config = args.sweep_config();
    config.validate()?;

    info!(
        start = config.start,
        stop = config.stop,
        step = config.step,
        workers = config.workers,
        out_dir = %args.out_dir.display(),
        "starting sweep"
    );

    println!(
        "{:>10} {:>6} {:>8} {:>8} {:>8} {:>6} {:>8}",
        "iterations", "min", "q1", "median", "q3", "max", "mean"
    );

    let result = sweep(&config, CartPole::new, |point| {
        point.save(&args.out_dir)?;
        print_row(point);
        Ok(())
    });

    match result {
        Ok(points) => {
            info!(points = points.len(), "sweep completed");
            Ok(())
        }
        Err(e) => {
            error!("sweep failed: {}", e);
            Err(e.into())
        }
    }
}
