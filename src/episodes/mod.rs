//! Playing whole episodes with the planner in the loop.
//!
//! - `runner`: single episodes, parallel worker batches, iteration-budget sweeps
//! - `results`: per-worker step counts, on-disk persistence, summaries

pub mod results;
pub mod runner;

pub use results::{StepSummary, SweepPoint};
pub use runner::{
    run_episode, run_workers, sweep, worker_seeds, EpisodeConfig, EpisodeOutcome, RunnerError,
    SweepConfig, WorkerSeeds,
};
