//! Episode loop and parallel workers.
//!
//! An episode replans from scratch at every step: a fresh planner is built
//! around the live environment, its action is applied, and the tree is
//! thrown away. Workers are fully independent (own environment, own
//! planners) and each fills exactly one slot of the result vector.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::{SearchError, SimRng, Simulator, SimulatorError};
use crate::mcts::{MctsConfig, MctsPlanner};

use super::results::SweepPoint;

/// Errors that can occur while running episodes or sweeps.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("environment failed: {0}")]
    Simulator(#[from] SimulatorError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding error: {0}")]
    Encode(#[from] bincode::Error),

    #[error("invalid sweep: {0}")]
    InvalidSweep(String),
}

/// Configuration for a single episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeConfig {
    /// MCTS iterations per decision.
    pub iterations: u32,

    /// Maximum environment steps per episode.
    pub max_steps: u32,

    /// Planner configuration. Its seed seeds the whole episode.
    pub mcts: MctsConfig,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            max_steps: 1000,
            mcts: MctsConfig::default(),
        }
    }
}

impl EpisodeConfig {
    /// Create an episode config with the given iteration budget.
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    /// Set maximum steps per episode.
    pub fn with_max_steps(mut self, max: u32) -> Self {
        self.max_steps = max;
        self
    }

    /// Set the planner configuration.
    pub fn with_mcts(mut self, mcts: MctsConfig) -> Self {
        self.mcts = mcts;
        self
    }
}

/// Result of one played episode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    /// Environment steps taken.
    pub steps: u32,

    /// The environment signalled termination (rather than hitting `max_steps`).
    pub terminated: bool,

    /// Undiscounted sum of rewards.
    pub total_reward: f64,
}

/// Play one episode on `env`, replanning at every step.
///
/// Each step's planner gets its own seed drawn from `config.mcts.seed`,
/// so consecutive decisions do not reuse the same rollouts.
pub fn run_episode<S: Simulator>(
    env: &mut S,
    config: &EpisodeConfig,
) -> Result<EpisodeOutcome, RunnerError> {
    let mut seeds = SimRng::new(config.mcts.seed);
    let mut outcome = EpisodeOutcome {
        steps: 0,
        terminated: false,
        total_reward: 0.0,
    };

    while outcome.steps < config.max_steps {
        let mcts = config.mcts.clone().with_seed(seeds.next_seed());
        let action = MctsPlanner::new(env, mcts)?.run(config.iterations)?;

        let transition = env.step(action)?;
        outcome.steps += 1;
        outcome.total_reward += transition.reward;

        if transition.terminal {
            outcome.terminated = true;
            break;
        }
    }

    Ok(outcome)
}

/// Seeds handed to one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerSeeds {
    /// Passed to `make_env`.
    pub env: u64,

    /// Seeds the worker's planner seed stream.
    pub planner: u64,
}

/// Draw an environment seed and a planner seed for each of `workers`
/// workers, in worker order, from the master stream `seed`.
#[must_use]
pub fn worker_seeds(workers: usize, seed: u64) -> Vec<WorkerSeeds> {
    let mut master = SimRng::new(seed);
    (0..workers)
        .map(|_| WorkerSeeds {
            env: master.next_seed(),
            planner: master.next_seed(),
        })
        .collect()
}

/// Run `workers` independent episodes in parallel.
///
/// Worker `i` builds its environment with `make_env(seeds[i].env)` and
/// plans from `seeds[i].planner` (see `worker_seeds`); its outcome lands
/// in slot `i`. The first failing worker fails the batch.
pub fn run_workers<S, F>(
    workers: usize,
    seed: u64,
    make_env: F,
    config: &EpisodeConfig,
) -> Result<Vec<EpisodeOutcome>, RunnerError>
where
    S: Simulator,
    F: Fn(u64) -> S + Sync,
{
    worker_seeds(workers, seed)
        .into_par_iter()
        .enumerate()
        .map(|(worker, seeds)| {
            let mut env = make_env(seeds.env);
            let worker_config = EpisodeConfig {
                mcts: config.mcts.clone().with_seed(seeds.planner),
                ..config.clone()
            };

            let outcome = run_episode(&mut env, &worker_config)?;
            debug!(
                worker,
                steps = outcome.steps,
                terminated = outcome.terminated,
                "episode finished"
            );
            Ok(outcome)
        })
        .collect()
}

/// A sweep over planner iteration budgets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// First iteration budget.
    pub start: u32,

    /// Last iteration budget (inclusive upper bound).
    pub stop: u32,

    /// Distance between budgets.
    pub step: u32,

    /// Parallel episodes per budget.
    pub workers: usize,

    /// Master seed.
    pub seed: u64,

    /// Maximum environment steps per episode.
    pub max_steps: u32,

    /// Planner configuration (its seed is replaced per worker).
    pub mcts: MctsConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: 10,
            stop: 100,
            step: 10,
            workers: 4,
            seed: 0,
            max_steps: 1000,
            mcts: MctsConfig::default(),
        }
    }
}

impl SweepConfig {
    /// Check the sweep bounds and the planner config.
    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.start == 0 || self.step == 0 || self.workers == 0 {
            return Err(RunnerError::InvalidSweep(format!(
                "start, step and workers must be positive (start={}, step={}, workers={})",
                self.start, self.step, self.workers
            )));
        }
        if self.start > self.stop {
            return Err(RunnerError::InvalidSweep(format!(
                "start {} is greater than stop {}",
                self.start, self.stop
            )));
        }
        self.mcts.validate().map_err(SearchError::from)?;
        Ok(())
    }

    /// Iteration budgets `start, start + step, …` up to and including `stop`.
    #[must_use]
    pub fn budgets(&self) -> Vec<u32> {
        (self.start..=self.stop).step_by(self.step.max(1) as usize).collect()
    }
}

/// Run one batch of workers per iteration budget.
///
/// `on_point` sees every point as soon as its batch completes (e.g. to
/// persist it), so an interrupted sweep keeps the points already handled.
pub fn sweep<S, F, C>(
    config: &SweepConfig,
    make_env: F,
    mut on_point: C,
) -> Result<Vec<SweepPoint>, RunnerError>
where
    S: Simulator,
    F: Fn(u64) -> S + Sync,
    C: FnMut(&SweepPoint) -> Result<(), RunnerError>,
{
    config.validate()?;

    let mut master = SimRng::new(config.seed);
    let mut points = Vec::new();

    for iterations in config.budgets() {
        info!(iterations, workers = config.workers, "running sweep point");

        let episode = EpisodeConfig {
            iterations,
            max_steps: config.max_steps,
            mcts: config.mcts.clone(),
        };
        let outcomes = run_workers(config.workers, master.next_seed(), &make_env, &episode)?;

        let point = SweepPoint::new(iterations, outcomes.iter().map(|o| o.steps).collect());
        on_point(&point)?;
        points.push(point);
    }

    Ok(points)
}
