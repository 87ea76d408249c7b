//! # rollout-mcts
//!
//! A UCT Monte Carlo Tree Search planner for stochastic, discrete-action
//! simulators.
//!
//! ## Design Principles
//!
//! 1. **Simulator-Agnostic**: The planner only needs `snapshot`, `step`,
//!    and the size of the action space. Environments implement `Simulator`.
//!
//! 2. **Isolated Branches**: Every tree node owns its own simulator
//!    snapshot; exploring one branch never disturbs another.
//!
//! 3. **Configuration Over Globals**: Exploration constant, rollout horizon
//!    and discount live in `MctsConfig`, so differently tuned planners can
//!    run side by side.
//!
//! ## Modules
//!
//! - `core`: Simulator trait, errors, RNG
//! - `mcts`: Tree, UCT selection, rollout evaluation, planner
//! - `envs`: Concrete simulators (cart-pole)
//! - `episodes`: Episode loop, parallel workers, iteration sweeps, results

pub mod core;
pub mod envs;
pub mod episodes;
pub mod mcts;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, SearchError, SimRng, Simulator, SimulatorError, Transition,
};

pub use crate::envs::{CartPole, CartPoleState};

pub use crate::mcts::{
    plan, EvaluationPolicy, MctsConfig, MctsNode, MctsPlanner, MctsTree, NodeId, NodeStats,
    RandomRollout, SearchStats, SelectionPolicy, TreeStats, Uct,
};

pub use crate::episodes::{
    run_episode, run_workers, sweep, worker_seeds, EpisodeConfig, EpisodeOutcome, RunnerError,
    StepSummary, SweepConfig, SweepPoint, WorkerSeeds,
};
