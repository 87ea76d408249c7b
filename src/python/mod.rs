//! Python bindings for the rollout-mcts planner.
//!
//! Lets a Python (gymnasium-style) environment act as the simulator.
//!
//! # Quick Start
//!
//! ```python
//! import gymnasium
//! import rollout_mcts
//!
//! env = gymnasium.make("CartPole-v1")
//! env.reset(seed=0)
//!
//! planner = rollout_mcts.MctsPlanner(env, exploration=2.0, horizon=10, gamma=0.9)
//! action = planner.run(100)
//!
//! # or in one call
//! action = rollout_mcts.plan(env, 100)
//! ```

use pyo3::prelude::*;

mod py_env;
mod py_planner;

pub use py_env::*;
pub use py_planner::*;

/// rollout_mcts: UCT planning over Python environments.
#[pymodule]
fn rollout_mcts(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMctsPlanner>()?;
    m.add_function(wrap_pyfunction!(plan, m)?)?;

    Ok(())
}
